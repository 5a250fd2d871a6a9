//! Property tests for mixed-radix ordinal decomposition.

use mdxkit::cellset::{cell_count, ordinal_of, tuple_indices};
use proptest::prelude::*;

fn cardinalities_and_ordinal() -> impl Strategy<Value = (Vec<usize>, usize)> {
    prop::collection::vec(1usize..8, 0..5).prop_flat_map(|cards| {
        let total = cards.iter().product::<usize>();
        (Just(cards), 0..total)
    })
}

proptest! {
    #[test]
    fn indices_stay_within_cardinalities((cards, ordinal) in cardinalities_and_ordinal()) {
        let indices = tuple_indices(ordinal, &cards).unwrap();
        prop_assert_eq!(indices.len(), cards.len());
        for (index, cardinality) in indices.iter().zip(&cards) {
            prop_assert!(index < cardinality);
        }
    }

    #[test]
    fn decomposition_inverts((cards, ordinal) in cardinalities_and_ordinal()) {
        let indices = tuple_indices(ordinal, &cards).unwrap();
        prop_assert_eq!(ordinal_of(&indices, &cards).unwrap(), ordinal);
    }

    #[test]
    fn first_axis_is_ordinal_mod_cardinality((cards, ordinal) in cardinalities_and_ordinal()) {
        prop_assume!(!cards.is_empty());
        let indices = tuple_indices(ordinal, &cards).unwrap();
        prop_assert_eq!(indices[0], ordinal % cards[0]);
    }

    #[test]
    fn ordinals_past_the_end_are_rejected(cards in prop::collection::vec(1usize..8, 0..5), extra in 0usize..10) {
        let total = cell_count(&cards).unwrap();
        prop_assert!(tuple_indices(total + extra, &cards).is_err());
    }
}

#[test]
fn test_known_layout() {
    // 2 columns x 1 row: ordinal 1 is the second column of the only row.
    assert_eq!(tuple_indices(1, &[2, 1]).unwrap(), vec![1, 0]);
    assert_eq!(tuple_indices(0, &[2, 1]).unwrap(), vec![0, 0]);
}
