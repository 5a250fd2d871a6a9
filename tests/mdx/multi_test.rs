//! Integration tests for subset variant generation.

use mdxkit::mdx::{elements, member, subset_all, MdxQuery, MultiMdxBuilder, Variation};

fn regions() -> Vec<String> {
    vec!["North".into(), "South".into()]
}

#[test]
fn test_variants_follow_subset_order() {
    let base = MdxQuery::new("Sales")
        .on_columns(elements(vec![member("Year", "", "2024")]))
        .add_member_to_where(member("Version", "", "Actual"));
    let builder = MultiMdxBuilder::new(base, Variation::new("Region", "", regions(), 1));

    let mdx = builder.to_mdx_strings().unwrap();
    assert_eq!(
        mdx,
        vec![
            "SELECT {[Year].[2024]} ON 0, TM1SubsetToSet([Region].[Region], 'North') ON 1 \
             FROM [Sales] WHERE [Version].[Actual]",
            "SELECT {[Year].[2024]} ON 0, TM1SubsetToSet([Region].[Region], 'South') ON 1 \
             FROM [Sales] WHERE [Version].[Actual]",
        ]
    );
}

#[test]
fn test_base_query_is_restored_after_generation() {
    let builder = MultiMdxBuilder::for_cube("Sales", "Region", "Geography", regions(), 0)
        .edit(|q| q.on_columns(subset_all("Year", "")).non_empty(0, true));
    let before = builder.query().clone();

    let first = builder.to_mdx_strings().unwrap();
    let second = builder.to_mdx_strings().unwrap();

    assert_eq!(first, second);
    assert_eq!(builder.query(), &before);
    assert_eq!(
        first[0],
        "SELECT NON EMPTY CROSSJOIN(TM1SUBSETALL([Year].[Year]), \
         TM1SubsetToSet([Region].[Geography], 'North')) ON 0 FROM [Sales]"
    );
}

#[test]
fn test_invalid_variant_returns_no_strings() {
    let builder = MultiMdxBuilder::for_cube("Sales", "Region", "", vec!["North".into(), String::new()], 1);
    assert!(builder.to_mdx_strings().is_err());
}

#[test]
fn test_single_variant_query() {
    let builder = MultiMdxBuilder::for_cube("Sales", "Region", "", regions(), 1);
    let query = builder.variant("West");
    assert_eq!(
        query.to_mdx().unwrap(),
        "SELECT TM1SubsetToSet([Region].[Region], 'West') ON 1 FROM [Sales]"
    );
    assert_eq!(builder.variants().count(), 2);
}
