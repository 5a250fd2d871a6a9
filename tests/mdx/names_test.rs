//! Integration tests for name quoting and unique-name helpers.

use mdxkit::mdx::names::{
    curly_braces, dimension_name_from_unique_name, element_name_from_unique_name,
    format_unique_name, hierarchy_name_from_unique_name, normalize, quote_bracket,
    trim_brackets,
};
use proptest::prelude::*;

#[test]
fn test_unique_name_parts() {
    let unique = "[Region].[Geography].[North]";
    assert_eq!(dimension_name_from_unique_name(unique), "Region");
    assert_eq!(hierarchy_name_from_unique_name(unique), "Geography");
    assert_eq!(element_name_from_unique_name(unique), "North");

    assert_eq!(hierarchy_name_from_unique_name("[Year].[2024]"), "Year");
    assert_eq!(element_name_from_unique_name("[Product].[A]]B]"), "A]B");
}

#[test]
fn test_format_unique_name() {
    assert_eq!(format_unique_name("Year", "", "2024"), "[Year].[2024]");
    assert_eq!(format_unique_name("Year", "Year", "2024"), "[Year].[2024]");
    assert_eq!(
        format_unique_name("Region", "Geography", "North"),
        "[Region].[Geography].[North]"
    );
}

#[test]
fn test_normalize_and_braces() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("Sales"), "[Sales]");
    assert_eq!(normalize("[Sales]"), "[Sales]");
    assert_eq!(curly_braces(""), "{}");
    assert_eq!(curly_braces("[A].[B]"), "{[A].[B]}");
    assert_eq!(curly_braces("{[A].[B]}"), "{[A].[B]}");
}

proptest! {
    #[test]
    fn trim_brackets_is_idempotent(name in "[\\[\\]a-zA-Z0-9 ]{0,12}") {
        let once = trim_brackets(&name);
        prop_assert_eq!(trim_brackets(once), once);
    }

    #[test]
    fn quoted_element_round_trips(dim in "[a-zA-Z][a-zA-Z0-9 ]{0,8}", elem in "[a-zA-Z0-9 \\]]{1,10}") {
        let unique = format!("{}.{}", quote_bracket(&dim), quote_bracket(&elem));
        prop_assert_eq!(element_name_from_unique_name(&unique), elem);
        prop_assert_eq!(dimension_name_from_unique_name(&unique), dim);
    }
}
