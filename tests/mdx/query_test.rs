//! Integration tests for the MDX query builder.
//!
//! These tests build complete queries through the public API and check the
//! emitted text.

use insta::assert_snapshot;
use mdxkit::mdx::{
    all_members, calculated, children, crossjoin, descendants, elements, member, multi_union,
    subset, subset_all, tuples, Axis, ComparisonOp, DescFlag, MdxError, MdxQuery, MdxTuple,
    COLUMNS, ROWS,
};

#[test]
fn test_two_axis_round_trip() {
    let query = MdxQuery::new("Sales")
        .add_set_to_axis(0, elements(vec![member("Year", "", "2024")]))
        .add_set_to_axis(1, subset_all("Region", ""))
        .non_empty(1, true);

    assert_snapshot!(
        query.to_mdx().unwrap(),
        @"SELECT {[Year].[2024]} ON 0, NON EMPTY TM1SUBSETALL([Region].[Region]) ON 1 FROM [Sales]"
    );
}

#[test]
fn test_filtered_sorted_rows_with_slicer() {
    let rows = subset_all("Product", "")
        .filter_by_attribute("Category", ["Bikes", "Cars"])
        .tm1_sort(false)
        .head(5);

    let query = MdxQuery::new("[Sales]")
        .on_columns(elements(vec![
            member("Measures", "", "Revenue"),
            member("Measures", "", "Units"),
        ]))
        .on_rows(rows)
        .non_empty(ROWS, true)
        .add_member_to_where(member("Version", "", "Actual"))
        .add_member_to_where(member("Year", "", "2024"));

    assert_snapshot!(
        query.to_mdx().unwrap(),
        @"SELECT {[Measures].[Revenue],[Measures].[Units]} ON 0, NON EMPTY HEAD(TM1SORT(FILTER(TM1SUBSETALL([Product].[Product]), [Product].[Product].CurrentMember.[Category] = 'Bikes' OR [Product].[Product].CurrentMember.[Category] = 'Cars'), DESC), 5) ON 1 FROM [Sales] WHERE ([Version].[Actual],[Year].[2024])"
    );
}

#[test]
fn test_alternate_hierarchy_members() {
    let query = MdxQuery::new("Sales")
        .on_columns(children(member("Region", "Geography", "Europe")))
        .on_rows(descendants(
            member("Product", "", "Total"),
            2,
            Some(DescFlag::SelfAndBefore),
        ));

    assert_snapshot!(
        query.to_mdx().unwrap(),
        @"SELECT [Region].[Geography].[Europe].Children ON 0, DESCENDANTS([Product].[Total], 2, SELF_AND_BEFORE) ON 1 FROM [Sales]"
    );
}

#[test]
fn test_crossjoined_axis_with_tuple() {
    let axis = Axis::new()
        .with_set(subset("Region", "", "Countries"))
        .with_tuple(MdxTuple::from(member("Version", "", "Budget")))
        .non_empty(true);
    let query = MdxQuery::new("Sales")
        .on_columns(all_members("Year", ""))
        .with_axis(ROWS, axis);

    assert_snapshot!(
        query.to_mdx().unwrap(),
        @"SELECT [Year].[Year].AllMembers ON 0, NON EMPTY CROSSJOIN(TM1SubsetToSet([Region].[Region], 'Countries'), [Version].[Budget]) ON 1 FROM [Sales]"
    );
}

#[test]
fn test_set_algebra() {
    let set = multi_union(
        vec![
            subset("Region", "", "North"),
            subset("Region", "", "South"),
            subset("Region", "", "West"),
        ],
        false,
    )
    .except(elements(vec![member("Region", "", "Closed")]))
    .hierarchize();

    assert_snapshot!(
        set.to_mdx().unwrap(),
        @"HIERARCHIZE(EXCEPT(UNION(UNION(TM1SubsetToSet([Region].[Region], 'North'), TM1SubsetToSet([Region].[Region], 'South')), TM1SubsetToSet([Region].[Region], 'West')), {[Region].[Closed]}))"
    );
}

#[test]
fn test_crossjoin_and_tuple_sets() {
    assert_eq!(crossjoin(vec![]).to_mdx().unwrap(), "{}");
    assert_eq!(
        crossjoin(vec![subset_all("Year", "")]).to_mdx().unwrap(),
        "TM1SUBSETALL([Year].[Year])"
    );

    let set = tuples(vec![
        MdxTuple::of(vec![member("Year", "", "2024"), member("Version", "", "Actual")]),
        MdxTuple::of(vec![member("Year", "", "2025"), member("Version", "", "Budget")]),
    ]);
    assert_eq!(
        set.to_mdx().unwrap(),
        "{([Year].[2024],[Version].[Actual]),([Year].[2025],[Version].[Budget])}"
    );
}

#[test]
fn test_comparison_filter() {
    let set = subset_all("Product", "").filter_by_attribute_with(
        "Price",
        ["100"],
        ComparisonOp::Gte,
    );
    assert_eq!(
        set.to_mdx().unwrap(),
        "FILTER(TM1SUBSETALL([Product].[Product]), [Product].[Product].CurrentMember.[Price] >= '100')"
    );
}

#[test]
fn test_calculated_members_in_with() {
    let variance = calculated(
        "Measures",
        "",
        "Variance",
        "[Measures].[Actual] - [Measures].[Budget]",
    );
    let share = calculated("Measures", "", "Share", "[Measures].[Actual] / 100");

    let query = MdxQuery::new("Sales")
        .with_member(variance.clone())
        .with_member(share.clone())
        .add_set_to_axis(COLUMNS, elements(vec![variance, share]));

    assert_snapshot!(
        query.to_mdx().unwrap(),
        @"WITH MEMBER [Measures].[Variance] AS [Measures].[Actual] - [Measures].[Budget] MEMBER [Measures].[Share] AS [Measures].[Actual] / 100 SELECT {[Measures].[Variance],[Measures].[Share]} ON 0 FROM [Sales]"
    );
}

#[test]
fn test_names_with_closing_brackets_are_escaped() {
    let query = MdxQuery::new("Sales")
        .on_columns(elements(vec![member("Product", "", "Widget ]v2")]))
        .on_rows(subset("Region", "", "It's ours"));

    assert_eq!(
        query.to_mdx().unwrap(),
        "SELECT {[Product].[Widget ]]v2]} ON 0, TM1SubsetToSet([Region].[Region], 'It''s ours') ON 1 FROM [Sales]"
    );
}

#[test]
fn test_invalid_query_emits_nothing() {
    let empty_cube = MdxQuery::new("").on_columns(subset_all("Year", ""));
    assert!(matches!(empty_cube.to_mdx(), Err(MdxError::InvalidExpression(_))));

    let empty_filter = MdxQuery::new("Sales")
        .on_columns(subset_all("Year", ""))
        .on_rows(subset_all("Region", "").filter_by_attribute("Type", Vec::<String>::new()));
    let err = empty_filter.to_mdx().unwrap_err();
    assert!(err.to_string().contains("axis 1"));
}
