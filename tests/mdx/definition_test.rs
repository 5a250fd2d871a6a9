//! Integration tests for TOML query definitions.

use insta::assert_snapshot;
use mdxkit::mdx::{LoweredQuery, MdxError, QueryDefinition};

fn lower(source: &str) -> Result<LoweredQuery, MdxError> {
    QueryDefinition::from_toml(source)?.lower()
}

#[test]
fn test_descendants_and_hierarchize() {
    let source = r#"
cube = "Finance"

[[axes]]
index = 0
[[axes.sets]]
kind = "all_members"
dimension = "Period"

[[axes]]
index = 1
non_empty = true
[[axes.sets]]
kind = "descendants"
dimension = "Account"
hierarchy = "Reporting"
member = "Net Income"
level = 2
flag = "leaves"
steps = [{ op = "hierarchize" }]
[[axes.sets]]
kind = "children"
dimension = "Entity"
member = "Group"
steps = [{ op = "tail", count = 3 }]
"#;

    let mdx = lower(source).unwrap().to_mdx_strings().unwrap();
    assert_snapshot!(
        mdx[0],
        @"SELECT [Period].[Period].AllMembers ON 0, NON EMPTY CROSSJOIN(HIERARCHIZE(DESCENDANTS([Account].[Reporting].[Net Income], 2, LEAVES)), TAIL([Entity].[Group].Children, 3)) ON 1 FROM [Finance]"
    );
}

#[test]
fn test_where_members_are_ordered_by_dimension() {
    let source = r#"
cube = "Sales"

[[axes]]
index = 0
[[axes.sets]]
kind = "subset"
dimension = "Year"
subset = "Current"

[where]
Version = "Actual"
Currency = "EUR"
"#;

    let mdx = lower(source).unwrap().to_mdx_strings().unwrap();
    assert_eq!(
        mdx,
        vec![
            "SELECT TM1SubsetToSet([Year].[Year], 'Current') ON 0 FROM [Sales] \
             WHERE ([Currency].[EUR],[Version].[Actual])"
        ]
    );
}

#[test]
fn test_vary_produces_one_query_per_subset() {
    let source = r#"
cube = "Sales"

[[axes]]
index = 0
[[axes.sets]]
kind = "elements"
dimension = "Measures"
elements = ["Revenue"]

[vary]
dimension = "Region"
subsets = ["North", "South", "West"]
axis = 1
"#;

    let lowered = lower(source).unwrap();
    let LoweredQuery::Variants(builder) = &lowered else {
        panic!("expected variants");
    };
    assert_eq!(builder.variation().subsets.len(), 3);

    let mdx = lowered.to_mdx_strings().unwrap();
    assert_eq!(mdx.len(), 3);
    assert_eq!(
        mdx[2],
        "SELECT {[Measures].[Revenue]} ON 0, TM1SubsetToSet([Region].[Region], 'West') ON 1 FROM [Sales]"
    );
}

#[test]
fn test_intersect_and_except_steps() {
    let source = r#"
cube = "Sales"

[[axes]]
index = 0
[[axes.sets]]
kind = "subset_all"
dimension = "Product"
steps = [
    { op = "intersect", set = { kind = "subset", dimension = "Product", subset = "Active" } },
    { op = "except", set = { kind = "elements", dimension = "Product", elements = ["Legacy"] } },
]
"#;

    let mdx = lower(source).unwrap().to_mdx_strings().unwrap();
    assert_eq!(
        mdx[0],
        "SELECT EXCEPT(INTERSECT(TM1SUBSETALL([Product].[Product]), \
         TM1SubsetToSet([Product].[Product], 'Active')), {[Product].[Legacy]}) ON 0 FROM [Sales]"
    );
}

#[test]
fn test_structural_errors() {
    let duplicate_axis = r#"
cube = "Sales"
[[axes]]
index = 0
[[axes]]
index = 0
"#;
    assert!(matches!(lower(duplicate_axis), Err(MdxError::InvalidDefinition(_))));

    let missing_member = r#"
cube = "Sales"
[[axes]]
index = 0
[[axes.sets]]
kind = "children"
dimension = "Region"
"#;
    assert!(matches!(lower(missing_member), Err(MdxError::InvalidDefinition(_))));

    let missing_count = r#"
cube = "Sales"
[[axes]]
index = 0
[[axes.sets]]
kind = "subset_all"
dimension = "Region"
steps = [{ op = "head" }]
"#;
    assert!(matches!(lower(missing_count), Err(MdxError::InvalidDefinition(_))));

    let unknown_field = r#"
cube = "Sales"
colour = "blue"
"#;
    assert!(matches!(lower(unknown_field), Err(MdxError::DefinitionParse(_))));
}

#[test]
fn test_empty_filter_values_fail_when_rendering() {
    let source = r#"
cube = "Sales"
[[axes]]
index = 0
[[axes.sets]]
kind = "subset_all"
dimension = "Region"
steps = [{ op = "filter", attribute = "Type" }]
"#;
    let lowered = lower(source).unwrap();
    assert!(matches!(
        lowered.to_mdx_strings(),
        Err(MdxError::InvalidExpression(_))
    ));
}
