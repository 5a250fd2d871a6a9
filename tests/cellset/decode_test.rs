//! Integration tests for cellset decoding from JSON.

use mdxkit::cellset::{decode_json, CellContent, CellsetError, DecodeOptions};
use serde_json::json;

const CELLSET: &str = r#"{
  "ID": "abc",
  "Cube": { "Name": "Sales", "Dimensions": [{ "Name": "Dim1" }, { "Name": "Dim2" }] },
  "Axes": [
    { "Ordinal": 0, "Cardinality": 2, "Tuples": [
      { "Ordinal": 0, "Members": [{ "Name": "E2", "UniqueName": "[Dim1].[E2]" }] },
      { "Ordinal": 1, "Members": [{ "Name": "E3", "UniqueName": "[Dim1].[E3]" }] }
    ] },
    { "Ordinal": 1, "Cardinality": 1, "Tuples": [
      { "Ordinal": 0, "Members": [{ "Name": "E1", "UniqueName": "[Dim2].[E1]" }] }
    ] }
  ],
  "Cells": [
    { "Ordinal": 0, "Value": 50.0, "Updateable": 257 },
    { "Ordinal": 1, "Value": 100.0, "Updateable": 257 }
  ]
}"#;

#[test]
fn test_decode_keys_by_unique_name() {
    let content = decode_json(CELLSET, &DecodeOptions::default()).unwrap();

    assert_eq!(content.len(), 2);
    assert_eq!(
        content.get("[Dim1].[E3]|[Dim2].[E1]"),
        Some(&CellContent::Value(json!(100.0)))
    );
    assert_eq!(
        content.get("[Dim1].[E2]|[Dim2].[E1]"),
        Some(&CellContent::Value(json!(50.0)))
    );
}

#[test]
fn test_decode_full_cells_by_element_name() {
    let options = DecodeOptions::default().element_names().with_cell_properties();
    let content = decode_json(CELLSET, &options).unwrap();

    let Some(CellContent::Cell(cell)) = content.get("E3|E1") else {
        panic!("expected a full cell under E3|E1");
    };
    assert_eq!(cell["Updateable"], json!(257));
    assert_eq!(cell["Value"], json!(100.0));
}

#[test]
fn test_serialized_output() {
    let content = decode_json(CELLSET, &DecodeOptions::default()).unwrap();
    let json = serde_json::to_value(&content).unwrap();
    assert_eq!(
        json,
        json!({
            "entries": {
                "[Dim1].[E2]|[Dim2].[E1]": 50.0,
                "[Dim1].[E3]|[Dim2].[E1]": 100.0
            }
        })
    );
}

#[test]
fn test_row_and_column_cellset() {
    // Two columns by three rows, cells listed row by row.
    let cellset = json!({
        "Cube": { "Dimensions": [{ "Name": "Year" }, { "Name": "Region" }, { "Name": "Version" }] },
        "Axes": [
            { "Cardinality": 2, "Tuples": [
                { "Members": [{ "UniqueName": "[Year].[2024]" }] },
                { "Members": [{ "UniqueName": "[Year].[2025]" }] }
            ] },
            { "Cardinality": 3, "Tuples": [
                { "Members": [{ "UniqueName": "[Region].[North]" }] },
                { "Members": [{ "UniqueName": "[Region].[South]" }] },
                { "Members": [{ "UniqueName": "[Region].[West]" }] }
            ] },
            { "Cardinality": 0, "Tuples": [] }
        ],
        "Cells": [
            { "Value": 1 }, { "Value": 2 },
            { "Value": 3 }, { "Value": 4 },
            { "Value": 5 }, { "Value": 6 }
        ]
    });

    let content = decode_json(&cellset.to_string(), &DecodeOptions::default().element_names()).unwrap();
    assert_eq!(content.len(), 6);
    assert_eq!(content.get("2025|South").and_then(|c| c.value()), Some(&json!(4)));
    assert_eq!(content.get("2024|West").and_then(|c| c.value()), Some(&json!(5)));
}

#[test]
fn test_decode_is_all_or_nothing() {
    let cellset = json!({
        "Cube": { "Dimensions": [{ "Name": "Year" }] },
        "Axes": [{ "Cardinality": 2, "Tuples": [
            { "Members": [{ "UniqueName": "[Year].[2024]" }] }
        ] }],
        "Cells": [{ "Value": 1 }, { "Value": 2 }]
    });

    let err = decode_json(&cellset.to_string(), &DecodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CellsetError::IndexOutOfRange { axis: 0, index: 1, available: 1 }
    ));
}

#[test]
fn test_missing_sections_are_malformed() {
    let err = decode_json(r#"{ "Axes": [] }"#, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, CellsetError::MalformedCellset(_)));

    let err = decode_json(r#"{ "Cells": [] }"#, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, CellsetError::MalformedCellset(_)));
}
