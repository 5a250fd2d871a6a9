//! Dimension selections and classic `ON ROWS` / `ON COLUMNS` queries.
//!
//! A selection picks members of one dimension in one of four ways and
//! renders to a set expression wrapped in `{...}` exactly once.

use std::str::FromStr;

use super::error::MdxError;
use super::names::{curly_braces, format_unique_name, normalize, quote_string};

/// How a [`DimensionSelection`] chose its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionType {
    /// Explicit element list.
    Iterable,
    /// Named subset.
    Subset,
    /// Caller-supplied MDX set expression.
    Expression,
    /// Every element of the dimension.
    All,
}

/// Members of one dimension placed on a classic axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSelection {
    pub dimension: String,
    pub selection_type: SelectionType,
    pub expression: String,
}

impl DimensionSelection {
    /// Pick the first populated source: elements, then subset, then
    /// expression; with none of them the whole dimension is selected.
    ///
    /// An explicitly empty element list still counts as a selection and
    /// renders as `{}`.
    pub fn new(
        dimension: &str,
        elements: Option<&[String]>,
        subset: Option<&str>,
        expression: Option<&str>,
    ) -> Self {
        let dim = normalize(dimension);
        let (selection_type, body) = match (elements, subset, expression) {
            (Some(elements), _, _) => {
                let parts: Vec<String> = elements
                    .iter()
                    .map(|e| format_unique_name(dimension, "", e))
                    .collect();
                (SelectionType::Iterable, parts.join(","))
            }
            (None, Some(subset), _) if !subset.is_empty() => (
                SelectionType::Subset,
                format!("Tm1SubsetToSet({}, {})", dim, quote_string(subset)),
            ),
            (None, _, Some(expr)) if !expr.trim().is_empty() => {
                (SelectionType::Expression, expr.trim().to_string())
            }
            _ => (SelectionType::All, format!("TM1SubsetAll({})", dim)),
        };

        Self {
            dimension: dimension.to_string(),
            selection_type,
            expression: curly_braces(&body),
        }
    }

    pub fn elements(dimension: &str, elements: &[String]) -> Self {
        Self::new(dimension, Some(elements), None, None)
    }

    pub fn subset(dimension: &str, subset: &str) -> Self {
        Self::new(dimension, None, Some(subset), None)
    }

    pub fn expression(dimension: &str, expression: &str) -> Self {
        Self::new(dimension, None, None, Some(expression))
    }

    pub fn all(dimension: &str) -> Self {
        Self::new(dimension, None, None, None)
    }
}

impl FromStr for DimensionSelection {
    type Err = MdxError;

    /// `Dim`, `Dim:subset=Name`, `Dim:elements=A,B` or `Dim:expr=<mdx>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((dimension, source)) = s.split_once(':') else {
            return Ok(Self::all(s.trim()));
        };
        let dimension = dimension.trim();
        if dimension.is_empty() {
            return Err(MdxError::definition(format!("selection '{}' has no dimension", s)));
        }

        match source.split_once('=') {
            Some(("subset", name)) => Ok(Self::subset(dimension, name)),
            Some(("expr", expr)) => Ok(Self::expression(dimension, expr)),
            Some(("elements", list)) => {
                let elements: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(String::from)
                    .collect();
                Ok(Self::elements(dimension, &elements))
            }
            _ => Err(MdxError::definition(format!(
                "unknown selection '{}' (expected subset=, elements= or expr=)",
                source
            ))),
        }
    }
}

/// Which classic axes get `NON EMPTY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressMode {
    #[default]
    None,
    Rows,
    Columns,
    Both,
}

impl SuppressMode {
    fn rows(&self) -> bool {
        matches!(self, SuppressMode::Rows | SuppressMode::Both)
    }

    fn columns(&self) -> bool {
        matches!(self, SuppressMode::Columns | SuppressMode::Both)
    }
}

impl FromStr for SuppressMode {
    type Err = MdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(SuppressMode::None),
            "ROWS" => Ok(SuppressMode::Rows),
            "COLUMNS" => Ok(SuppressMode::Columns),
            "BOTH" => Ok(SuppressMode::Both),
            other => Err(MdxError::definition(format!(
                "unknown suppress mode '{}' (expected none, rows, columns or both)",
                other
            ))),
        }
    }
}

/// Selections joined with `*` (crossjoin shorthand).
pub fn construct_mdx_axis(selections: &[DimensionSelection]) -> String {
    selections
        .iter()
        .map(|s| s.expression.as_str())
        .collect::<Vec<_>>()
        .join("*")
}

/// `SELECT <rows> ON ROWS, <columns> ON COLUMNS FROM [cube] [WHERE (...)]`.
///
/// Context members are emitted in the order given.
pub fn construct_mdx(
    cube: &str,
    rows: &[DimensionSelection],
    columns: &[DimensionSelection],
    contexts: &[(String, String)],
    suppress: SuppressMode,
) -> String {
    let non_empty = |on: bool| if on { "NON EMPTY " } else { "" };

    let mut mdx = format!(
        "SELECT {}{} ON ROWS, {}{} ON COLUMNS FROM {}",
        non_empty(suppress.rows()),
        construct_mdx_axis(rows),
        non_empty(suppress.columns()),
        construct_mdx_axis(columns),
        normalize(cube),
    );

    if !contexts.is_empty() {
        let members: Vec<String> = contexts
            .iter()
            .map(|(dim, elem)| format_unique_name(dim, "", elem))
            .collect();
        mdx.push_str(&format!(" WHERE ({})", members.join(",")));
    }

    mdx
}
