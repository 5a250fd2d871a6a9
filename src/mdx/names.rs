//! Helpers for MDX object names.
//!
//! Dimension, hierarchy and element names are written in square brackets.
//! A literal `]` inside a name is doubled (`]]`), the same way T-SQL escapes
//! bracketed identifiers.

// =============================================================================
// Brackets
// =============================================================================

/// Strip any leading and trailing square brackets.
///
/// Idempotent: `trim_brackets(trim_brackets(x)) == trim_brackets(x)`.
pub fn trim_brackets(name: &str) -> &str {
    name.trim_matches(|c| c == '[' || c == ']')
}

/// Wrap a bare name in brackets, escaping `]` as `]]`.
pub fn quote_bracket(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Bracket a name unless it is already bracketed. Empty input stays empty.
pub fn normalize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    if name.starts_with('[') && name.ends_with(']') {
        return name.to_string();
    }
    quote_bracket(name)
}

/// Quote a string literal with single quotes, doubling embedded quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Wrap an expression in curly braces, adding only the brace(s) it lacks.
///
/// An empty expression becomes the empty set `{}`.
pub fn curly_braces(expression: &str) -> String {
    if expression.is_empty() {
        return "{}".to_string();
    }
    let mut result = String::with_capacity(expression.len() + 2);
    if !expression.starts_with('{') {
        result.push('{');
    }
    result.push_str(expression);
    if !expression.ends_with('}') {
        result.push('}');
    }
    result
}

// =============================================================================
// Unique Names
// =============================================================================

/// Build `[Dim].[Elem]`, or `[Dim].[Hier].[Elem]` when the hierarchy differs.
///
/// Parts may arrive bracketed or bare; each is bracketed exactly once.
pub fn format_unique_name(dimension: &str, hierarchy: &str, element: &str) -> String {
    let same_hierarchy =
        trim_brackets(hierarchy).is_empty() || trim_brackets(hierarchy) == trim_brackets(dimension);
    if same_hierarchy {
        format!("{}.{}", normalize(dimension), normalize(element))
    } else {
        format!(
            "{}.{}.{}",
            normalize(dimension),
            normalize(hierarchy),
            normalize(element)
        )
    }
}

/// Element part of a unique name: `[D].[H].[E]` gives `E`.
pub fn element_name_from_unique_name(unique_name: &str) -> String {
    match unique_name.rfind("].[") {
        Some(pos) => {
            let tail = &unique_name[pos + 3..];
            let tail = tail.strip_suffix(']').unwrap_or(tail);
            tail.replace("]]", "]")
        }
        None => trim_brackets(unique_name).to_string(),
    }
}

/// Dimension part of a unique name: `[D].[H].[E]` gives `D`.
pub fn dimension_name_from_unique_name(unique_name: &str) -> String {
    match unique_name.find("].[") {
        Some(pos) => {
            let head = &unique_name[..pos];
            let head = head.strip_prefix('[').unwrap_or(head);
            head.replace("]]", "]")
        }
        None => trim_brackets(unique_name).to_string(),
    }
}

/// Hierarchy part of a unique name.
///
/// `[D].[H].[E]` gives `H`; for the two-part form `[D].[E]` the hierarchy
/// is the dimension itself.
pub fn hierarchy_name_from_unique_name(unique_name: &str) -> String {
    let segments: Vec<&str> = unique_name.split("].[").collect();
    if segments.len() >= 3 {
        segments[1].replace("]]", "]")
    } else {
        dimension_name_from_unique_name(unique_name)
    }
}
