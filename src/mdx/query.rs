//! Query builder - construct MDX queries with a fluent API.

use std::collections::BTreeMap;

use tracing::debug;

use super::error::{MdxError, MdxResult};
use super::member::MemberExpr;
use super::names::trim_brackets;
use super::set::{crossjoin_tokens, MdxSet};
use super::token::{Token, TokenStream};
use super::tuple::MdxTuple;

/// Axis index of the columns axis.
pub const COLUMNS: u32 = 0;
/// Axis index of the rows axis.
pub const ROWS: u32 = 1;

// =============================================================================
// Axis
// =============================================================================

/// One entry on an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisEntry {
    Set(MdxSet),
    Tuple(MdxTuple),
}

impl AxisEntry {
    pub fn to_tokens(&self) -> TokenStream {
        match self {
            AxisEntry::Set(set) => set.to_tokens(),
            AxisEntry::Tuple(tuple) => tuple.to_tokens(),
        }
    }

    pub fn validate(&self) -> MdxResult<()> {
        match self {
            AxisEntry::Set(set) => set.validate(),
            AxisEntry::Tuple(tuple) => tuple.validate(),
        }
    }
}

impl From<MdxSet> for AxisEntry {
    fn from(set: MdxSet) -> Self {
        AxisEntry::Set(set)
    }
}

impl From<MdxTuple> for AxisEntry {
    fn from(tuple: MdxTuple) -> Self {
        AxisEntry::Tuple(tuple)
    }
}

/// A query axis: entries crossjoined in order, optionally `NON EMPTY`.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Axis {
    pub entries: Vec<AxisEntry>,
    pub non_empty: bool,
}

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(mut self, set: MdxSet) -> Self {
        self.entries.push(AxisEntry::Set(set));
        self
    }

    pub fn with_tuple(mut self, tuple: MdxTuple) -> Self {
        self.entries.push(AxisEntry::Tuple(tuple));
        self
    }

    pub fn non_empty(mut self, non_empty: bool) -> Self {
        self.non_empty = non_empty;
        self
    }

    pub fn push(&mut self, entry: impl Into<AxisEntry>) {
        self.entries.push(entry.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `[NON EMPTY ]<crossjoin of entries>`; an empty axis renders as `{}`.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        if self.non_empty {
            ts.push(Token::NonEmpty).space();
        }
        let parts = self.entries.iter().map(AxisEntry::to_tokens).collect();
        ts.append(&crossjoin_tokens(parts));
        ts
    }

    pub fn validate(&self) -> MdxResult<()> {
        self.entries.iter().try_for_each(AxisEntry::validate)
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// An MDX `SELECT` query.
///
/// Axes are keyed by index (0 = columns, 1 = rows, 2+ = further axes) and
/// always emitted in ascending order. Missing indices are skipped, so a
/// query with axes 0 and 2 has no axis 1; that is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "MdxQuery has no effect until converted to MDX with to_mdx()"]
pub struct MdxQuery {
    pub cube: String,
    pub axes: BTreeMap<u32, Axis>,
    pub where_tuple: MdxTuple,
    pub calculated_members: Vec<MemberExpr>,
}

impl MdxQuery {
    /// Create a query over `cube`. Brackets around the name are dropped.
    pub fn new(cube: &str) -> Self {
        Self {
            cube: trim_brackets(cube).to_string(),
            ..Default::default()
        }
    }

    /// Append a set to an axis, creating the axis if needed.
    pub fn add_set_to_axis(mut self, axis: u32, set: MdxSet) -> Self {
        self.axes.entry(axis).or_default().push(set);
        self
    }

    /// Append a tuple to an axis, creating the axis if needed.
    pub fn add_tuple_to_axis(mut self, axis: u32, tuple: MdxTuple) -> Self {
        self.axes.entry(axis).or_default().push(tuple);
        self
    }

    /// Replace an axis wholesale.
    pub fn with_axis(mut self, index: u32, axis: Axis) -> Self {
        self.axes.insert(index, axis);
        self
    }

    /// Shorthand for a set on axis 0.
    pub fn on_columns(self, set: MdxSet) -> Self {
        self.add_set_to_axis(COLUMNS, set)
    }

    /// Shorthand for a set on axis 1.
    pub fn on_rows(self, set: MdxSet) -> Self {
        self.add_set_to_axis(ROWS, set)
    }

    /// Toggle `NON EMPTY` on an axis, creating the axis if needed.
    pub fn non_empty(mut self, axis: u32, non_empty: bool) -> Self {
        self.axes.entry(axis).or_default().non_empty = non_empty;
        self
    }

    /// Add a member to the `WHERE` slicer tuple.
    pub fn add_member_to_where(mut self, member: MemberExpr) -> Self {
        self.where_tuple.push(member);
        self
    }

    /// Declare a calculated member in the `WITH` clause.
    pub fn with_member(mut self, member: MemberExpr) -> Self {
        self.calculated_members.push(member);
        self
    }

    pub fn axis(&self, index: u32) -> Option<&Axis> {
        self.axes.get(&index)
    }

    /// Check every member, set and declaration in the query.
    pub fn validate(&self) -> MdxResult<()> {
        if self.cube.is_empty() {
            return Err(MdxError::invalid("cube name is empty"));
        }
        for member in &self.calculated_members {
            if !member.is_calculated() {
                return Err(MdxError::invalid(format!(
                    "{} is not a calculated member and cannot be declared in WITH",
                    member.unique_name()
                )));
            }
            member.validate()?;
        }
        for (index, axis) in &self.axes {
            axis.validate().map_err(|e| match e {
                MdxError::InvalidExpression(msg) => {
                    MdxError::InvalidExpression(format!("axis {}: {}", index, msg))
                }
                other => other,
            })?;
        }
        self.where_tuple.validate()
    }

    /// Convert to a token stream. Assumes [`MdxQuery::validate`] passed.
    pub fn to_tokens(&self) -> MdxResult<TokenStream> {
        let mut ts = TokenStream::new();

        // WITH
        if !self.calculated_members.is_empty() {
            ts.push(Token::With);
            for member in &self.calculated_members {
                ts.space().append(&member.declaration_tokens()?);
            }
            ts.space();
        }

        // SELECT
        ts.push(Token::Select).space();
        for (i, (index, axis)) in self.axes.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&axis.to_tokens())
                .space()
                .push(Token::On)
                .space()
                .push(Token::LitInt(*index as i64));
        }

        // FROM
        ts.space()
            .push(Token::From)
            .space()
            .push(Token::Ident(self.cube.clone()));

        // WHERE
        if !self.where_tuple.is_empty() {
            ts.space().push(Token::Where).space();
            ts.append(&self.where_tuple.to_tokens());
        }

        Ok(ts)
    }

    /// Generate the MDX string.
    ///
    /// The whole query is validated first; on error nothing is rendered.
    pub fn to_mdx(&self) -> MdxResult<String> {
        self.validate()?;
        let mdx = self.to_tokens()?.serialize();
        debug!(cube = %self.cube, axes = self.axes.len(), "built MDX query");
        Ok(mdx)
    }
}

// =============================================================================
// Tests
// =============================================================================
