//! Set expressions - composable set algebra over hierarchies.
//!
//! Every chain operation takes ownership of its base set and wraps it in a
//! new node, so a set is an inspectable tree that serializes by walking
//! itself recursively.
//!
//! ```text
//! subset_all("Region", "")
//!     .filter_by_attribute("Type", ["Country"])
//!     .tm1_sort(true)
//!     .head(10)
//!
//! HEAD(TM1SORT(FILTER(TM1SUBSETALL([Region].[Region]),
//!      [Region].[Region].CurrentMember.[Type] = 'Country'), ASC), 10)
//! ```

use std::str::FromStr;

use super::error::{MdxError, MdxResult};
use super::member::{HierarchyRef, MemberExpr};
use super::token::{Token, TokenStream};
use super::tuple::MdxTuple;

// =============================================================================
// Flags and Operators
// =============================================================================

/// Flags accepted by `DESCENDANTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescFlag {
    SelfOnly,
    After,
    Before,
    BeforeAndAfter,
    SelfAndAfter,
    SelfAndBefore,
    SelfBeforeAfter,
    Leaves,
}

impl DescFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescFlag::SelfOnly => "SELF",
            DescFlag::After => "AFTER",
            DescFlag::Before => "BEFORE",
            DescFlag::BeforeAndAfter => "BEFORE_AND_AFTER",
            DescFlag::SelfAndAfter => "SELF_AND_AFTER",
            DescFlag::SelfAndBefore => "SELF_AND_BEFORE",
            DescFlag::SelfBeforeAfter => "SELF_BEFORE_AFTER",
            DescFlag::Leaves => "LEAVES",
        }
    }
}

impl FromStr for DescFlag {
    type Err = MdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SELF" => Ok(DescFlag::SelfOnly),
            "AFTER" => Ok(DescFlag::After),
            "BEFORE" => Ok(DescFlag::Before),
            "BEFORE_AND_AFTER" => Ok(DescFlag::BeforeAndAfter),
            "SELF_AND_AFTER" => Ok(DescFlag::SelfAndAfter),
            "SELF_AND_BEFORE" => Ok(DescFlag::SelfAndBefore),
            "SELF_BEFORE_AFTER" => Ok(DescFlag::SelfBeforeAfter),
            "LEAVES" => Ok(DescFlag::Leaves),
            other => Err(MdxError::invalid(format!("unknown DESCENDANTS flag '{}'", other))),
        }
    }
}

/// Comparison used in attribute filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonOp {
    #[default]
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl ComparisonOp {
    fn token(&self) -> Token {
        match self {
            ComparisonOp::Eq => Token::Eq,
            ComparisonOp::Ne => Token::Ne,
            ComparisonOp::Lt => Token::Lt,
            ComparisonOp::Gt => Token::Gt,
            ComparisonOp::Lte => Token::Lte,
            ComparisonOp::Gte => Token::Gte,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = MdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "=" => Ok(ComparisonOp::Eq),
            "<>" => Ok(ComparisonOp::Ne),
            "<" => Ok(ComparisonOp::Lt),
            ">" => Ok(ComparisonOp::Gt),
            "<=" => Ok(ComparisonOp::Lte),
            ">=" => Ok(ComparisonOp::Gte),
            other => Err(MdxError::UnknownComparison(other.to_string())),
        }
    }
}

/// Names of the chainable set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Filter,
    Sort,
    Head,
    Tail,
    Union,
    Intersect,
    Except,
    Hierarchize,
}

impl FromStr for SetOperator {
    type Err = MdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filter" => Ok(SetOperator::Filter),
            "sort" | "tm1sort" => Ok(SetOperator::Sort),
            "head" => Ok(SetOperator::Head),
            "tail" => Ok(SetOperator::Tail),
            "union" => Ok(SetOperator::Union),
            "intersect" => Ok(SetOperator::Intersect),
            "except" => Ok(SetOperator::Except),
            "hierarchize" => Ok(SetOperator::Hierarchize),
            _ => Err(MdxError::UnknownSetOperator(s.to_string())),
        }
    }
}

// =============================================================================
// Set AST
// =============================================================================

/// An MDX set expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum MdxSet {
    /// `TM1SUBSETALL([Dim].[Hier])`
    SubsetAll(HierarchyRef),

    /// `[Dim].[Hier].AllMembers`
    AllMembers(HierarchyRef),

    /// `TM1SubsetToSet([Dim].[Hier], 'Subset')`
    SubsetToSet {
        hierarchy: HierarchyRef,
        subset: String,
    },

    /// `<member>.Children`
    Children(MemberExpr),

    /// `DESCENDANTS(<member>, <level>[, <flag>])`
    Descendants {
        member: MemberExpr,
        level: u32,
        flag: Option<DescFlag>,
    },

    /// `{m1,m2,...}`
    Elements(Vec<MemberExpr>),

    /// `FILTER(<base>, <cond> OR <cond> ...)`
    Filter {
        base: Box<MdxSet>,
        attribute: String,
        values: Vec<String>,
        op: ComparisonOp,
    },

    /// `TM1SORT(<base>, ASC|DESC)`
    Sort { base: Box<MdxSet>, ascending: bool },

    /// `HEAD(<base>, n)`
    Head { base: Box<MdxSet>, count: u32 },

    /// `TAIL(<base>, n)`
    Tail { base: Box<MdxSet>, count: u32 },

    /// `UNION(<left>, <right>[, ALL])`
    Union {
        left: Box<MdxSet>,
        right: Box<MdxSet>,
        all: bool,
    },

    /// `INTERSECT(<left>, <right>)`
    Intersect {
        left: Box<MdxSet>,
        right: Box<MdxSet>,
    },

    /// `EXCEPT(<left>, <right>)`
    Except {
        left: Box<MdxSet>,
        right: Box<MdxSet>,
    },

    /// `HIERARCHIZE(<base>)`
    Hierarchize(Box<MdxSet>),

    /// Left-folded `CROSSJOIN(CROSSJOIN(s0, s1), s2)...`
    CrossJoin(Vec<MdxSet>),

    /// Left-folded `UNION(UNION(s0, s1), s2)...`
    MultiUnion { sets: Vec<MdxSet>, all: bool },

    /// `{t1,t2,...}`
    Tuples(Vec<MdxTuple>),
}

// =============================================================================
// Constructors
// =============================================================================

/// All elements of a hierarchy via `TM1SUBSETALL`.
pub fn subset_all(dimension: &str, hierarchy: &str) -> MdxSet {
    MdxSet::SubsetAll(HierarchyRef::new(dimension, hierarchy))
}

/// `[Dim].[Hier].AllMembers`
pub fn all_members(dimension: &str, hierarchy: &str) -> MdxSet {
    MdxSet::AllMembers(HierarchyRef::new(dimension, hierarchy))
}

/// Resolve a named subset to its set.
pub fn subset(dimension: &str, hierarchy: &str, subset: &str) -> MdxSet {
    MdxSet::SubsetToSet {
        hierarchy: HierarchyRef::new(dimension, hierarchy),
        subset: subset.to_string(),
    }
}

pub fn children(member: MemberExpr) -> MdxSet {
    MdxSet::Children(member)
}

pub fn descendants(member: MemberExpr, level: u32, flag: Option<DescFlag>) -> MdxSet {
    MdxSet::Descendants {
        member,
        level,
        flag,
    }
}

pub fn elements(members: Vec<MemberExpr>) -> MdxSet {
    MdxSet::Elements(members)
}

pub fn tuples(tuples: Vec<MdxTuple>) -> MdxSet {
    MdxSet::Tuples(tuples)
}

pub fn crossjoin(sets: Vec<MdxSet>) -> MdxSet {
    MdxSet::CrossJoin(sets)
}

pub fn multi_union(sets: Vec<MdxSet>, allow_duplicates: bool) -> MdxSet {
    MdxSet::MultiUnion {
        sets,
        all: allow_duplicates,
    }
}

// =============================================================================
// Chaining
// =============================================================================

impl MdxSet {
    /// Keep members whose attribute equals any of `values`.
    pub fn filter_by_attribute<I, S>(self, attribute: &str, values: I) -> MdxSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_by_attribute_with(attribute, values, ComparisonOp::Eq)
    }

    /// Keep members whose attribute compares true against any of `values`.
    pub fn filter_by_attribute_with<I, S>(
        self,
        attribute: &str,
        values: I,
        op: ComparisonOp,
    ) -> MdxSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MdxSet::Filter {
            base: Box::new(self),
            attribute: super::names::trim_brackets(attribute).to_string(),
            values: values.into_iter().map(Into::into).collect(),
            op,
        }
    }

    pub fn tm1_sort(self, ascending: bool) -> MdxSet {
        MdxSet::Sort {
            base: Box::new(self),
            ascending,
        }
    }

    pub fn head(self, count: u32) -> MdxSet {
        MdxSet::Head {
            base: Box::new(self),
            count,
        }
    }

    pub fn tail(self, count: u32) -> MdxSet {
        MdxSet::Tail {
            base: Box::new(self),
            count,
        }
    }

    pub fn union(self, other: MdxSet, allow_duplicates: bool) -> MdxSet {
        MdxSet::Union {
            left: Box::new(self),
            right: Box::new(other),
            all: allow_duplicates,
        }
    }

    pub fn intersect(self, other: MdxSet) -> MdxSet {
        MdxSet::Intersect {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn except(self, other: MdxSet) -> MdxSet {
        MdxSet::Except {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn hierarchize(self) -> MdxSet {
        MdxSet::Hierarchize(Box::new(self))
    }

    /// The hierarchy this set ranges over.
    ///
    /// Derived sets report their base's hierarchy, which is what lets a
    /// filter further down a chain reference `CurrentMember` on it.
    /// Crossjoins and tuple lists span several hierarchies and report none.
    pub fn hierarchy(&self) -> Option<&HierarchyRef> {
        match self {
            MdxSet::SubsetAll(h) | MdxSet::AllMembers(h) => Some(h),
            MdxSet::SubsetToSet { hierarchy, .. } => Some(hierarchy),
            MdxSet::Children(m) | MdxSet::Descendants { member: m, .. } => Some(m.hierarchy()),
            MdxSet::Elements(members) => members.first().map(MemberExpr::hierarchy),
            MdxSet::Filter { base, .. }
            | MdxSet::Sort { base, .. }
            | MdxSet::Head { base, .. }
            | MdxSet::Tail { base, .. }
            | MdxSet::Hierarchize(base) => base.hierarchy(),
            MdxSet::Union { left, .. }
            | MdxSet::Intersect { left, .. }
            | MdxSet::Except { left, .. } => left.hierarchy(),
            MdxSet::MultiUnion { sets, .. } => sets.first().and_then(MdxSet::hierarchy),
            MdxSet::CrossJoin(_) | MdxSet::Tuples(_) => None,
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the whole tree before anything is emitted.
    pub fn validate(&self) -> MdxResult<()> {
        match self {
            MdxSet::SubsetAll(h) | MdxSet::AllMembers(h) => h.validate(),
            MdxSet::SubsetToSet { hierarchy, subset } => {
                hierarchy.validate()?;
                if subset.is_empty() {
                    return Err(MdxError::invalid(format!(
                        "subset name is empty on {}",
                        hierarchy.to_tokens().serialize()
                    )));
                }
                Ok(())
            }
            MdxSet::Children(m) | MdxSet::Descendants { member: m, .. } => m.validate(),
            MdxSet::Elements(members) => members.iter().try_for_each(MemberExpr::validate),
            MdxSet::Filter {
                base,
                attribute,
                values,
                ..
            } => {
                base.validate()?;
                if attribute.is_empty() {
                    return Err(MdxError::invalid("filter attribute name is empty"));
                }
                if values.is_empty() {
                    return Err(MdxError::invalid(format!(
                        "filter on attribute '{}' has no values",
                        attribute
                    )));
                }
                if base.hierarchy().is_none() {
                    return Err(MdxError::invalid(format!(
                        "cannot filter on attribute '{}': base set has no single hierarchy",
                        attribute
                    )));
                }
                Ok(())
            }
            MdxSet::Sort { base, .. }
            | MdxSet::Head { base, .. }
            | MdxSet::Tail { base, .. }
            | MdxSet::Hierarchize(base) => base.validate(),
            MdxSet::Union { left, right, .. }
            | MdxSet::Intersect { left, right }
            | MdxSet::Except { left, right } => {
                left.validate()?;
                right.validate()
            }
            MdxSet::CrossJoin(sets) | MdxSet::MultiUnion { sets, .. } => {
                sets.iter().try_for_each(MdxSet::validate)
            }
            MdxSet::Tuples(tuples) => tuples.iter().try_for_each(MdxTuple::validate),
        }
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            MdxSet::SubsetAll(h) => {
                ts.call("TM1SUBSETALL", &[h.to_tokens()]);
            }
            MdxSet::AllMembers(h) => {
                ts.append(&h.to_tokens()).dot().push(Token::AllMembers);
            }
            MdxSet::SubsetToSet { hierarchy, subset } => {
                ts.call(
                    "TM1SubsetToSet",
                    &[
                        hierarchy.to_tokens(),
                        Token::LitString(subset.clone()).into(),
                    ],
                );
            }
            MdxSet::Children(m) => {
                ts.append(&m.to_tokens()).dot().push(Token::Children);
            }
            MdxSet::Descendants {
                member,
                level,
                flag,
            } => {
                let mut args = vec![member.to_tokens(), Token::LitInt(*level as i64).into()];
                if let Some(flag) = flag {
                    args.push(Token::Raw(flag.as_str().into()).into());
                }
                ts.call("DESCENDANTS", &args);
            }
            MdxSet::Elements(members) => {
                ts.lbrace();
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        ts.comma();
                    }
                    ts.append(&m.to_tokens());
                }
                ts.rbrace();
            }
            MdxSet::Filter {
                base,
                attribute,
                values,
                op,
            } => {
                let mut condition = TokenStream::new();
                if let Some(h) = base.hierarchy() {
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            condition.space().push(Token::Or).space();
                        }
                        condition
                            .append(&h.to_tokens())
                            .dot()
                            .push(Token::CurrentMember)
                            .dot()
                            .push(Token::Ident(attribute.clone()))
                            .space()
                            .push(op.token())
                            .space()
                            .push(Token::LitString(value.clone()));
                    }
                }
                ts.call("FILTER", &[base.to_tokens(), condition]);
            }
            MdxSet::Sort { base, ascending } => {
                let order = if *ascending { Token::Asc } else { Token::Desc };
                ts.call("TM1SORT", &[base.to_tokens(), order.into()]);
            }
            MdxSet::Head { base, count } => {
                ts.call("HEAD", &[base.to_tokens(), Token::LitInt(*count as i64).into()]);
            }
            MdxSet::Tail { base, count } => {
                ts.call("TAIL", &[base.to_tokens(), Token::LitInt(*count as i64).into()]);
            }
            MdxSet::Union { left, right, all } => {
                ts.append(&union_tokens(left.to_tokens(), right.to_tokens(), *all));
            }
            MdxSet::Intersect { left, right } => {
                ts.call("INTERSECT", &[left.to_tokens(), right.to_tokens()]);
            }
            MdxSet::Except { left, right } => {
                ts.call("EXCEPT", &[left.to_tokens(), right.to_tokens()]);
            }
            MdxSet::Hierarchize(base) => {
                ts.call("HIERARCHIZE", &[base.to_tokens()]);
            }
            MdxSet::CrossJoin(sets) => {
                let parts: Vec<TokenStream> = sets.iter().map(MdxSet::to_tokens).collect();
                ts.append(&crossjoin_tokens(parts));
            }
            MdxSet::MultiUnion { sets, all } => {
                let mut parts = sets.iter().map(MdxSet::to_tokens);
                match parts.next() {
                    None => {
                        ts.lbrace().rbrace();
                    }
                    Some(first) => {
                        let folded = parts.fold(first, |acc, next| union_tokens(acc, next, *all));
                        ts.append(&folded);
                    }
                }
            }
            MdxSet::Tuples(tuples) => {
                ts.lbrace();
                for (i, t) in tuples.iter().enumerate() {
                    if i > 0 {
                        ts.comma();
                    }
                    ts.append(&t.to_tokens());
                }
                ts.rbrace();
            }
        }
        ts
    }

    /// Validate, then render to MDX text.
    pub fn to_mdx(&self) -> MdxResult<String> {
        self.validate()?;
        Ok(self.to_tokens().serialize())
    }
}

impl std::fmt::Display for MdxSet {
    /// Renders without validation; use [`MdxSet::to_mdx`] to fail on
    /// incomplete sets.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_tokens().serialize())
    }
}

fn union_tokens(left: TokenStream, right: TokenStream, all: bool) -> TokenStream {
    let mut args = vec![left, right];
    if all {
        args.push(Token::All.into());
    }
    let mut ts = TokenStream::new();
    ts.call("UNION", &args);
    ts
}

/// Fold a list of rendered sets into nested `CROSSJOIN` calls.
///
/// Zero parts give `{}`, one part is returned unwrapped.
pub(crate) fn crossjoin_tokens(parts: Vec<TokenStream>) -> TokenStream {
    let mut parts = parts.into_iter();
    match parts.next() {
        None => {
            let mut ts = TokenStream::new();
            ts.lbrace().rbrace();
            ts
        }
        Some(first) => parts.fold(first, |acc, next| {
            let mut ts = TokenStream::new();
            ts.call("CROSSJOIN", &[acc, next]);
            ts
        }),
    }
}
