//! Query definitions - MDX queries described in TOML.
//!
//! ```toml
//! cube = "Sales"
//!
//! [[members]]
//! dimension = "Measures"
//! name = "Variance"
//! formula = "[Measures].[Actual] - [Measures].[Budget]"
//!
//! [[axes]]
//! index = 0
//! [[axes.sets]]
//! kind = "elements"
//! dimension = "Year"
//! elements = ["2024", "2025"]
//!
//! [[axes]]
//! index = 1
//! non_empty = true
//! [[axes.sets]]
//! kind = "subset_all"
//! dimension = "Region"
//! steps = [
//!     { op = "filter", attribute = "Type", values = ["Country"] },
//!     { op = "sort", ascending = true },
//!     { op = "head", count = 10 },
//! ]
//!
//! [where]
//! Scenario = "Actual"
//!
//! [vary]
//! dimension = "Product"
//! subsets = ["Bikes", "Cars"]
//! axis = 1
//! ```
//!
//! Definitions are plain data; [`QueryDefinition::lower`] turns them into
//! an [`MdxQuery`] or a [`MultiMdxBuilder`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{MdxError, MdxResult};
use super::member::{calculated, member, member_from_unique_name, MemberExpr};
use super::multi::{MultiMdxBuilder, Variation};
use super::query::{Axis, MdxQuery};
use super::set::{self, ComparisonOp, DescFlag, MdxSet, SetOperator};

// =============================================================================
// Definition Types
// =============================================================================

/// Root of a query definition document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDefinition {
    pub cube: String,

    #[serde(default)]
    pub axes: Vec<AxisDefinition>,

    /// Calculated members declared in `WITH`.
    #[serde(default)]
    pub members: Vec<CalculatedMemberDefinition>,

    /// Slicer: dimension name to element name, emitted in key order. An
    /// element written as a unique name may address an alternate hierarchy.
    #[serde(default, rename = "where")]
    pub slicer: BTreeMap<String, String>,

    #[serde(default)]
    pub vary: Option<VaryDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AxisDefinition {
    pub index: u32,

    #[serde(default)]
    pub non_empty: bool,

    #[serde(default)]
    pub sets: Vec<SetDefinition>,
}

/// One set on an axis.
///
/// `kind` is one of `subset_all`, `all_members`, `subset`, `elements`,
/// `children`, `descendants`. Fields a kind does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SetDefinition {
    pub kind: String,

    pub dimension: String,

    #[serde(default)]
    pub hierarchy: String,

    /// Subset name for `kind = "subset"`.
    #[serde(default)]
    pub subset: Option<String>,

    /// Element names for `kind = "elements"`.
    #[serde(default)]
    pub elements: Vec<String>,

    /// Root element for `children` and `descendants`, by name or unique name.
    #[serde(default)]
    pub member: Option<String>,

    #[serde(default)]
    pub level: Option<u32>,

    #[serde(default)]
    pub flag: Option<String>,

    /// Chain operations applied in order.
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// A chained set operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StepDefinition {
    pub op: String,

    #[serde(default)]
    pub attribute: Option<String>,

    #[serde(default)]
    pub values: Vec<String>,

    /// Filter comparison, `=` when absent.
    #[serde(default)]
    pub comparison: Option<String>,

    #[serde(default)]
    pub ascending: Option<bool>,

    #[serde(default)]
    pub count: Option<u32>,

    /// Keep duplicates in `union`.
    #[serde(default)]
    pub all: bool,

    /// Right-hand operand for `union`, `intersect` and `except`.
    #[serde(default)]
    pub set: Option<Box<SetDefinition>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatedMemberDefinition {
    pub dimension: String,

    #[serde(default)]
    pub hierarchy: String,

    pub name: String,

    pub formula: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaryDefinition {
    pub dimension: String,

    #[serde(default)]
    pub hierarchy: String,

    pub subsets: Vec<String>,

    pub axis: u32,
}

/// Result of lowering a definition.
#[derive(Debug, Clone, PartialEq)]
pub enum LoweredQuery {
    Single(MdxQuery),
    Variants(MultiMdxBuilder),
}

impl LoweredQuery {
    /// One string for a single query, one per subset for variants.
    pub fn to_mdx_strings(&self) -> MdxResult<Vec<String>> {
        match self {
            LoweredQuery::Single(query) => Ok(vec![query.to_mdx()?]),
            LoweredQuery::Variants(builder) => builder.to_mdx_strings(),
        }
    }
}

// =============================================================================
// Parsing & Lowering
// =============================================================================

impl QueryDefinition {
    pub fn from_toml(source: &str) -> MdxResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> MdxResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            MdxError::definition(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&source)
    }

    pub fn lower(&self) -> MdxResult<LoweredQuery> {
        let mut query = MdxQuery::new(&self.cube);

        for def in &self.members {
            query = query.with_member(calculated(
                &def.dimension,
                &def.hierarchy,
                &def.name,
                &def.formula,
            ));
        }

        for def in &self.axes {
            if query.axes.contains_key(&def.index) {
                return Err(MdxError::definition(format!(
                    "axis {} is defined more than once",
                    def.index
                )));
            }
            let mut axis = Axis::new().non_empty(def.non_empty);
            for set_def in &def.sets {
                axis.push(lower_set(set_def)?);
            }
            query = query.with_axis(def.index, axis);
        }

        for (dimension, element) in &self.slicer {
            query = query.add_member_to_where(member_ref(dimension, "", element));
        }

        Ok(match &self.vary {
            None => LoweredQuery::Single(query),
            Some(vary) => LoweredQuery::Variants(MultiMdxBuilder::new(
                query,
                Variation::new(
                    &vary.dimension,
                    &vary.hierarchy,
                    vary.subsets.clone(),
                    vary.axis,
                ),
            )),
        })
    }
}

/// An element name, or a full unique name (`[Dim].[Hier].[Elem]`) which
/// then decides dimension and hierarchy itself.
fn member_ref(dimension: &str, hierarchy: &str, reference: &str) -> MemberExpr {
    if reference.starts_with('[') && reference.contains("].[") {
        member_from_unique_name(reference)
    } else {
        member(dimension, hierarchy, reference)
    }
}

fn lower_set(def: &SetDefinition) -> MdxResult<MdxSet> {
    let dim = def.dimension.as_str();
    let hier = def.hierarchy.as_str();

    let root = || {
        def.member
            .as_deref()
            .map(|m| member_ref(dim, hier, m))
            .ok_or_else(|| MdxError::definition(format!("'{}' set needs a member", def.kind)))
    };

    let base = match def.kind.as_str() {
        "subset_all" => set::subset_all(dim, hier),
        "all_members" => set::all_members(dim, hier),
        "subset" => {
            let name = def.subset.as_deref().ok_or_else(|| {
                MdxError::definition(format!("subset set on '{}' needs a subset name", dim))
            })?;
            set::subset(dim, hier, name)
        }
        "elements" => set::elements(
            def.elements
                .iter()
                .map(|e| member(dim, hier, e))
                .collect(),
        ),
        "children" => set::children(root()?),
        "descendants" => {
            let flag = def
                .flag
                .as_deref()
                .map(str::parse::<DescFlag>)
                .transpose()?;
            set::descendants(root()?, def.level.unwrap_or(1), flag)
        }
        other => {
            return Err(MdxError::definition(format!("unknown set kind '{}'", other)));
        }
    };

    def.steps.iter().try_fold(base, apply_step)
}

fn apply_step(base: MdxSet, step: &StepDefinition) -> MdxResult<MdxSet> {
    let operator: SetOperator = step.op.parse()?;

    let operand = || {
        step.set
            .as_deref()
            .ok_or_else(|| MdxError::definition(format!("'{}' step needs a set", step.op)))
            .and_then(lower_set)
    };
    let count = || {
        step.count
            .ok_or_else(|| MdxError::definition(format!("'{}' step needs a count", step.op)))
    };

    Ok(match operator {
        SetOperator::Filter => {
            let attribute = step
                .attribute
                .as_deref()
                .ok_or_else(|| MdxError::definition("'filter' step needs an attribute"))?;
            let op: ComparisonOp = step.comparison.as_deref().unwrap_or("=").parse()?;
            base.filter_by_attribute_with(attribute, step.values.iter().cloned(), op)
        }
        SetOperator::Sort => base.tm1_sort(step.ascending.unwrap_or(true)),
        SetOperator::Head => base.head(count()?),
        SetOperator::Tail => base.tail(count()?),
        SetOperator::Hierarchize => base.hierarchize(),
        SetOperator::Union => base.union(operand()?, step.all),
        SetOperator::Intersect => base.intersect(operand()?),
        SetOperator::Except => base.except(operand()?),
    })
}
