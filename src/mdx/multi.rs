//! Query variants - one query per named subset on a chosen axis.
//!
//! Each variant is built from a clone of the base query, so the stored
//! axis content is never touched and variants cannot leak into each other.

use tracing::debug;

use super::error::MdxResult;
use super::member::HierarchyRef;
use super::query::MdxQuery;
use super::set::MdxSet;

/// Which hierarchy to vary, over which subsets, on which axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    pub hierarchy: HierarchyRef,
    pub subsets: Vec<String>,
    pub axis: u32,
}

impl Variation {
    pub fn new(dimension: &str, hierarchy: &str, subsets: Vec<String>, axis: u32) -> Self {
        Self {
            hierarchy: HierarchyRef::new(dimension, hierarchy),
            subsets,
            axis,
        }
    }
}

/// A base query plus a [`Variation`].
#[derive(Debug, Clone, PartialEq)]
#[must_use = "MultiMdxBuilder has no effect until converted with to_mdx_strings()"]
pub struct MultiMdxBuilder {
    query: MdxQuery,
    variation: Variation,
}

impl MultiMdxBuilder {
    pub fn new(query: MdxQuery, variation: Variation) -> Self {
        Self { query, variation }
    }

    /// Shorthand mirroring the query constructor.
    pub fn for_cube(
        cube: &str,
        dimension: &str,
        hierarchy: &str,
        subsets: Vec<String>,
        axis: u32,
    ) -> Self {
        Self::new(
            MdxQuery::new(cube),
            Variation::new(dimension, hierarchy, subsets, axis),
        )
    }

    pub fn query(&self) -> &MdxQuery {
        &self.query
    }

    pub fn variation(&self) -> &Variation {
        &self.variation
    }

    /// Modify the base query in place (e.g. to add axes or a slicer).
    pub fn edit(mut self, f: impl FnOnce(MdxQuery) -> MdxQuery) -> Self {
        self.query = f(self.query);
        self
    }

    /// The query for one subset: the target axis as it currently is, plus
    /// `TM1SubsetToSet(<hierarchy>, '<subset>')` appended last.
    pub fn variant(&self, subset: &str) -> MdxQuery {
        let mut query = self.query.clone();
        query
            .axes
            .entry(self.variation.axis)
            .or_default()
            .push(MdxSet::SubsetToSet {
                hierarchy: self.variation.hierarchy.clone(),
                subset: subset.to_string(),
            });
        query
    }

    /// One query per subset, in subset order.
    pub fn variants(&self) -> impl Iterator<Item = MdxQuery> + '_ {
        self.variation.subsets.iter().map(|s| self.variant(s))
    }

    /// Render every variant. Fails on the first invalid variant and
    /// returns no strings in that case.
    pub fn to_mdx_strings(&self) -> MdxResult<Vec<String>> {
        let mdx = self
            .variants()
            .map(|q| q.to_mdx())
            .collect::<MdxResult<Vec<_>>>()?;
        debug!(
            variants = mdx.len(),
            axis = self.variation.axis,
            "generated MDX variants"
        );
        Ok(mdx)
    }
}
