//! MDX generation module.
//!
//! A typed builder for TM1-flavoured MDX. It includes:
//!
//! - [`member`] - Hierarchy references and member expressions
//! - [`tuple`] - Member tuples
//! - [`set`] - Set expressions and set operations
//! - [`query`] - SELECT query builder
//! - [`multi`] - One query per subset variant
//! - [`selection`] - Classic `ON ROWS` / `ON COLUMNS` queries from dimension selections
//! - [`definition`] - Queries described in TOML
//! - [`names`] - Bracket quoting and unique-name helpers
//! - [`token`] - Token types for MDX generation

pub mod definition;
pub mod error;
pub mod member;
pub mod multi;
pub mod names;
pub mod query;
pub mod selection;
pub mod set;
pub mod token;
pub mod tuple;

pub use definition::{LoweredQuery, QueryDefinition};
pub use error::{MdxError, MdxResult};
pub use member::{
    calculated, current_member, member, member_from_unique_name, property, HierarchyRef,
    MemberExpr,
};
pub use multi::{MultiMdxBuilder, Variation};
pub use query::{Axis, AxisEntry, MdxQuery, COLUMNS, ROWS};
pub use selection::{construct_mdx, construct_mdx_axis, DimensionSelection, SelectionType, SuppressMode};
pub use set::{
    all_members, children, crossjoin, descendants, elements, multi_union, subset, subset_all,
    tuples, ComparisonOp, DescFlag, MdxSet, SetOperator,
};
pub use token::{Token, TokenStream};
pub use tuple::MdxTuple;
