//! # mdxkit
//!
//! Typed MDX query building and cellset decoding for TM1-style OLAP servers.
//!
//! ## Architecture
//!
//! Building and decoding are independent halves that only share the idea
//! of a coordinate space:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Members / Tuples / Sets  (or a TOML definition)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │              MdxQuery (axes, slicer, WITH)               │
//! │              + MultiMdxBuilder (subset variants)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [token stream]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     MDX text                             │
//! └─────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Cellset JSON                            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model conversion]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Cellset (axes, tuples, cells)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [mixed-radix decode]
//! ┌─────────────────────────────────────────────────────────┐
//! │      "[Dim1].[E3]|[Dim2].[E1]" -> value                  │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cellset;
pub mod config;
pub mod mdx;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::cellset::{
        decode, decode_json, Cell, CellContent, Cellset, CellsetAxis, CellsetError,
        CellsetResult, CellsetTuple, CoordinatePolicy, DecodeOptions, DecodedContent,
    };
    pub use crate::config::Settings;
    pub use crate::mdx::{
        // Constructors
        all_members,
        calculated,
        children,
        construct_mdx,
        crossjoin,
        current_member,
        descendants,
        elements,
        member,
        multi_union,
        property,
        subset,
        subset_all,
        tuples,
        // Types
        Axis,
        ComparisonOp,
        DescFlag,
        DimensionSelection,
        HierarchyRef,
        MdxError,
        MdxQuery,
        MdxResult,
        MdxSet,
        MdxTuple,
        MemberExpr,
        MultiMdxBuilder,
        QueryDefinition,
        SuppressMode,
        Variation,
    };
}
