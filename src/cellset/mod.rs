//! Cellset decoding module.
//!
//! Turns a query result into a coordinate-keyed mapping:
//!
//! - [`model`] - Typed cellset, validated once at the JSON boundary
//! - [`radix`] - Ordinal to per-axis tuple index arithmetic
//! - [`decode`] - Coordinate reconstruction and key building

pub mod decode;
pub mod error;
pub mod model;
pub mod radix;

pub use decode::{
    decode, decode_json, sort_coordinates, CellContent, CoordinatePolicy, DecodeOptions,
    DecodedContent, DroppedCoordinate,
};
pub use error::{CellsetError, CellsetResult};
pub use model::{Cell, Cellset, CellsetAxis, CellsetMember, CellsetTuple};
pub use radix::{cell_count, ordinal_of, tuple_indices};
