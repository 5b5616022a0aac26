//! Foundation types for diffreport.
//!
//! Both sides of a comparison are normalized into the same generic tree
//! before the diff engine ever looks at them. This crate defines that tree
//! and the normalization step from arbitrary `serde` types.
//!
//! # Key Types
//!
//! - [`Value`] — Closed tagged union over null, bool, number, string, array and object
//! - [`Kind`] — The kind of a [`Value`], used to detect type changes
//! - [`normalize`] — Render a typed value and reparse it as a [`Value`]

pub mod error;
pub mod normalize;
pub mod value;

pub use error::TypeError;
pub use normalize::{normalize, normalize_option, parse_json, parse_json_slice};
pub use value::{Kind, Map, Value};
