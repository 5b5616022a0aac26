//! Diff engine for diffreport.
//!
//! Compares two snapshots normalized into [`diffreport_types::Value`] and
//! produces a flat, ordered list of typed change records: values that were
//! added, removed, updated, or changed kind.
//!
//! # Key Types
//!
//! - [`DiffContext`] -- Accumulator of records plus the caller's traversal path
//! - [`DiffRecord`] / [`DiffKind`] -- One detected change
//! - [`Path`] / [`PathSegment`] -- Location of a change as (category, key) pairs
//! - [`compare`] -- Entry point of the recursive tree walk
//!
//! ```
//! use diffreport_diff::{diff_values, DiffKind};
//! use diffreport_types::Value;
//! use serde_json::json;
//!
//! let past = Value::from(json!({"x": "1"}));
//! let current = Value::from(json!({"x": "2"}));
//! let ctx = diff_values("Obj", "k", &past, &current).unwrap();
//! assert_eq!(ctx.records()[0].kind, DiffKind::Update);
//! ```

pub mod context;
pub mod error;
pub mod record;
pub mod tree_diff;

pub use context::DiffContext;
pub use error::{DiffError, DiffResult};
pub use record::{DiffKind, DiffRecord, Path, PathSegment, PLACEHOLDER};
pub use tree_diff::{compare, compare_serializable, diff_values, keys_of};
