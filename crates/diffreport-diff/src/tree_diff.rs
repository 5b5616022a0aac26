//! Tree-level diff: compare two normalized snapshots and record every change.
//!
//! The walk reconciles the key sets of two objects, compares scalars by
//! kind and recurses into nested objects. Each recursion level threads its
//! own immutable frame path, so records carry a correct location no matter
//! how deep or how often a category is re-entered.

use std::collections::BTreeSet;

use diffreport_types::{normalize_option, Map, Value};
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::DiffContext;
use crate::error::{DiffError, DiffResult};
use crate::record::{DiffKind, Path, PLACEHOLDER};

/// Compare two snapshots rooted at `category`/`key`.
///
/// A missing side (`Null`) reports the whole root as new or deleted. When
/// both sides are present they must be objects.
///
/// On a fatal error the records already in `ctx` are kept but do not
/// describe the full difference.
pub fn compare(
    ctx: &mut DiffContext,
    category: &str,
    key: &str,
    past: &Value,
    current: &Value,
) -> DiffResult<()> {
    match (past, current) {
        (Value::Null, Value::Null) => Ok(()),
        (Value::Null, _) => {
            ctx.object_added(category, key);
            Ok(())
        }
        (_, Value::Null) => {
            ctx.object_removed(category, key);
            Ok(())
        }
        (Value::Object(p), Value::Object(c)) => {
            ctx.step_in(category, key);
            let frame = ctx.path().clone();
            let result = diff_object_properties(ctx, &frame, category, key, p, c);
            ctx.step_out(category);
            result
        }
        _ => {
            warn!(category, key, past = %past.kind(), current = %current.kind(), "comparison root is not an object");
            Err(DiffError::RootNotObject {
                category: category.to_string(),
                key: key.to_string(),
                past: past.kind(),
                current: current.kind(),
            })
        }
    }
}

/// Normalize two optional typed values and compare them.
///
/// Normalization errors are returned before any record is emitted.
pub fn compare_serializable<T: Serialize>(
    ctx: &mut DiffContext,
    category: &str,
    key: &str,
    past: Option<&T>,
    current: Option<&T>,
) -> DiffResult<()> {
    let past = normalize_option(past)?;
    let current = normalize_option(current)?;
    compare(ctx, category, key, &past, &current)
}

/// Compare two snapshots into a fresh context.
pub fn diff_values(
    category: &str,
    key: &str,
    past: &Value,
    current: &Value,
) -> DiffResult<DiffContext> {
    let mut ctx = DiffContext::new();
    compare(&mut ctx, category, key, past, current)?;
    Ok(ctx)
}

/// Sorted union of the keys of every map.
pub fn keys_of<'a>(maps: &[&'a Map]) -> BTreeSet<&'a str> {
    maps.iter()
        .flat_map(|m| m.keys().map(String::as_str))
        .collect()
}

/// Compare the properties of object `key` (of `category`) located at `frame`.
///
/// `frame` is never empty: [`compare`] enters the root before the walk.
pub(crate) fn diff_object_properties(
    ctx: &mut DiffContext,
    frame: &Path,
    category: &str,
    key: &str,
    past: &Map,
    current: &Map,
) -> DiffResult<()> {
    for prop in keys_of(&[past, current]) {
        match (past.get(prop), current.get(prop)) {
            (None, None) => continue,
            (None, Some(cv)) => property_added(ctx, frame, category, prop, cv)?,
            (Some(pv), None) => property_removed(ctx, frame, category, prop, pv)?,
            (Some(pv), Some(cv)) => diff_value(ctx, frame, category, key, prop, pv, cv)?,
        }
    }
    Ok(())
}

/// Compare property `property_key` of object `object_key`.
///
/// A kind change is reported as `ChangeType` without comparing values.
/// Nested objects are walked with `object_key` as their category.
pub(crate) fn diff_value(
    ctx: &mut DiffContext,
    frame: &Path,
    category: &str,
    object_key: &str,
    property_key: &str,
    past: &Value,
    current: &Value,
) -> DiffResult<()> {
    let (pk, ck) = (past.kind(), current.kind());
    if pk != ck {
        ctx.record_at(frame, DiffKind::ChangeType, category, property_key, "", pk.name(), ck.name());
        return Ok(());
    }

    match (past, current) {
        (Value::Object(p), Value::Object(c)) => {
            let child = frame
                .descend(property_key)
                .unwrap_or_else(|| frame.with_leaf(object_key, property_key));
            debug!(frame = %child, "descending into nested object");
            diff_object_properties(ctx, &child, object_key, property_key, p, c)
        }
        _ => match (past.render(), current.render()) {
            (Some(from), Some(to)) => {
                if !past.scalar_eq(current) {
                    ctx.record_at(frame, DiffKind::Update, category, property_key, "", &from, &to);
                }
                Ok(())
            }
            _ => Err(unsupported(frame, property_key, past)),
        },
    }
}

fn property_added(
    ctx: &mut DiffContext,
    frame: &Path,
    category: &str,
    key: &str,
    current: &Value,
) -> DiffResult<()> {
    let to = render_leaf(frame, key, current)?;
    ctx.record_at(frame, DiffKind::New, category, key, "", "", &to);
    Ok(())
}

fn property_removed(
    ctx: &mut DiffContext,
    frame: &Path,
    category: &str,
    key: &str,
    past: &Value,
) -> DiffResult<()> {
    let from = render_leaf(frame, key, past)?;
    ctx.record_at(frame, DiffKind::Delete, category, key, "", &from, "");
    Ok(())
}

/// Rendering of a value that appears on one side only.
fn render_leaf(frame: &Path, key: &str, value: &Value) -> DiffResult<String> {
    match value {
        Value::Object(_) => Ok(PLACEHOLDER.to_string()),
        other => other.render().ok_or_else(|| unsupported(frame, key, other)),
    }
}

fn unsupported(frame: &Path, key: &str, value: &Value) -> DiffError {
    warn!(at = %frame, key, kind = %value.kind(), "unsupported value kind, stopping diff");
    DiffError::UnsupportedKind {
        at: frame.clone(),
        key: key.to_string(),
        kind: value.kind(),
    }
}
