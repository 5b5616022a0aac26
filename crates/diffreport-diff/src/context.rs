//! Diff context: the accumulator a comparison writes its records into.

use diffreport_types::Kind;
use serde::Serialize;
use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::record::{DiffKind, DiffRecord, Path, PLACEHOLDER};

/// Ordered list of detected changes plus the current traversal path.
///
/// A context belongs to exactly one comparison; it is not synchronized and
/// must not be shared between concurrent comparisons.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiffContext {
    path: Path,
    records: Vec<DiffRecord>,
}

impl DiffContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current traversal path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in detection order.
    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DiffRecord> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of `New` records.
    pub fn additions(&self) -> usize {
        self.count(DiffKind::New)
    }

    /// Number of `Delete` records.
    pub fn removals(&self) -> usize {
        self.count(DiffKind::Delete)
    }

    /// Number of `Update` records.
    pub fn updates(&self) -> usize {
        self.count(DiffKind::Update)
    }

    /// Number of `ChangeType` records.
    pub fn type_changes(&self) -> usize {
        self.count(DiffKind::ChangeType)
    }

    fn count(&self, kind: DiffKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// Enter `key` within `category`. Nested entries of the same category stack.
    pub fn step_in(&mut self, category: &str, key: &str) -> &mut Self {
        self.path.push(category, key);
        debug!(category, key, depth = self.path.len(), "step in");
        self
    }

    /// Leave the innermost entry for `category`.
    pub fn step_out(&mut self, category: &str) -> &mut Self {
        if self.path.pop_category(category).is_none() {
            debug!(category, "step out of a category that was never entered");
        }
        self
    }

    /// Append a record located at the current path, with `category -> key`
    /// as its innermost segment.
    pub fn record(
        &mut self,
        kind: DiffKind,
        category: &str,
        key: &str,
        description: &str,
        from: &str,
        to: &str,
    ) -> &mut Self {
        let path = self.path.with_leaf(category, key);
        self.push(kind, category, key, path, description, from, to)
    }

    /// Append a record for property `key` of the object located at `frame`.
    ///
    /// An empty frame has no owning object, so the record is placed like
    /// [`DiffContext::record`] would place it relative to `frame`.
    #[allow(clippy::too_many_arguments)]
    pub fn record_at(
        &mut self,
        frame: &Path,
        kind: DiffKind,
        category: &str,
        key: &str,
        description: &str,
        from: &str,
        to: &str,
    ) -> &mut Self {
        let path = frame
            .descend(key)
            .unwrap_or_else(|| frame.with_leaf(category, key));
        self.push(kind, category, key, path, description, from, to)
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        kind: DiffKind,
        category: &str,
        key: &str,
        path: Path,
        description: &str,
        from: &str,
        to: &str,
    ) -> &mut Self {
        debug!(%kind, category, key, %path, "diff recorded");
        self.records.push(DiffRecord {
            kind,
            category: category.to_string(),
            key: key.to_string(),
            path,
            description: description.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    pub fn value_added(&mut self, category: &str, key: &str, current: &str) -> &mut Self {
        self.record(DiffKind::New, category, key, "", "", current)
    }

    pub fn value_removed(&mut self, category: &str, key: &str, past: &str) -> &mut Self {
        self.record(DiffKind::Delete, category, key, "", past, "")
    }

    pub fn value_updated(
        &mut self,
        category: &str,
        key: &str,
        past: &str,
        current: &str,
    ) -> &mut Self {
        self.record(DiffKind::Update, category, key, "", past, current)
    }

    pub fn object_added(&mut self, category: &str, key: &str) -> &mut Self {
        self.record(DiffKind::New, category, key, "", "", PLACEHOLDER)
    }

    pub fn object_removed(&mut self, category: &str, key: &str) -> &mut Self {
        self.record(DiffKind::Delete, category, key, "", PLACEHOLDER, "")
    }

    pub fn object_updated(&mut self, category: &str, key: &str) -> &mut Self {
        self.record(DiffKind::Update, category, key, "", PLACEHOLDER, PLACEHOLDER)
    }

    pub fn change_type(&mut self, category: &str, key: &str, past: Kind, current: Kind) -> &mut Self {
        self.record(DiffKind::ChangeType, category, key, "", past.name(), current.name())
    }

    /// Pretty JSON of the whole context, for debugging.
    pub fn to_debug_json(&self) -> DiffResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DiffError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_empty() {
        let ctx = DiffContext::new();
        assert!(ctx.is_empty());
        assert!(ctx.path().is_empty());
    }

    #[test]
    fn step_in_and_out_track_path() {
        let mut ctx = DiffContext::new();
        ctx.step_in("Study", "S").step_in("MDV", "M");
        assert_eq!(ctx.path().get("Study"), Some("S"));
        assert_eq!(ctx.path().get("MDV"), Some("M"));

        ctx.step_out("MDV");
        assert_eq!(ctx.path().get("MDV"), None);
        assert_eq!(ctx.path().len(), 1);
    }

    #[test]
    fn reentering_a_category_nests() {
        let mut ctx = DiffContext::new();
        ctx.step_in("Form", "outer").step_in("Form", "inner");
        assert_eq!(ctx.path().get("Form"), Some("inner"));
        ctx.step_out("Form");
        assert_eq!(ctx.path().get("Form"), Some("outer"));
    }

    #[test]
    fn step_out_of_unknown_category_is_noop() {
        let mut ctx = DiffContext::new();
        ctx.step_in("A", "a").step_out("B");
        assert_eq!(ctx.path().len(), 1);
    }

    #[test]
    fn record_snapshots_path_with_leaf() {
        let mut ctx = DiffContext::new();
        ctx.step_in("Study", "S");
        ctx.value_updated("Form", "F1", "a", "b");
        ctx.step_out("Study");

        let r = &ctx.records()[0];
        assert_eq!(r.kind, DiffKind::Update);
        assert_eq!(r.path.get("Study"), Some("S"));
        assert_eq!(r.path.get("Form"), Some("F1"));
        // Later path changes do not leak into the snapshot.
        assert!(ctx.path().is_empty());
        assert_eq!(r.path.len(), 2);
    }

    #[test]
    fn record_overrides_innermost_same_category() {
        let mut ctx = DiffContext::new();
        ctx.step_in("Form", "A");
        ctx.value_added("Form", "B", "v");
        assert_eq!(ctx.records()[0].path.len(), 1);
        assert_eq!(ctx.records()[0].path.get("Form"), Some("B"));
    }

    #[test]
    fn record_overrides_outer_category_without_duplicating_it() {
        let mut ctx = DiffContext::new();
        ctx.step_in("Study", "S").step_in("Form", "F");
        ctx.value_added("Study", "T", "v");

        let p = &ctx.records()[0].path;
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("Study"), Some("T"));
        assert_eq!(p.get("Form"), Some("F"));
        // The context's own path is untouched.
        assert_eq!(ctx.path().get("Study"), Some("S"));
    }

    #[test]
    fn record_at_empty_frame_uses_category_leaf() {
        let mut ctx = DiffContext::new();
        ctx.record_at(&Path::new(), DiffKind::New, "Obj", "x", "", "", "1");
        let p = &ctx.records()[0].path;
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("Obj"), Some("x"));
    }

    #[test]
    fn record_at_descends_from_frame() {
        let mut ctx = DiffContext::new();
        let frame: Path = [("Obj", "k")].into_iter().collect();
        ctx.record_at(&frame, DiffKind::New, "Obj", "x", "", "", "1");
        let r = &ctx.records()[0];
        assert_eq!(r.category, "Obj");
        assert_eq!(r.key, "x");
        assert_eq!(r.path.get("k"), Some("x"));
    }

    #[test]
    fn object_wrappers_use_placeholder() {
        let mut ctx = DiffContext::new();
        ctx.object_added("Form", "a")
            .object_removed("Form", "b")
            .object_updated("Form", "c");

        let r = ctx.records();
        assert_eq!((r[0].from.as_str(), r[0].to.as_str()), ("", PLACEHOLDER));
        assert_eq!((r[1].from.as_str(), r[1].to.as_str()), (PLACEHOLDER, ""));
        assert_eq!((r[2].from.as_str(), r[2].to.as_str()), (PLACEHOLDER, PLACEHOLDER));
        assert_eq!(ctx.additions(), 1);
        assert_eq!(ctx.removals(), 1);
        assert_eq!(ctx.updates(), 1);
    }

    #[test]
    fn value_wrappers_carry_renderings() {
        let mut ctx = DiffContext::new();
        ctx.value_added("T", "a", "1").value_removed("T", "b", "2");
        assert_eq!(ctx.records()[0].to, "1");
        assert_eq!(ctx.records()[0].from, "");
        assert_eq!(ctx.records()[1].from, "2");
        assert_eq!(ctx.records()[1].to, "");
    }

    #[test]
    fn change_type_names_kinds() {
        let mut ctx = DiffContext::new();
        ctx.change_type("T", "x", Kind::Number, Kind::String);
        assert_eq!(ctx.type_changes(), 1);
        assert_eq!(ctx.records()[0].from, "number");
        assert_eq!(ctx.records()[0].to, "string");
    }

    #[test]
    fn records_keep_detection_order() {
        let mut ctx = DiffContext::new();
        ctx.value_added("T", "z", "1").value_added("T", "a", "2");
        let keys: Vec<_> = ctx.records().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn debug_json_contains_records() {
        let mut ctx = DiffContext::new();
        ctx.object_added("Form", "INIT");
        let json: serde_json::Value = serde_json::from_str(&ctx.to_debug_json().unwrap()).unwrap();
        assert_eq!(json["records"][0]["kind"], "New");
        assert_eq!(json["records"][0]["to"], "{...}");
        assert_eq!(json["path"], serde_json::json!([]));
    }
}
