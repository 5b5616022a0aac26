//! Diff records and the traversal path they are reported at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rendering used for a composite value in place of its content.
pub const PLACEHOLDER: &str = "{...}";

/// What happened to a value between the two snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiffKind {
    New,
    Delete,
    Update,
    ChangeType,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::New => "New",
            DiffKind::Delete => "Delete",
            DiffKind::Update => "Update",
            DiffKind::ChangeType => "ChangeType",
        }
    }

    /// The kind reported when the two snapshots are swapped.
    pub fn inverse(&self) -> DiffKind {
        match self {
            DiffKind::New => DiffKind::Delete,
            DiffKind::Delete => DiffKind::New,
            other => *other,
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One level of a traversal path: the key being visited within a category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub category: String,
    pub key: String,
}

impl PathSegment {
    pub fn new(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            key: key.into(),
        }
    }
}

/// Ordered list of (category, key) pairs, outermost first.
///
/// Unlike a plain category-to-key map, re-entering a category at a deeper
/// level nests a new segment instead of overwriting the outer one.
/// Serialized as an ordered array of `{category, key}` objects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The key of the innermost segment for `category`.
    pub fn get(&self, category: &str) -> Option<&str> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.category == category)
            .map(|s| s.key.as_str())
    }

    pub fn push(&mut self, category: impl Into<String>, key: impl Into<String>) {
        self.segments.push(PathSegment::new(category, key));
    }

    /// Remove the innermost segment for `category`, if any.
    pub fn pop_category(&mut self, category: &str) -> Option<PathSegment> {
        let idx = self.segments.iter().rposition(|s| s.category == category)?;
        Some(self.segments.remove(idx))
    }

    /// Copy of this path with `category -> key`.
    ///
    /// The innermost segment for `category` has its key replaced wherever it
    /// sits; a category not on the path is appended.
    pub fn with_leaf(&self, category: &str, key: &str) -> Path {
        let mut path = self.clone();
        match path.segments.iter_mut().rev().find(|s| s.category == category) {
            Some(segment) => segment.key = key.to_string(),
            None => path.push(category, key),
        }
        path
    }

    /// Copy of this path extended by one level: the innermost key becomes
    /// the category under which `key` is visited. `None` on an empty path.
    pub fn descend(&self, key: &str) -> Option<Path> {
        let category = self.last()?.key.clone();
        let mut path = self.clone();
        path.push(category, key);
        Some(path)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, s) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{}:{}", s.category, s.key)?;
        }
        Ok(())
    }
}

impl<C: Into<String>, K: Into<String>> FromIterator<(C, K)> for Path {
    fn from_iter<I: IntoIterator<Item = (C, K)>>(iter: I) -> Self {
        Self {
            segments: iter
                .into_iter()
                .map(|(c, k)| PathSegment::new(c, k))
                .collect(),
        }
    }
}

/// A single detected change.
///
/// `category` is the entity type the changed value belongs to, `key` the
/// property (or entity key) that changed, and `path` the full location at
/// the time the change was detected.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffRecord {
    pub kind: DiffKind,
    pub category: String,
    pub key: String,
    pub path: Path,
    pub description: String,
    pub from: String,
    pub to: String,
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}[{}] at {}: {:?} -> {:?}",
            self.kind, self.category, self.key, self.path, self.from, self.to
        )?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(pairs: &[(&str, &str)]) -> Path {
        pairs.iter().copied().collect()
    }

    #[test]
    fn with_leaf_appends_new_category() {
        let p = path(&[("Study", "S")]).with_leaf("Form", "INIT");
        assert_eq!(p, path(&[("Study", "S"), ("Form", "INIT")]));
    }

    #[test]
    fn with_leaf_overrides_innermost_same_category() {
        let p = path(&[("Study", "S"), ("Form", "A")]).with_leaf("Form", "B");
        assert_eq!(p, path(&[("Study", "S"), ("Form", "B")]));
    }

    #[test]
    fn with_leaf_overrides_outer_segment_in_place() {
        let p = path(&[("Study", "S"), ("Form", "F")]).with_leaf("Study", "T");
        assert_eq!(p, path(&[("Study", "T"), ("Form", "F")]));
    }

    #[test]
    fn with_leaf_overrides_innermost_of_repeated_category() {
        let p = path(&[("Form", "A"), ("A", "x"), ("Form", "B")]).with_leaf("Form", "C");
        assert_eq!(p, path(&[("Form", "A"), ("A", "x"), ("Form", "C")]));
    }

    #[test]
    fn descend_chains_keys_into_categories() {
        let p = path(&[("Obj", "k")]).descend("a").unwrap().descend("b").unwrap();
        assert_eq!(p, path(&[("Obj", "k"), ("k", "a"), ("a", "b")]));
    }

    #[test]
    fn descend_from_empty_path_is_none() {
        assert!(Path::new().descend("a").is_none());
    }

    #[test]
    fn pop_category_removes_innermost_only() {
        let mut p = path(&[("Form", "A"), ("X", "y"), ("Form", "B")]);
        let popped = p.pop_category("Form").unwrap();
        assert_eq!(popped.key, "B");
        assert_eq!(p, path(&[("Form", "A"), ("X", "y")]));
        assert!(p.pop_category("Missing").is_none());
    }

    #[test]
    fn path_serializes_as_ordered_segments() {
        let p = path(&[("Study", "S"), ("MDV", "M")]);
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"[{"category":"Study","key":"S"},{"category":"MDV","key":"M"}]"#
        );
    }

    #[test]
    fn repeated_categories_survive_json() {
        let p = path(&[("Obj", "k"), ("k", "a"), ("a", "a"), ("a", "x")]);
        let text = serde_json::to_string(&p).unwrap();
        let back: Path = serde_json::from_str(&text).unwrap();
        assert_eq!(back.len(), 4);
        assert_eq!(back, p);
    }

    #[test]
    fn path_display() {
        assert_eq!(Path::new().to_string(), "<root>");
        assert_eq!(path(&[("Obj", "k"), ("k", "x")]).to_string(), "Obj:k > k:x");
    }

    #[test]
    fn record_serializes_with_kind_name() {
        let r = DiffRecord {
            kind: DiffKind::ChangeType,
            category: "Obj".into(),
            key: "x".into(),
            path: path(&[("Obj", "k"), ("k", "x")]),
            description: String::new(),
            from: "number".into(),
            to: "string".into(),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"], "ChangeType");
        assert_eq!(json["path"][1]["category"], "k");
        assert_eq!(json["path"][1]["key"], "x");
        assert_eq!(json["from"], "number");
    }

    #[test]
    fn inverse_swaps_new_and_delete() {
        assert_eq!(DiffKind::New.inverse(), DiffKind::Delete);
        assert_eq!(DiffKind::Delete.inverse(), DiffKind::New);
        assert_eq!(DiffKind::Update.inverse(), DiffKind::Update);
    }
}
