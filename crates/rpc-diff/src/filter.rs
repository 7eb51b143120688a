//! Field exclusion for comparisons

use crate::path::{PathSegment, StructuralPath};
use std::collections::BTreeSet;

/// Marks paths that contain an ignored field name
///
/// The default filter has no names and excludes nothing.
///
/// A name matches a whole path segment exactly, at any depth. Both object keys
/// and array indices are matched by their label, so `"0"` would exclude the
/// first element of every array. A name never matches part of a longer key:
/// ignoring `ts` leaves `tsc` and `hosts` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    names: BTreeSet<String>,
}

impl FieldFilter {
    /// Build a filter from the names to ignore
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a single segment names an ignored field
    pub fn excludes_segment(&self, segment: &PathSegment) -> bool {
        if self.names.is_empty() {
            return false;
        }
        match segment {
            PathSegment::Key(key) => self.names.contains(key),
            PathSegment::Index(_) => self.names.contains(&segment.label()),
        }
    }

    /// Whether any segment of `path` names an ignored field
    pub fn excludes(&self, path: &StructuralPath) -> bool {
        path.segments()
            .iter()
            .any(|segment| self.excludes_segment(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = FieldFilter::default();
        assert!(!filter.excludes(&StructuralPath::root()));
        assert!(!filter.excludes(&StructuralPath::root().key("ts").index(0)));
    }

    #[test]
    fn test_matches_at_any_depth() {
        let filter = FieldFilter::new(["ts"]);
        assert!(filter.excludes(&StructuralPath::root().key("ts")));
        assert!(filter.excludes(&StructuralPath::root().key("result").index(4).key("ts")));
        // everything below an ignored field is ignored too
        assert!(filter.excludes(&StructuralPath::root().key("ts").key("seconds")));
        assert!(!filter.excludes(&StructuralPath::root().key("result")));
    }

    #[test]
    fn test_no_substring_matches() {
        let filter = FieldFilter::new(["ts"]);
        assert!(!filter.excludes(&StructuralPath::root().key("tsc")));
        assert!(!filter.excludes(&StructuralPath::root().key("hosts")));
        assert!(!filter.excludes(&StructuralPath::root().key("\"ts\"")));
    }

    #[test]
    fn test_index_labels() {
        let filter = FieldFilter::new(["1"]);
        assert!(filter.excludes(&StructuralPath::root().key("list").index(1)));
        assert!(!filter.excludes(&StructuralPath::root().key("list").index(10)));
        assert!(filter.excludes(&StructuralPath::root().key("1")));
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let filter = FieldFilter::new(vec!["slot", "blockTime", "slot"]);
        assert_eq!(filter, FieldFilter::new(["blockTime", "slot"]));
    }
}
