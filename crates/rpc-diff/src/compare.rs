//! Structural comparison of JSON responses
//!
//! Responses are compared as trees. Object members and array elements whose
//! path is excluded by the [`FieldFilter`] are skipped on both sides, so a
//! difference in their presence, type or value is never reported. Excluding
//! an array element does not shift the indices of the ones after it.

use crate::filter::FieldFilter;
use crate::path::{PathSegment, StructuralPath};
use serde_json::{Number, Value};
use std::fmt;

/// What kind of difference was found at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Present in the previous response only
    Removed,
    /// Present in the current response only
    Added,
    /// Present in both with different values or types
    Changed,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Removed => write!(f, "REMOVED"),
            DiffKind::Added => write!(f, "ADDED"),
            DiffKind::Changed => write!(f, "CHANGED"),
        }
    }
}

/// A single difference between two responses
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub kind: DiffKind,
    pub path: StructuralPath,
    /// Value in the previous response, if present there
    pub previous: Option<Value>,
    /// Value in the current response, if present there
    pub current: Option<Value>,
}

impl fmt::Display for Difference {
    /// `-` lines are what the previous side has, `+` lines what the current side has
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(previous) = &self.previous {
            writeln!(f, "- {}: {}", self.path, previous)?;
        }
        if let Some(current) = &self.current {
            writeln!(f, "+ {}: {}", self.path, current)?;
        }
        Ok(())
    }
}

/// Deep equality of two responses under `filter`
pub fn equal(previous: &Value, current: &Value, filter: &FieldFilter) -> bool {
    let mut walker = Walker::new(filter, true);
    walker.walk(previous, current);
    walker.differences.is_empty()
}

/// Every difference between two responses under `filter`
///
/// Each reported path is the shallowest one that differs. An object missing a
/// whole subtree yields one entry for the subtree, not one per leaf.
pub fn diff(previous: &Value, current: &Value, filter: &FieldFilter) -> Vec<Difference> {
    let mut walker = Walker::new(filter, false);
    walker.walk(previous, current);
    walker.differences
}

/// Text form of a diff, one `-`/`+` line per side per difference
pub fn render(differences: &[Difference]) -> String {
    differences.iter().map(ToString::to_string).collect()
}

struct Walker<'f> {
    filter: &'f FieldFilter,
    path: StructuralPath,
    differences: Vec<Difference>,
    first_only: bool,
}

impl<'f> Walker<'f> {
    fn new(filter: &'f FieldFilter, first_only: bool) -> Self {
        Self {
            filter,
            path: StructuralPath::root(),
            differences: Vec::new(),
            first_only,
        }
    }

    fn done(&self) -> bool {
        self.first_only && !self.differences.is_empty()
    }

    fn record(&mut self, kind: DiffKind, previous: Option<&Value>, current: Option<&Value>) {
        self.differences.push(Difference {
            kind,
            path: self.path.clone(),
            previous: previous.cloned(),
            current: current.cloned(),
        });
    }

    /// Visit a child of the current node unless the filter excludes it.
    ///
    /// Ancestors were already checked on the way down, so only the new segment
    /// needs testing.
    fn child(&mut self, segment: PathSegment, previous: Option<&Value>, current: Option<&Value>) {
        if self.done() || self.filter.excludes_segment(&segment) {
            return;
        }
        self.path.push(segment);
        match (previous, current) {
            (Some(previous), Some(current)) => self.walk(previous, current),
            (Some(_), None) => self.record(DiffKind::Removed, previous, None),
            (None, Some(_)) => self.record(DiffKind::Added, None, current),
            (None, None) => {}
        }
        self.path.pop();
    }

    fn walk(&mut self, previous: &Value, current: &Value) {
        match (previous, current) {
            (Value::Object(prev_obj), Value::Object(cur_obj)) => {
                for (key, prev_value) in prev_obj {
                    self.child(
                        PathSegment::Key(key.clone()),
                        Some(prev_value),
                        cur_obj.get(key),
                    );
                }
                for (key, cur_value) in cur_obj {
                    if !prev_obj.contains_key(key) {
                        self.child(PathSegment::Key(key.clone()), None, Some(cur_value));
                    }
                }
            }
            (Value::Array(prev_arr), Value::Array(cur_arr)) => {
                let len = prev_arr.len().max(cur_arr.len());
                for i in 0..len {
                    self.child(PathSegment::Index(i), prev_arr.get(i), cur_arr.get(i));
                }
            }
            (Value::Number(a), Value::Number(b)) => {
                if !numbers_equal(a, b) {
                    self.record(DiffKind::Changed, Some(previous), Some(current));
                }
            }
            _ => {
                if previous != current {
                    self.record(DiffKind::Changed, Some(previous), Some(current));
                }
            }
        }
    }
}

/// Integers compare exactly; any pairing involving a float compares as f64.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    if (a.is_i64() || a.is_u64()) && (b.is_i64() || b.is_u64()) {
        // one negative, one above i64::MAX
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
