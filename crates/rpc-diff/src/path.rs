//! Structural paths into a JSON document

use std::fmt;

/// One step from a container to a child
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member
    Key(String),
    /// Array element
    Index(usize),
}

impl PathSegment {
    /// The label an ignore-field name is matched against
    pub fn label(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

/// Ordered segments from the document root to a node
///
/// Renders as `$`, `$.result.value`, `$.result.logs[3]` or `$["odd key"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructuralPath {
    segments: Vec<PathSegment>,
}

impl StructuralPath {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }
}

#[cfg(test)]
impl StructuralPath {
    pub(crate) fn key(&self, key: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push(PathSegment::Key(key.into()));
        child
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.push(PathSegment::Index(index));
        child
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => write!(f, ".{}", key)?,
                PathSegment::Key(key) => {
                    // serde_json gives us proper string escaping
                    let quoted = serde_json::Value::String(key.clone()).to_string();
                    write!(f, "[{}]", quoted)?
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
