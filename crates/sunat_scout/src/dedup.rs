//! Per-run record of bare filenames already classified.

use crate::types::DocumentStatus;
use std::collections::HashSet;

/// Names seen during one discovery run. Never shared across runs.
#[derive(Debug, Default)]
pub struct SeenNames {
    names: HashSet<String>,
}

impl SeenNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saw_before(&self, filename: &str) -> bool {
        self.names.contains(filename)
    }

    pub fn remember(&mut self, filename: &str) {
        self.names.insert(filename.to_string());
    }

    /// Status for a freshly classified name; the first sighting is remembered.
    pub fn observe(&mut self, filename: &str) -> DocumentStatus {
        if self.saw_before(filename) {
            DocumentStatus::Duplicate
        } else {
            self.remember(filename);
            DocumentStatus::Unique
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_is_unique() {
        let mut seen = SeenNames::new();
        assert_eq!(seen.observe("a.pdf"), DocumentStatus::Unique);
        assert_eq!(seen.observe("a.pdf"), DocumentStatus::Duplicate);
        assert_eq!(seen.observe("a.pdf"), DocumentStatus::Duplicate);
        assert_eq!(seen.observe("b.pdf"), DocumentStatus::Unique);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn names_are_compared_exactly() {
        let mut seen = SeenNames::new();
        seen.remember("01-F001-1.pdf");
        assert!(seen.saw_before("01-F001-1.pdf"));
        assert!(!seen.saw_before("01-F001-1.PDF"));
    }
}
