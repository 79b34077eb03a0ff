// 🗺️ Region Entity - top-level geographic grouping of branches
//
// Counters (branch_count, review_count, average_rating) are denormalized.
// They are recomputed whenever a snapshot is built (see `engine`), never
// edited by hand.

use serde::{Deserialize, Serialize};

// ============================================================================
// REGION ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,

    /// Short code used in URLs, e.g. "NE"
    pub code: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // ========================================================================
    // DENORMALIZED COUNTERS
    // ========================================================================
    #[serde(default)]
    pub branch_count: usize,

    #[serde(default)]
    pub average_rating: f64,

    #[serde(default)]
    pub review_count: usize,
}

impl Region {
    pub fn new(id: impl Into<String>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Region {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            description: None,
            branch_count: 0,
            average_rating: 0.0,
            review_count: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive code comparison ("ne" finds "NE")
    pub fn has_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }
}

// ============================================================================
// REGION REGISTRY
// ============================================================================

/// Read-only lookup table over regions, in insertion order
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    regions: Vec<Region>,
}

impl RegionRegistry {
    pub fn new(regions: Vec<Region>) -> Self {
        RegionRegistry { regions }
    }

    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.has_code(code))
    }

    pub fn count(&self) -> usize {
        self.regions.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.regions.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_code_ignores_case() {
        let registry = RegionRegistry::new(vec![
            Region::new("1", "NE", "North East"),
            Region::new("2", "NW", "North West"),
        ]);

        assert_eq!(registry.find_by_code("nw").map(|r| r.id.as_str()), Some("2"));
        assert!(registry.find_by_code("XX").is_none());
        assert_eq!(registry.find_by_id("1").map(|r| r.name.as_str()), Some("North East"));
    }
}
