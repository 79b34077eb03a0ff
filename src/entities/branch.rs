// 🏢 Branch Entity - a physical service location inside one region

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,

    pub name: String,

    pub address: String,

    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    // ========================================================================
    // OWNING REGION (id is the source of truth, name is denormalized)
    // ========================================================================
    pub region_id: String,

    #[serde(default)]
    pub region_name: String,

    // ========================================================================
    // DENORMALIZED COUNTERS
    // ========================================================================
    #[serde(default)]
    pub average_rating: f64,

    #[serde(default)]
    pub review_count: usize,
}

impl Branch {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        region_id: impl Into<String>,
    ) -> Self {
        Branch {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            city: city.into(),
            phone: None,
            email: None,
            region_id: region_id.into(),
            region_name: String::new(),
            average_rating: 0.0,
            review_count: 0,
        }
    }

    pub fn with_contact(mut self, phone: impl Into<String>, email: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self.email = Some(email.into());
        self
    }

    /// Case-insensitive substring match on name, city or address.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
    }
}

// ============================================================================
// BRANCH REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BranchRegistry {
    branches: Vec<Branch>,
}

impl BranchRegistry {
    pub fn new(branches: Vec<Branch>) -> Self {
        BranchRegistry { branches }
    }

    pub fn all(&self) -> &[Branch] {
        &self.branches
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    pub fn by_region(&self, region_id: &str) -> Vec<&Branch> {
        self.branches
            .iter()
            .filter(|b| b.region_id == region_id)
            .collect()
    }

    /// Branches whose name, city or address contains `query` (any case).
    /// Each branch is returned at most once, in registry order.
    pub fn search(&self, query: &str) -> Vec<&Branch> {
        let needle = query.to_lowercase();
        self.branches.iter().filter(|b| b.matches(&needle)).collect()
    }

    pub fn count(&self) -> usize {
        self.branches.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Branch> {
        self.branches.iter_mut()
    }
}
