//! In-memory data sources backed by DashMap.
//!
//! Production deployments put a database behind `ReadableDao`; these serve
//! the same contract for development, tests and the CLI.

use adselect_core::{
    AdSelectionError, AdvertisementContent, CustomerProfile, ReadableDao, SelectionResult,
};
use adselect_targeting::TargetingGroup;
use dashmap::DashMap;
use tracing::info;

use crate::catalog::Catalog;

/// Content indexed by marketplace id.
#[derive(Default)]
pub struct ContentStore {
    by_marketplace: DashMap<String, Vec<AdvertisementContent>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, content: AdvertisementContent) {
        self.by_marketplace
            .entry(content.marketplace_id.clone())
            .or_default()
            .push(content);
    }

    pub fn len(&self) -> usize {
        self.by_marketplace.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReadableDao<str, Vec<AdvertisementContent>> for ContentStore {
    fn get(&self, marketplace_id: &str) -> SelectionResult<Vec<AdvertisementContent>> {
        Ok(self
            .by_marketplace
            .get(marketplace_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }
}

/// Targeting groups indexed by content id.
#[derive(Default)]
pub struct TargetingGroupStore {
    by_content: DashMap<String, Vec<TargetingGroup>>,
}

impl TargetingGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, group: TargetingGroup) {
        self.by_content
            .entry(group.content_id.clone())
            .or_default()
            .push(group);
    }
}

impl ReadableDao<str, Vec<TargetingGroup>> for TargetingGroupStore {
    fn get(&self, content_id: &str) -> SelectionResult<Vec<TargetingGroup>> {
        Ok(self
            .by_content
            .get(content_id)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }
}

/// Customer profiles indexed by customer id.
#[derive(Default)]
pub struct ProfileStore {
    profiles: DashMap<String, CustomerProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: CustomerProfile) {
        self.profiles.insert(profile.customer_id.clone(), profile);
    }
}

impl ReadableDao<str, Option<CustomerProfile>> for ProfileStore {
    fn get(&self, customer_id: &str) -> SelectionResult<Option<CustomerProfile>> {
        Ok(self.profiles.get(customer_id).map(|p| p.value().clone()))
    }
}

impl Catalog {
    /// Split the catalog into its three indexed stores.
    pub fn into_stores(self) -> SelectionResult<(ContentStore, TargetingGroupStore, ProfileStore)> {
        self.validate()?;

        let contents = ContentStore::new();
        let groups = TargetingGroupStore::new();
        let profiles = ProfileStore::new();

        for content in self.contents {
            contents.insert(content);
        }
        for group in self.targeting_groups {
            groups.insert(group);
        }
        for profile in self.customer_profiles {
            if profile.customer_id.is_empty() {
                return Err(AdSelectionError::Validation(
                    "customer profile without customer id".to_string(),
                ));
            }
            profiles.insert(profile);
        }

        info!(contents = contents.len(), "In-memory stores initialized");
        Ok((contents, groups, profiles))
    }
}
