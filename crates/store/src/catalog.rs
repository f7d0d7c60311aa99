//! JSON catalog of advertisement content, targeting groups and customer profiles.

use std::collections::HashSet;
use std::path::Path;

use adselect_core::{AdSelectionError, AdvertisementContent, CustomerProfile, SelectionResult};
use adselect_targeting::TargetingGroup;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub contents: Vec<AdvertisementContent>,
    #[serde(default)]
    pub targeting_groups: Vec<TargetingGroup>,
    #[serde(default)]
    pub customer_profiles: Vec<CustomerProfile>,
}

impl Catalog {
    pub fn from_json(json: &str) -> SelectionResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> SelectionResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            contents = catalog.contents.len(),
            targeting_groups = catalog.targeting_groups.len(),
            customer_profiles = catalog.customer_profiles.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Content ids must be unique and every targeting group must point at
    /// existing content.
    pub fn validate(&self) -> SelectionResult<()> {
        let mut content_ids = HashSet::new();
        for content in &self.contents {
            if !content_ids.insert(content.content_id.as_str()) {
                return Err(AdSelectionError::Validation(format!(
                    "duplicate content id {}",
                    content.content_id
                )));
            }
        }
        for group in &self.targeting_groups {
            if !content_ids.contains(group.content_id.as_str()) {
                return Err(AdSelectionError::Validation(format!(
                    "targeting group {} references unknown content {}",
                    group.targeting_group_id, group.content_id
                )));
            }
        }
        Ok(())
    }
}
