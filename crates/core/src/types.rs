use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A renderable advertisement owned by the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementContent {
    pub content_id: String,
    pub marketplace_id: String,
    /// Opaque to selection; handed back verbatim in the generated ad.
    pub rendering_payload: String,
}

/// Immutable per-request values that targeting predicates are evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub customer_id: Option<String>,
    pub marketplace_id: String,
}

impl RequestContext {
    pub fn new(customer_id: Option<&str>, marketplace_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.map(str::to_string),
            marketplace_id: marketplace_id.into(),
        }
    }

    /// The customer id, if present and non-empty.
    pub fn recognized_customer(&self) -> Option<&str> {
        self.customer_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Outcome of a selection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedAdvertisement {
    Populated {
        content_id: String,
        rendering_payload: String,
    },
    Empty,
}

impl GeneratedAdvertisement {
    pub fn is_empty(&self) -> bool {
        matches!(self, GeneratedAdvertisement::Empty)
    }

    pub fn content_id(&self) -> Option<&str> {
        match self {
            GeneratedAdvertisement::Populated { content_id, .. } => Some(content_id),
            GeneratedAdvertisement::Empty => None,
        }
    }
}

impl From<&AdvertisementContent> for GeneratedAdvertisement {
    fn from(content: &AdvertisementContent) -> Self {
        GeneratedAdvertisement::Populated {
            content_id: content.content_id.clone(),
            rendering_payload: content.rendering_payload.clone(),
        }
    }
}

// ─── Customer Reference Data ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRange {
    Under18,
    Age18To24,
    Age25To34,
    Age35To44,
    Age45To54,
    Age55To64,
    Over64,
}

/// Purchase history within one product category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub purchase_count: u32,
    pub total_spend: f64,
}

/// Customer attributes consulted by profile-based targeting predicates.
///
/// Every attribute is optional: an unknown attribute makes the predicates
/// that need it indeterminate rather than false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    #[serde(default)]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub is_prime_member: Option<bool>,
    #[serde(default)]
    pub has_children: Option<bool>,
    #[serde(default)]
    pub category_spend: HashMap<String, CategorySpend>,
}
