use adselect_core::{AdSelectionError, SelectionResult};
use serde::{Deserialize, Serialize};

use crate::predicates::TargetingPredicate;

/// A bundle of predicates plus the click-through rate predicted for the
/// audience they describe. One content item owns zero or more groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTargetingGroup")]
pub struct TargetingGroup {
    pub targeting_group_id: String,
    pub content_id: String,
    pub click_through_rate: f64,
    pub predicates: Vec<TargetingPredicate>,
}

#[derive(Deserialize)]
struct RawTargetingGroup {
    targeting_group_id: String,
    content_id: String,
    click_through_rate: f64,
    #[serde(default)]
    predicates: Vec<TargetingPredicate>,
}

impl TryFrom<RawTargetingGroup> for TargetingGroup {
    type Error = AdSelectionError;

    fn try_from(raw: RawTargetingGroup) -> Result<Self, Self::Error> {
        TargetingGroup::new(
            raw.targeting_group_id,
            raw.content_id,
            raw.click_through_rate,
            raw.predicates,
        )
    }
}

impl TargetingGroup {
    /// Build a group, rejecting a click-through rate outside `[0, 1]` (or NaN).
    pub fn new(
        targeting_group_id: impl Into<String>,
        content_id: impl Into<String>,
        click_through_rate: f64,
        predicates: Vec<TargetingPredicate>,
    ) -> SelectionResult<Self> {
        let targeting_group_id = targeting_group_id.into();
        if !(0.0..=1.0).contains(&click_through_rate) {
            return Err(AdSelectionError::Validation(format!(
                "targeting group {targeting_group_id}: click-through rate {click_through_rate} is outside [0, 1]"
            )));
        }
        Ok(Self {
            targeting_group_id,
            content_id: content_id.into(),
            click_through_rate,
            predicates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::PredicateKind;

    #[test]
    fn test_ctr_bounds() {
        assert!(TargetingGroup::new("g1", "C1", 0.0, vec![]).is_ok());
        assert!(TargetingGroup::new("g1", "C1", 1.0, vec![]).is_ok());
        assert!(TargetingGroup::new("g1", "C1", 1.01, vec![]).is_err());
        assert!(TargetingGroup::new("g1", "C1", -0.1, vec![]).is_err());
        assert!(TargetingGroup::new("g1", "C1", f64::NAN, vec![]).is_err());
    }

    #[test]
    fn test_deserialize_validates_ctr() {
        let ok: TargetingGroup = serde_json::from_str(
            r#"{"targeting_group_id": "g1", "content_id": "C1", "click_through_rate": 0.4,
                "predicates": [{"type": "recognized"}]}"#,
        )
        .unwrap();
        assert_eq!(ok.predicates[0].kind, PredicateKind::Recognized);

        let bad = serde_json::from_str::<TargetingGroup>(
            r#"{"targeting_group_id": "g2", "content_id": "C1", "click_through_rate": 3.0}"#,
        );
        assert!(bad.is_err());
    }
}
