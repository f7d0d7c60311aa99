//! Advertisement selection — filters marketplace content by targeting and
//! picks the item with the highest click-through rate.

use std::sync::Arc;

use adselect_core::{
    AdvertisementContent, CustomerProfile, GeneratedAdvertisement, ReadableDao, RequestContext,
    SelectionResult,
};
use adselect_targeting::{TargetingEvaluator, TargetingGroup};
use tracing::{debug, warn};

pub type ContentSource = Arc<dyn ReadableDao<str, Vec<AdvertisementContent>>>;
pub type TargetingGroupSource = Arc<dyn ReadableDao<str, Vec<TargetingGroup>>>;
pub type ProfileSource = Arc<dyn ReadableDao<str, Option<CustomerProfile>>>;

/// An eligible content item and the key it is ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub rank_key: f64,
    pub content: AdvertisementContent,
}

/// Picks the advertisement to render for a customer on a marketplace.
///
/// Holds only read-only collaborator handles, so one instance can serve
/// concurrent requests.
pub struct AdvertisementSelectionLogic {
    content_source: ContentSource,
    targeting_group_source: TargetingGroupSource,
    profile_source: Option<ProfileSource>,
}

impl AdvertisementSelectionLogic {
    pub fn new(content_source: ContentSource, targeting_group_source: TargetingGroupSource) -> Self {
        Self {
            content_source,
            targeting_group_source,
            profile_source: None,
        }
    }

    /// Supply customer reference data to profile-based predicates. Without it
    /// those predicates are indeterminate and never match.
    pub fn with_profile_source(mut self, profile_source: ProfileSource) -> Self {
        self.profile_source = Some(profile_source);
        self
    }

    /// Returns the eligible content with the highest click-through rate, or
    /// `Empty` if the marketplace id is missing or nothing is eligible.
    ///
    /// Without a customer id every item is eligible and ranked by its best
    /// group CTR, skipping items whose best CTR is not positive. With one, an
    /// item needs at least one matching targeting group and is ranked by the
    /// best CTR across all of its groups.
    ///
    /// Equal rank keys resolve to the item the content source listed first.
    /// Callers must not depend on that order.
    pub fn select_advertisement(
        &self,
        customer_id: Option<&str>,
        marketplace_id: Option<&str>,
    ) -> SelectionResult<GeneratedAdvertisement> {
        let ranked = self.rank_candidates(customer_id, marketplace_id)?;
        Ok(ranked
            .first()
            .map_or(GeneratedAdvertisement::Empty, |top| {
                GeneratedAdvertisement::from(&top.content)
            }))
    }

    /// Every eligible candidate, best first.
    pub fn rank_candidates(
        &self,
        customer_id: Option<&str>,
        marketplace_id: Option<&str>,
    ) -> SelectionResult<Vec<RankedCandidate>> {
        let marketplace_id = match marketplace_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                warn!("MarketplaceId cannot be null or empty. Returning empty ad.");
                return Ok(Vec::new());
            }
        };

        let customer_id = customer_id.filter(|id| !id.is_empty());
        let contents = self.content_source.get(marketplace_id)?;
        let mut ranked = match customer_id {
            None => self.rank_anonymous(contents)?,
            Some(customer_id) => self.rank_identified(customer_id, marketplace_id, contents)?,
        };

        // Stable sort: ties keep content-source order.
        ranked.sort_by(|a, b| b.rank_key.total_cmp(&a.rank_key));

        debug!(
            marketplace_id,
            anonymous = customer_id.is_none(),
            eligible = ranked.len(),
            selected = ranked.first().map(|c| c.content.content_id.as_str()),
            "Advertisement candidates ranked"
        );
        Ok(ranked)
    }

    fn rank_anonymous(
        &self,
        contents: Vec<AdvertisementContent>,
    ) -> SelectionResult<Vec<RankedCandidate>> {
        let mut ranked = Vec::new();
        for content in contents {
            let groups = self.targeting_group_source.get(&content.content_id)?;
            let rank_key = max_click_through_rate(&groups).unwrap_or(0.0);
            if rank_key > 0.0 {
                ranked.push(RankedCandidate { rank_key, content });
            }
        }
        Ok(ranked)
    }

    fn rank_identified(
        &self,
        customer_id: &str,
        marketplace_id: &str,
        contents: Vec<AdvertisementContent>,
    ) -> SelectionResult<Vec<RankedCandidate>> {
        let profile = match &self.profile_source {
            Some(source) => source.get(customer_id)?,
            None => None,
        };
        let evaluator =
            TargetingEvaluator::new(RequestContext::new(Some(customer_id), marketplace_id))
                .with_profile(profile);

        let mut ranked = Vec::new();
        for content in contents {
            let groups = self.targeting_group_source.get(&content.content_id)?;
            if !groups.iter().any(|group| evaluator.is_eligible(group)) {
                continue;
            }
            // Ranked across all groups, not only the ones that matched.
            if let Some(rank_key) = max_click_through_rate(&groups) {
                ranked.push(RankedCandidate { rank_key, content });
            }
        }
        Ok(ranked)
    }
}

fn max_click_through_rate(groups: &[TargetingGroup]) -> Option<f64> {
    groups
        .iter()
        .map(|group| group.click_through_rate)
        .max_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adselect_core::AdSelectionError;
    use adselect_targeting::TargetingGroupBuilder;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MapSource<V> {
        entries: HashMap<String, V>,
        calls: AtomicUsize,
    }

    impl<V: Clone + Default + Send + Sync> ReadableDao<str, V> for MapSource<V> {
        fn get(&self, key: &str) -> SelectionResult<V> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entries.get(key).cloned().unwrap_or_default())
        }
    }

    struct FailingSource;

    impl ReadableDao<str, Vec<TargetingGroup>> for FailingSource {
        fn get(&self, key: &str) -> SelectionResult<Vec<TargetingGroup>> {
            Err(AdSelectionError::DataSource(format!("lookup failed for {key}")))
        }
    }

    fn content(id: &str) -> AdvertisementContent {
        AdvertisementContent {
            content_id: id.to_string(),
            marketplace_id: "US".to_string(),
            rendering_payload: format!("<div>{id}</div>"),
        }
    }

    fn open_group(content_id: &str, ctr: f64) -> TargetingGroup {
        TargetingGroupBuilder::new(content_id).ctr(ctr).build().unwrap()
    }

    fn closed_group(content_id: &str, ctr: f64) -> TargetingGroup {
        TargetingGroupBuilder::new(content_id)
            .ctr(ctr)
            .recognized()
            .not()
            .build()
            .unwrap()
    }

    struct Fixture {
        contents: Arc<MapSource<Vec<AdvertisementContent>>>,
        groups: Arc<MapSource<Vec<TargetingGroup>>>,
    }

    impl Fixture {
        fn new(items: Vec<(&str, Vec<TargetingGroup>)>) -> Self {
            let mut contents = MapSource::default();
            let mut groups = MapSource::default();
            contents.entries.insert(
                "US".to_string(),
                items.iter().map(|(id, _)| content(id)).collect(),
            );
            for (id, g) in items {
                groups.entries.insert(id.to_string(), g);
            }
            Self {
                contents: Arc::new(contents),
                groups: Arc::new(groups),
            }
        }

        fn logic(&self) -> AdvertisementSelectionLogic {
            AdvertisementSelectionLogic::new(self.contents.clone(), self.groups.clone())
        }
    }

    #[test]
    fn test_missing_marketplace_returns_empty_without_lookups() {
        let fixture = Fixture::new(vec![("C1", vec![open_group("C1", 0.5)])]);
        let logic = fixture.logic();

        assert!(logic
            .select_advertisement(Some("cust1"), None)
            .unwrap()
            .is_empty());
        assert!(logic
            .select_advertisement(None, Some(""))
            .unwrap()
            .is_empty());
        assert_eq!(fixture.contents.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fixture.groups.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_anonymous_ranks_by_max_ctr() {
        let fixture = Fixture::new(vec![
            ("C1", vec![open_group("C1", 0.2), closed_group("C1", 0.5)]),
            ("C2", vec![open_group("C2", 0.1)]),
        ]);
        let ad = fixture
            .logic()
            .select_advertisement(None, Some("US"))
            .unwrap();
        assert_eq!(ad.content_id(), Some("C1"));
    }

    #[test]
    fn test_anonymous_excludes_non_positive_rank_keys() {
        let fixture = Fixture::new(vec![("C1", vec![]), ("C2", vec![open_group("C2", 0.0)])]);
        let logic = fixture.logic();
        assert!(logic.rank_candidates(Some(""), Some("US")).unwrap().is_empty());
        assert!(logic
            .select_advertisement(None, Some("US"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_identified_requires_matching_group() {
        let fixture = Fixture::new(vec![
            ("C1", vec![closed_group("C1", 0.9)]),
            ("C2", vec![open_group("C2", 0.3)]),
        ]);
        let ad = fixture
            .logic()
            .select_advertisement(Some("cust1"), Some("US"))
            .unwrap();
        assert_eq!(ad.content_id(), Some("C2"));
    }

    #[test]
    fn test_identified_ranks_across_all_groups() {
        // C1 matches only through its 0.1 group but owns a 0.8 group.
        let fixture = Fixture::new(vec![
            ("C1", vec![open_group("C1", 0.1), closed_group("C1", 0.8)]),
            ("C2", vec![open_group("C2", 0.5)]),
        ]);
        let ranked = fixture
            .logic()
            .rank_candidates(Some("cust1"), Some("US"))
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].content.content_id, "C1");
        assert_eq!(ranked[0].rank_key, 0.8);
        assert_eq!(ranked[1].rank_key, 0.5);
    }

    #[test]
    fn test_identified_keeps_zero_ctr_matches() {
        let fixture = Fixture::new(vec![("C1", vec![open_group("C1", 0.0)])]);
        let ad = fixture
            .logic()
            .select_advertisement(Some("cust1"), Some("US"))
            .unwrap();
        assert_eq!(ad.content_id(), Some("C1"));
    }

    #[test]
    fn test_no_passing_group_returns_empty() {
        let fixture = Fixture::new(vec![
            ("C1", vec![closed_group("C1", 0.4)]),
            ("C2", vec![]),
        ]);
        let ad = fixture
            .logic()
            .select_advertisement(Some("cust1"), Some("US"))
            .unwrap();
        assert_eq!(ad, GeneratedAdvertisement::Empty);
    }

    #[test]
    fn test_unknown_marketplace_is_empty() {
        let fixture = Fixture::new(vec![("C1", vec![open_group("C1", 0.4)])]);
        let ad = fixture
            .logic()
            .select_advertisement(None, Some("JP"))
            .unwrap();
        assert!(ad.is_empty());
    }

    #[test]
    fn test_ties_resolve_to_first_listed() {
        let fixture = Fixture::new(vec![
            ("C1", vec![open_group("C1", 0.4)]),
            ("C2", vec![open_group("C2", 0.4)]),
        ]);
        let ranked = fixture
            .logic()
            .rank_candidates(None, Some("US"))
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].content.content_id, "C1");
    }

    #[test]
    fn test_collaborator_error_propagates() {
        let fixture = Fixture::new(vec![("C1", vec![])]);
        let logic = AdvertisementSelectionLogic::new(fixture.contents.clone(), Arc::new(FailingSource));
        let err = logic.select_advertisement(None, Some("US")).unwrap_err();
        assert!(matches!(err, AdSelectionError::DataSource(msg) if msg.contains("C1")));
    }

    #[test]
    fn test_profile_source_feeds_predicates() {
        let prime_only = TargetingGroupBuilder::new("C1")
            .ctr(0.6)
            .prime_member()
            .build()
            .unwrap();
        let fixture = Fixture::new(vec![("C1", vec![prime_only])]);

        // No profile source: the predicate is indeterminate, so nothing matches.
        assert!(fixture
            .logic()
            .select_advertisement(Some("cust1"), Some("US"))
            .unwrap()
            .is_empty());

        let mut profiles = MapSource::default();
        profiles.entries.insert(
            "cust1".to_string(),
            Some(CustomerProfile {
                customer_id: "cust1".to_string(),
                is_prime_member: Some(true),
                ..Default::default()
            }),
        );
        let profiles = Arc::new(profiles);
        let logic = fixture.logic().with_profile_source(profiles.clone());
        let ad = logic
            .select_advertisement(Some("cust1"), Some("US"))
            .unwrap();
        assert_eq!(ad.content_id(), Some("C1"));

        // Anonymous requests never consult profiles.
        logic.select_advertisement(None, Some("US")).unwrap();
        assert_eq!(profiles.calls.load(Ordering::SeqCst), 1);
    }
}
