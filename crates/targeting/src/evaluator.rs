//! Per-request targeting evaluator — decides whether a targeting group matches.

use adselect_core::{CustomerProfile, RequestContext};
use tracing::trace;

use crate::group::TargetingGroup;
use crate::predicates::TargetingPredicateResult;

/// Bound to one request's context for the lifetime of a selection call.
pub struct TargetingEvaluator {
    context: RequestContext,
    profile: Option<CustomerProfile>,
}

impl TargetingEvaluator {
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            profile: None,
        }
    }

    /// Attach the customer's reference data for profile-based predicates.
    pub fn with_profile(mut self, profile: Option<CustomerProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// `True` iff every predicate in the group is `True`. Never returns
    /// `Indeterminate`: anything short of `True` collapses to `False`, and the
    /// first such predicate ends evaluation.
    pub fn evaluate(&self, group: &TargetingGroup) -> TargetingPredicateResult {
        let profile = self.profile.as_ref();
        let miss = group
            .predicates
            .iter()
            .map(|p| (p, p.evaluate(&self.context, profile)))
            .find(|(_, result)| !result.is_true());

        match miss {
            Some((predicate, result)) => {
                trace!(
                    targeting_group_id = %group.targeting_group_id,
                    predicate = ?predicate.kind,
                    result = ?result,
                    "Targeting group rejected"
                );
                TargetingPredicateResult::False
            }
            None => TargetingPredicateResult::True,
        }
    }

    pub fn is_eligible(&self, group: &TargetingGroup) -> bool {
        self.evaluate(group).is_true()
    }
}
