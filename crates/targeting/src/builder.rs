//! Targeting group builder — fluent API for assembling predicate sets.

use adselect_core::{AgeRange, SelectionResult};
use uuid::Uuid;

use crate::group::TargetingGroup;
use crate::predicates::{ComparisonOperator, PredicateKind, TargetingPredicate};

pub struct TargetingGroupBuilder {
    targeting_group_id: Option<String>,
    content_id: String,
    click_through_rate: f64,
    predicates: Vec<TargetingPredicate>,
}

impl TargetingGroupBuilder {
    pub fn new(content_id: impl Into<String>) -> Self {
        Self {
            targeting_group_id: None,
            content_id: content_id.into(),
            click_through_rate: 0.0,
            predicates: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.targeting_group_id = Some(id.into());
        self
    }

    pub fn ctr(mut self, click_through_rate: f64) -> Self {
        self.click_through_rate = click_through_rate;
        self
    }

    pub fn recognized(mut self) -> Self {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::Recognized));
        self
    }

    pub fn in_marketplaces<I, S>(mut self, marketplace_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::Marketplace {
                marketplace_ids: marketplace_ids.into_iter().map(Into::into).collect(),
            }));
        self
    }

    pub fn customers<I, S>(mut self, customer_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::CustomerIn {
                customer_ids: customer_ids.into_iter().map(Into::into).collect(),
            }));
        self
    }

    pub fn age_in(mut self, ranges: impl Into<Vec<AgeRange>>) -> Self {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::AgeRange {
                ranges: ranges.into(),
            }));
        self
    }

    pub fn prime_member(mut self) -> Self {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::PrimeMember));
        self
    }

    pub fn parent(mut self) -> Self {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::Parent));
        self
    }

    pub fn spend_frequency(
        mut self,
        category: impl Into<String>,
        operator: ComparisonOperator,
        target_count: u32,
    ) -> Self {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::CategorySpendFrequency {
                category: category.into(),
                operator,
                target_count,
            }));
        self
    }

    pub fn spend_value(
        mut self,
        category: impl Into<String>,
        operator: ComparisonOperator,
        target_value: f64,
    ) -> Self {
        self.predicates
            .push(TargetingPredicate::new(PredicateKind::CategorySpendValue {
                category: category.into(),
                operator,
                target_value,
            }));
        self
    }

    /// Negate the most recently added predicate.
    pub fn not(mut self) -> Self {
        if let Some(last) = self.predicates.last_mut() {
            last.inverse = !last.inverse;
        }
        self
    }

    pub fn build(self) -> SelectionResult<TargetingGroup> {
        let id = self
            .targeting_group_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        TargetingGroup::new(id, self.content_id, self.click_through_rate, self.predicates)
    }
}
