//! Predicate types and evaluation logic for targeting groups.

use adselect_core::{AgeRange, CustomerProfile, RequestContext};
use serde::{Deserialize, Serialize};

/// Verdict of a single predicate.
///
/// `Indeterminate` means the predicate could not decide, usually because the
/// reference data it needs is missing. Group evaluation treats it as a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingPredicateResult {
    True,
    False,
    Indeterminate,
}

impl TargetingPredicateResult {
    pub fn from_bool(value: bool) -> Self {
        if value {
            TargetingPredicateResult::True
        } else {
            TargetingPredicateResult::False
        }
    }

    pub fn is_true(self) -> bool {
        self == TargetingPredicateResult::True
    }

    /// Swap `True` and `False` when `inverse` is set. `Indeterminate` is kept.
    pub fn invert_if(self, inverse: bool) -> Self {
        match (self, inverse) {
            (TargetingPredicateResult::True, true) => TargetingPredicateResult::False,
            (TargetingPredicateResult::False, true) => TargetingPredicateResult::True,
            (result, _) => result,
        }
    }
}

/// A single targeting rule plus its negation flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingPredicate {
    #[serde(flatten)]
    pub kind: PredicateKind,
    #[serde(default)]
    pub inverse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredicateKind {
    /// The request carries a customer identity.
    Recognized,
    Marketplace {
        marketplace_ids: Vec<String>,
    },
    CustomerIn {
        customer_ids: Vec<String>,
    },
    AgeRange {
        ranges: Vec<AgeRange>,
    },
    PrimeMember,
    Parent,
    CategorySpendFrequency {
        category: String,
        operator: ComparisonOperator,
        target_count: u32,
    },
    CategorySpendValue {
        category: String,
        operator: ComparisonOperator,
        target_value: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl TargetingPredicate {
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            kind,
            inverse: false,
        }
    }

    pub fn inverted(kind: PredicateKind) -> Self {
        Self {
            kind,
            inverse: true,
        }
    }

    /// Evaluate against the request context and the customer's profile, if one
    /// was found. Pure: reads its inputs, touches nothing else.
    pub fn evaluate(
        &self,
        context: &RequestContext,
        profile: Option<&CustomerProfile>,
    ) -> TargetingPredicateResult {
        evaluate_kind(&self.kind, context, profile).invert_if(self.inverse)
    }
}

fn evaluate_kind(
    kind: &PredicateKind,
    context: &RequestContext,
    profile: Option<&CustomerProfile>,
) -> TargetingPredicateResult {
    use TargetingPredicateResult::Indeterminate;

    match kind {
        PredicateKind::Recognized => {
            TargetingPredicateResult::from_bool(context.recognized_customer().is_some())
        }
        PredicateKind::Marketplace { marketplace_ids } => TargetingPredicateResult::from_bool(
            marketplace_ids.iter().any(|id| *id == context.marketplace_id),
        ),
        PredicateKind::CustomerIn { customer_ids } => {
            TargetingPredicateResult::from_bool(context.recognized_customer().is_some_and(
                |customer| customer_ids.iter().any(|id| id == customer),
            ))
        }
        PredicateKind::AgeRange { ranges } => match profile.and_then(|p| p.age_range) {
            Some(age) => TargetingPredicateResult::from_bool(ranges.contains(&age)),
            None => Indeterminate,
        },
        PredicateKind::PrimeMember => match profile.and_then(|p| p.is_prime_member) {
            Some(prime) => TargetingPredicateResult::from_bool(prime),
            None => Indeterminate,
        },
        PredicateKind::Parent => match profile.and_then(|p| p.has_children) {
            Some(parent) => TargetingPredicateResult::from_bool(parent),
            None => Indeterminate,
        },
        PredicateKind::CategorySpendFrequency {
            category,
            operator,
            target_count,
        } => match profile {
            Some(p) => {
                let count = p
                    .category_spend
                    .get(category)
                    .map_or(0, |spend| spend.purchase_count);
                TargetingPredicateResult::from_bool(compare(count, *operator, *target_count))
            }
            None => Indeterminate,
        },
        PredicateKind::CategorySpendValue {
            category,
            operator,
            target_value,
        } => match profile {
            Some(p) => {
                let total = p
                    .category_spend
                    .get(category)
                    .map_or(0.0, |spend| spend.total_spend);
                TargetingPredicateResult::from_bool(compare(total, *operator, *target_value))
            }
            None => Indeterminate,
        },
    }
}

pub fn compare<T: PartialOrd>(actual: T, operator: ComparisonOperator, expected: T) -> bool {
    match operator {
        ComparisonOperator::Equals => actual == expected,
        ComparisonOperator::NotEquals => actual != expected,
        ComparisonOperator::GreaterThan => actual > expected,
        ComparisonOperator::GreaterThanOrEqual => actual >= expected,
        ComparisonOperator::LessThan => actual < expected,
        ComparisonOperator::LessThanOrEqual => actual <= expected,
    }
}
