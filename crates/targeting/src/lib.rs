//! Audience targeting — predicate variants, targeting groups and the
//! per-request evaluator that decides group eligibility.

pub mod builder;
pub mod evaluator;
pub mod group;
pub mod predicates;

pub use builder::TargetingGroupBuilder;
pub use evaluator::TargetingEvaluator;
pub use group::TargetingGroup;
pub use predicates::{ComparisonOperator, PredicateKind, TargetingPredicate, TargetingPredicateResult};
