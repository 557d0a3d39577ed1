#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/pipeline_test.rs"]
mod pipeline_test;

use super::*;
use std::sync::Arc;

/// Keeps hard and soft activity constraints and evaluates them in the order they were added.
#[derive(Default)]
pub struct ConstraintPipeline {
    hard_constraints: Vec<Arc<dyn HardActivityConstraint>>,
    soft_constraints: Vec<Arc<dyn SoftActivityConstraint>>,
}

impl ConstraintPipeline {
    /// Adds hard activity constraint.
    pub fn add_hard(&mut self, constraint: Arc<dyn HardActivityConstraint>) -> &mut Self {
        self.hard_constraints.push(constraint);
        self
    }

    /// Adds soft activity constraint.
    pub fn add_soft(&mut self, constraint: Arc<dyn SoftActivityConstraint>) -> &mut Self {
        self.soft_constraints.push(constraint);
        self
    }

    /// Checks all hard constraints. A break result is returned immediately, otherwise a
    /// violation is reported only after all constraints are checked.
    pub fn evaluate_hard_activity(
        &self,
        insertion_ctx: &InsertionContext,
        activity_ctx: &ActivityContext,
    ) -> ConstraintStatus {
        let mut result = ConstraintStatus::Fulfilled;

        for constraint in self.hard_constraints.iter() {
            match constraint.evaluate_activity(insertion_ctx, activity_ctx) {
                ConstraintStatus::NotFulfilledBreak => return ConstraintStatus::NotFulfilledBreak,
                ConstraintStatus::NotFulfilled => result = ConstraintStatus::NotFulfilled,
                ConstraintStatus::Fulfilled => {}
            }
        }

        result
    }

    /// Sums costs of all soft constraints.
    pub fn evaluate_soft_activity(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> Cost {
        self.soft_constraints.iter().map(|constraint| constraint.estimate_activity(insertion_ctx, activity_ctx)).sum()
    }
}
