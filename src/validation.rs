//! Input validation for scenario data.
//!
//! Checks structural integrity of operations, activities, and resources
//! before they are assembled into a [`Scenario`](crate::models::Scenario).
//! Detects:
//! - Duplicate IDs
//! - Activities pointing at unknown operations (and vice versa)
//! - Missing resource references (assignments, eligibility)
//! - Circular predecessor dependencies (DAG validation)
//! - Operations without activities
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{Activity, Operation, Resource};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A reference to a resource that doesn't exist.
    InvalidResourceReference,
    /// An activity and its operation disagree, or the operation doesn't exist.
    InvalidOperationReference,
    /// Predecessor graph contains a cycle.
    CyclicDependency,
    /// An operation has no activities.
    EmptyOperation,
    /// An operation references a predecessor that doesn't exist.
    InvalidPredecessor,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scenario.
///
/// Checks:
/// 1. No duplicate operation, activity, or resource IDs
/// 2. Every operation lists at least one activity
/// 3. Every activity belongs to an existing operation that lists it
/// 4. Every listed activity exists
/// 5. Assignments and eligibility sets reference existing resources
/// 6. Predecessor references point to existing operations
/// 7. No circular predecessor dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    operations: &[Operation],
    activities: &[Activity],
    resources: &[Resource],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
    }

    let mut ops_by_id: HashMap<&str, &Operation> = HashMap::new();
    for op in operations {
        if ops_by_id.insert(op.id.as_str(), op).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate operation ID: {}", op.id),
            ));
        }
        if op.activities.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyOperation,
                format!("Operation '{}' has no activities", op.id),
            ));
        }
    }

    let mut activity_ids = HashSet::new();
    for act in activities {
        if !activity_ids.insert(act.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate activity ID: {}", act.id),
            ));
        }

        match ops_by_id.get(act.operation_id.as_str()) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidOperationReference,
                format!(
                    "Activity '{}' references unknown operation '{}'",
                    act.id, act.operation_id
                ),
            )),
            Some(op) if !op.activities.contains(&act.id) => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidOperationReference,
                format!(
                    "Activity '{}' is not listed by its operation '{}'",
                    act.id, act.operation_id
                ),
            )),
            Some(_) => {}
        }

        if let Some(res) = act.primary_resource() {
            if !resource_ids.contains(res) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Activity '{}' is assigned to unknown resource '{}'", act.id, res),
                ));
            }
        }
    }

    for op in operations {
        for act_id in &op.activities {
            if !activity_ids.contains(act_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidOperationReference,
                    format!("Operation '{}' lists unknown activity '{}'", op.id, act_id),
                ));
            }
        }

        for link in &op.predecessors {
            if !ops_by_id.contains_key(link.operation_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!(
                        "Operation '{}' references unknown predecessor '{}'",
                        op.id, link.operation_id
                    ),
                ));
            }
        }

        for (plant, eligible) in &op.eligibility {
            for res in eligible {
                if !resource_ids.contains(res.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidResourceReference,
                        format!(
                            "Operation '{}' lists unknown resource '{}' as eligible in plant '{}'",
                            op.id, res, plant
                        ),
                    ));
                }
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(operations) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the predecessor graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
fn detect_cycles(operations: &[Operation]) -> Option<ValidationError> {
    // predecessor → successors
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut all_ids: Vec<&str> = Vec::new();

    for op in operations {
        all_ids.push(&op.id);
        for link in &op.predecessors {
            adj.entry(link.operation_id.as_str())
                .or_default()
                .push(op.id.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving operation '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true;
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::single_tasking("M1").with_plant("P1"),
            Resource::single_tasking("M2").with_plant("P1"),
        ]
    }

    fn sample_operations() -> Vec<Operation> {
        vec![
            Operation::new("OP10", "J1")
                .with_activity("A10")
                .with_eligible("P1", ["M1"]),
            Operation::new("OP20", "J1")
                .with_activity("A20")
                .with_predecessor("OP10")
                .with_eligible("P1", ["M1", "M2"]),
        ]
    }

    fn sample_activities() -> Vec<Activity> {
        vec![
            Activity::new("A10", "OP10").scheduled_on("M1", 0, 1000),
            Activity::new("A20", "OP20"),
        ]
    }

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind.clone()).collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_operations(), &sample_activities(), &sample_resources()).is_ok());
    }

    #[test]
    fn test_duplicate_resource_id() {
        let resources = vec![Resource::single_tasking("M1"), Resource::single_tasking("M1")];
        let errors = validate_input(&[], &[], &resources).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("resource")));
    }

    #[test]
    fn test_duplicate_activity_id() {
        let mut activities = sample_activities();
        activities.push(Activity::new("A20", "OP20"));
        let errors =
            validate_input(&sample_operations(), &activities, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::DuplicateId]);
    }

    #[test]
    fn test_empty_operation() {
        let ops = vec![Operation::new("OP10", "J1")];
        let errors = validate_input(&ops, &[], &[]).unwrap_err();
        assert!(kinds(&errors).contains(&ValidationErrorKind::EmptyOperation));
    }

    #[test]
    fn test_activity_not_listed_by_operation() {
        let ops = vec![Operation::new("OP10", "J1").with_activity("A10")];
        let acts = vec![Activity::new("A10", "OP10"), Activity::new("A11", "OP10")];
        let errors = validate_input(&ops, &acts, &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidOperationReference
                && e.message.contains("A11")));
    }

    #[test]
    fn test_unknown_assignment_resource() {
        let ops = vec![Operation::new("OP10", "J1").with_activity("A10")];
        let acts = vec![Activity::new("A10", "OP10").scheduled_on("NOPE", 0, 10)];
        let errors = validate_input(&ops, &acts, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidResourceReference]);
    }

    #[test]
    fn test_unknown_eligible_resource() {
        let ops = vec![Operation::new("OP10", "J1")
            .with_activity("A10")
            .with_eligible("P1", ["GHOST"])];
        let acts = vec![Activity::new("A10", "OP10")];
        let errors = validate_input(&ops, &acts, &sample_resources()).unwrap_err();
        assert!(errors[0].message.contains("GHOST"));
    }

    #[test]
    fn test_invalid_predecessor() {
        let ops = vec![Operation::new("OP10", "J1")
            .with_activity("A10")
            .with_predecessor("NONEXISTENT")];
        let acts = vec![Activity::new("A10", "OP10")];
        let errors = validate_input(&ops, &acts, &[]).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidPredecessor]);
    }

    #[test]
    fn test_cyclic_dependency() {
        // OP1 → OP2 → OP3 → OP1
        let ops = vec![
            Operation::new("OP1", "J1").with_activity("A1").with_predecessor("OP3"),
            Operation::new("OP2", "J1").with_activity("A2").with_predecessor("OP1"),
            Operation::new("OP3", "J1").with_activity("A3").with_predecessor("OP2"),
        ];
        let acts = vec![
            Activity::new("A1", "OP1"),
            Activity::new("A2", "OP2"),
            Activity::new("A3", "OP3"),
        ];
        let errors = validate_input(&ops, &acts, &[]).unwrap_err();
        assert!(kinds(&errors).contains(&ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_multiple_errors() {
        let ops = vec![Operation::new("empty", "J1")];
        let acts = vec![Activity::new("A1", "UNKNOWN")];
        let errors = validate_input(&ops, &acts, &[]).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
