//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent skill-tree rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("unknown leaf: {0}")]
    UnknownLeaf(String),

    #[error("duplicate leaf name: {0}")]
    DuplicateLeaf(String),

    #[error("branch would loop back onto itself: {0}")]
    SelfLoop(String),

    #[error("cycle detected in skill tree: {from} -> {to}")]
    CycleDetected { from: String, to: String },

    #[error("leaf is not active: {0}")]
    LeafInactive(String),

    #[error("invalid points for {name}: {points}/{max_points}")]
    InvalidPoints {
        name: String,
        points: i32,
        max_points: i32,
    },

    #[error("unknown tooltip binding '{bind}' on leaf {name}")]
    UnknownBinding { name: String, bind: String },
}
