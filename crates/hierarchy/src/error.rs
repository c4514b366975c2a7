//! Error types for hierarchy reconciliation.

use thiserror::Error;

use crate::body::BodyId;

/// Failure that abandons a whole reconciliation pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error("system anchor lost: no active star remains to root the hierarchy")]
    AnchorLost,

    #[error("unknown body: {0}")]
    UnknownBody(BodyId),

    #[error("body {body} cannot be parented to inactive body {parent}")]
    InactiveParent { body: BodyId, parent: BodyId },

    #[error("body {0} is not an active star")]
    NotAnActiveStar(BodyId),

    #[error("body {0} cannot be its own parent")]
    SelfParent(BodyId),
}

pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Breach of hierarchy well-formedness found by `validate_hierarchy`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyViolation {
    #[error("{body} points at missing parent {parent}")]
    DanglingParent { body: BodyId, parent: BodyId },

    #[error("{body} points at inactive parent {parent}")]
    InactiveParent { body: BodyId, parent: BodyId },

    #[error("{0} is its own parent")]
    SelfParent(BodyId),

    #[error("no parentless main star among active stars")]
    MissingRoot,

    #[error("more than one main star: {0:?}")]
    MultipleRoots(Vec<BodyId>),
}
