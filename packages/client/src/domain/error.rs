//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ListenerName validation error
    #[error("ListenerName cannot be empty")]
    ListenerNameEmpty,

    /// ListenerName too long error
    #[error("ListenerName cannot exceed {max} characters (got {actual})")]
    ListenerNameTooLong { max: usize, actual: usize },

    /// TopicId validation error
    #[error("TopicId cannot be empty")]
    TopicIdEmpty,

    /// TopicId too long error
    #[error("TopicId cannot exceed {max} characters (got {actual})")]
    TopicIdTooLong { max: usize, actual: usize },
}
