//! Result type for invariant violations inside the elaborator.

/// The result type for fallible internal operations.
///
/// `Err` means the engine itself is inconsistent, not that the input design
/// is wrong. Design problems are reported as diagnostics.
pub type QhdlResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in the engine rather than in the input.
#[derive(Debug, thiserror::Error)]
#[error("internal elaboration error: {message}")]
pub struct InternalError {
    /// Description of the broken invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("net node out of range");
        assert_eq!(
            format!("{err}"),
            "internal elaboration error: net node out of range"
        );
    }

    #[test]
    fn propagates_with_question_mark() {
        fn inner() -> QhdlResult<u32> {
            Err(InternalError::new("boom"))
        }
        fn outer() -> QhdlResult<u32> {
            let v = inner()?;
            Ok(v + 1)
        }
        assert_eq!(outer().unwrap_err().message, "boom");
    }
}
