//! Error definitions for the binding compiler

use thiserror::Error;

/// Error returned by [`compile`](crate::mapping::compile)
///
/// Always tied to the 1-based line that stopped compilation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error on line {line}: {kind}")]
pub struct ConfigError {
    pub line: usize,
    pub kind: ConfigErrorKind,
}

impl ConfigError {
    pub(crate) fn new(line: usize, kind: ConfigErrorKind) -> Self {
        Self { line, kind }
    }
}

/// What went wrong on the offending line
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigErrorKind {
    /// Zero or more than one `=` on the line
    #[error("expected exactly one equals sign.")]
    EqualsCount,

    #[error("empty left hand side.")]
    EmptyLeftSide,

    #[error("empty right hand side.")]
    EmptyRightSide,

    /// Neither a binding nor a constant assignment could be read from the line
    #[error("could not convert this line into a binding or constant assignment.")]
    Unrecognized,

    /// The line names an action that exists in the grammar but has no implementation
    #[error("{0} is not supported yet.")]
    Unsupported(String),
}

impl ConfigErrorKind {
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ConfigErrorKind::EqualsCount
                | ConfigErrorKind::EmptyLeftSide
                | ConfigErrorKind::EmptyRightSide
        )
    }
}

// Reasons a line is not a binding. Only `Unsupported` is ever surfaced.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum BindingError {
    #[error("left hand side isn't a gamepad input.")]
    NotAGamepadInput,

    #[error("right hand side isn't a mouse or keyboard input.")]
    NotAnOutput,

    #[error("{0} is not supported yet.")]
    Unsupported(String),
}

// Reasons a line is not a constant assignment
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum ConstantError {
    #[error("left hand side is not a known constant.")]
    UnknownConstant,

    #[error("right hand side isn't a number.")]
    NotANumber,

    #[error("{name} must be {expected}, got {value}.")]
    OutOfRange {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[error("unknown scaling mode. Please use \"constant\", \"linear\", \"squared\" or \"cubed\".")]
    UnknownScalingMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_line_number() {
        let err = ConfigError::new(3, ConfigErrorKind::EqualsCount);
        assert_eq!(
            err.to_string(),
            "Error on line 3: expected exactly one equals sign."
        );
    }

    #[test]
    fn test_syntax_classification() {
        assert!(ConfigErrorKind::EmptyRightSide.is_syntax());
        assert!(!ConfigErrorKind::Unrecognized.is_syntax());
        assert!(!ConfigErrorKind::Unsupported("MOUSEX".into()).is_syntax());
    }
}
