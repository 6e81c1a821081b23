use common::diagnostics::DiagnosticMessage;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure families a test can script, mirroring what a real adapter would
/// surface from its driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    InvalidConnection,
    Syntax,
    Constraint,
    Timeout,
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidConnection => "invalid connection",
            FailureKind::Syntax => "syntax error",
            FailureKind::Constraint => "constraint violation",
            FailureKind::Timeout => "timeout",
            FailureKind::Unexpected => "unexpected error",
        };
        f.write_str(name)
    }
}

/// A scripted failure. Configured as a program shape, it constructs a fresh
/// [`ConfiguredError`] on every resolution instead of producing a value.
#[derive(Clone, Debug)]
pub struct ErrorSpec {
    kind: FailureKind,
    message: String,
}

impl ErrorSpec {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_connection(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidConnection, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Syntax, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Constraint, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unexpected, message)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub(crate) fn build(&self) -> ConfiguredError {
        ConfiguredError {
            kind: self.kind,
            message: self.message.clone(),
        }
    }
}

/// The error a scripted [`ErrorSpec`] raises.
#[derive(Clone, Debug, Error)]
#[error("{kind}: {message}")]
pub struct ConfiguredError {
    pub kind: FailureKind,
    pub message: String,
}

/// Everything that can go wrong while resolving a response program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("invalid response program: {context}")]
    InvalidProgram { context: DiagnosticMessage },
    #[error("invalid row shape: {context}")]
    InvalidRowShape { context: DiagnosticMessage },
    #[error(transparent)]
    Configured(#[from] ConfiguredError),
    #[error("callable program failed: {context}")]
    Callable {
        context: DiagnosticMessage,
        #[source]
        source: BoxError,
    },
}

impl ProgramError {
    #[track_caller]
    pub fn invalid_program(message: impl Into<String>) -> Self {
        Self::InvalidProgram {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn invalid_row_shape(message: impl Into<String>) -> Self {
        Self::InvalidRowShape {
            context: DiagnosticMessage::new(message.into()),
        }
    }

    #[track_caller]
    pub fn callable(source: BoxError) -> Self {
        let message = source.to_string();
        Self::Callable {
            context: DiagnosticMessage::new(message),
            source,
        }
    }
}

/// The single error kind that crosses the adapter's public boundary. Whatever
/// a program raised during resolution is attached as the source.
#[derive(Debug, Error)]
#[error("database error: {context}")]
pub struct DatabaseError {
    context: DiagnosticMessage,
    #[source]
    source: Option<BoxError>,
}

impl DatabaseError {
    #[track_caller]
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            context: DiagnosticMessage::new(message.into()),
            source: None,
        }
    }

    #[track_caller]
    pub(crate) fn wrap(err: ProgramError) -> Self {
        let message = err.to_string();
        Self {
            context: DiagnosticMessage::new(message),
            source: Some(Box::new(err)),
        }
    }

    /// The resolution error this wraps, if any.
    pub fn program_error(&self) -> Option<&ProgramError> {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<ProgramError>())
    }

    /// The scripted failure this wraps, if the cause was an [`ErrorSpec`].
    pub fn configured(&self) -> Option<&ConfiguredError> {
        match self.program_error() {
            Some(ProgramError::Configured(err)) => Some(err),
            _ => None,
        }
    }
}
