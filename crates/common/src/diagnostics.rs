use std::{borrow::Cow, fmt, panic::Location};

/// Error message that records the call-site it was created at.
///
/// Error enums across the workspace carry one of these as their `context`
/// field; constructors are marked `#[track_caller]` so the recorded location
/// points at the code that produced the error, not at the enum helper.
#[derive(Clone, Debug)]
pub struct DiagnosticMessage {
    message: Cow<'static, str>,
    location: &'static Location<'static>,
}

impl DiagnosticMessage {
    #[track_caller]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// The human readable message, without the location suffix.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at {}:{})",
            self.message,
            self.location.file(),
            self.location.line()
        )
    }
}

/// `format!`-style construction of a [`DiagnosticMessage`] that still captures
/// file/line of the caller.
#[macro_export]
macro_rules! diag {
    ($msg:literal $(,)?) => {
        $crate::diagnostics::DiagnosticMessage::new($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::diagnostics::DiagnosticMessage::new(format!($fmt, $($arg)*))
    };
}
