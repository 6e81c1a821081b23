pub mod config;
pub mod diagnostics;

pub use config::{ConfigError, ConnectOptions, MockProfile};
pub use diagnostics::DiagnosticMessage;
