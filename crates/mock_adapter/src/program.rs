use crate::error::{BoxError, ErrorSpec, ProgramError};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

pub type QueryFn = Arc<dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync>;

/// A scripted rule for producing the next result of a simulated execution.
///
/// Every response the adapter can give (rows, row counts, generated ids,
/// raised errors) is resolved through this one shape:
///
/// - `Empty` resolves to the caller's default.
/// - `Fixed` resolves to the same value on every call.
/// - `Sequence` pops its front entry and resolves that; once drained it
///   resolves to the default forever. Depletion is permanent.
/// - `Callable` is invoked with the annotated query text.
/// - `Raise` constructs the scripted error instead of a value.
#[derive(Clone, Default)]
pub enum Program {
    #[default]
    Empty,
    Fixed(Value),
    Sequence(VecDeque<Program>),
    Callable(QueryFn),
    Raise(ErrorSpec),
}

impl Program {
    pub fn fixed(value: impl Into<Value>) -> Self {
        Program::Fixed(value.into())
    }

    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Program>,
    {
        Program::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// An infallible callable taking the annotated query text.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Program::Callable(Arc::new(move |query| Ok(f(query))))
    }

    /// A callable that may fail; the error surfaces wrapped at the adapter
    /// boundary like any other resolution failure.
    pub fn try_callable<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Program::Callable(Arc::new(f))
    }

    pub fn raise(spec: ErrorSpec) -> Self {
        Program::Raise(spec)
    }

    /// Resolve one step of the program against `query`.
    ///
    /// The only mutation is the front pop of a `Sequence`; a popped entry is
    /// resolved once and discarded.
    pub(crate) fn resolve(&mut self, query: &str, default: &Value) -> Result<Value, ProgramError> {
        match self {
            Program::Empty => Ok(default.clone()),
            Program::Fixed(value) => Ok(value.clone()),
            Program::Sequence(items) => match items.pop_front() {
                None => Ok(default.clone()),
                Some(mut head) => head.resolve(query, default),
            },
            Program::Callable(f) => f(query).map_err(ProgramError::callable),
            Program::Raise(spec) => Err(ProgramError::Configured(spec.build())),
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Empty => f.write_str("Empty"),
            Program::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Program::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Program::Callable(_) => f.write_str("Callable(..)"),
            Program::Raise(spec) => f.debug_tuple("Raise").field(spec).finish(),
        }
    }
}

/// JSON configuration values map onto program shapes the way a dynamic
/// configuration surface would: `null` leaves the program unset, an array
/// becomes a sequence of sub-programs, anything else is a fixed response.
impl From<Value> for Program {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Program::Empty,
            Value::Array(items) => Program::Sequence(items.into_iter().map(Program::from).collect()),
            other => Program::Fixed(other),
        }
    }
}

impl From<i64> for Program {
    fn from(value: i64) -> Self {
        Program::Fixed(Value::from(value))
    }
}

impl From<i32> for Program {
    fn from(value: i32) -> Self {
        Program::Fixed(Value::from(value))
    }
}

impl From<crate::Row> for Program {
    fn from(row: crate::Row) -> Self {
        Program::Fixed(Value::Object(row))
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_resolves_to_default() {
        let mut program = Program::Empty;
        assert_eq!(program.resolve("SELECT 1", &json!(0)).unwrap(), json!(0));
    }

    #[test]
    fn fixed_is_never_consumed() {
        let mut program = Program::fixed(7);
        for _ in 0..3 {
            assert_eq!(program.resolve("SELECT 1", &Value::Null).unwrap(), json!(7));
        }
    }

    #[test]
    fn sequence_depletes_in_order_then_defaults_forever() {
        let mut program = Program::from(json!([1, 2]));
        let default = json!(0);
        assert_eq!(program.resolve("q", &default).unwrap(), json!(1));
        assert_eq!(program.resolve("q", &default).unwrap(), json!(2));
        assert_eq!(program.resolve("q", &default).unwrap(), json!(0));
        assert_eq!(program.resolve("q", &default).unwrap(), json!(0));
    }

    #[test]
    fn nested_sequence_yields_one_entry_per_outer_call() {
        // The popped head is resolved once and discarded, so only the inner
        // sequence's first entry is ever observed.
        let mut program = Program::from(json!([[1, 2], 3]));
        let default = json!(0);
        assert_eq!(program.resolve("q", &default).unwrap(), json!(1));
        assert_eq!(program.resolve("q", &default).unwrap(), json!(3));
        assert_eq!(program.resolve("q", &default).unwrap(), json!(0));
    }

    #[test]
    fn callable_receives_query_text() {
        let mut program = Program::callable(|query| json!(query.len() as i64));
        assert_eq!(program.resolve("12345", &Value::Null).unwrap(), json!(5));
    }

    #[test]
    fn failing_callable_surfaces_as_callable_error() {
        let mut program =
            Program::try_callable(|_| Err("backend exploded".to_string().into()));
        let err = program.resolve("q", &Value::Null).unwrap_err();
        assert!(matches!(err, ProgramError::Callable { .. }));
    }

    #[test]
    fn raise_always_raises() {
        let mut program = Program::raise(ErrorSpec::timeout("statement timeout"));
        for _ in 0..2 {
            let err = program.resolve("q", &Value::Null).unwrap_err();
            assert!(matches!(err, ProgramError::Configured(_)));
        }
    }

    #[test]
    fn json_conversion_picks_shapes() {
        assert!(matches!(Program::from(json!(null)), Program::Empty));
        assert!(matches!(Program::from(json!(5)), Program::Fixed(_)));
        match Program::from(json!([1, null])) {
            Program::Sequence(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[0], Program::Fixed(_)));
                assert!(matches!(items[1], Program::Empty));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }
}
