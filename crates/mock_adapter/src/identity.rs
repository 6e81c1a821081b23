use crate::error::ProgramError;
use crate::program::{kind_of, Program};
use serde_json::Value;

/// Identifier source for insert statements.
///
/// A plain integer configuration becomes a live counter: every resolution
/// returns the current value and advances it, monotonically, for the
/// lifetime of the engine. Any other shape goes through the generic program
/// algorithm with an absent default.
#[derive(Debug)]
pub(crate) enum AutoId {
    Counter(i64),
    Program(Program),
}

impl Default for AutoId {
    fn default() -> Self {
        AutoId::Program(Program::Empty)
    }
}

impl AutoId {
    pub(crate) fn configure(program: Program) -> Self {
        match program {
            Program::Fixed(Value::Number(n)) => match n.as_i64() {
                Some(start) => AutoId::Counter(start),
                None => AutoId::Program(Program::Fixed(Value::Number(n))),
            },
            other => AutoId::Program(other),
        }
    }

    pub(crate) fn next(&mut self, query: &str) -> Result<Option<i64>, ProgramError> {
        match self {
            AutoId::Counter(next) => {
                let current = *next;
                *next += 1;
                Ok(Some(current))
            }
            AutoId::Program(program) => match program.resolve(query, &Value::Null)? {
                Value::Null => Ok(None),
                value => value.as_i64().map(Some).ok_or_else(|| {
                    ProgramError::invalid_program(format!(
                        "identifier program resolved to {}, expected an integer",
                        kind_of(&value)
                    ))
                }),
            },
        }
    }
}

/// Row-count resolution is the generic algorithm with default `0`. A plain
/// integer here is returned unchanged on every call; only the identifier
/// side auto-increments. That asymmetry is contractual.
pub(crate) fn count_rows(program: &mut Program, query: &str) -> Result<i64, ProgramError> {
    let value = program.resolve(query, &Value::from(0))?;
    value.as_i64().ok_or_else(|| {
        ProgramError::invalid_program(format!(
            "row-count program resolved to {}, expected an integer",
            kind_of(&value)
        ))
    })
}
