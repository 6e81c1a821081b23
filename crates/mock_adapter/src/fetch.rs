use crate::error::ProgramError;
use crate::program::{kind_of, Program};
use crate::Row;
use serde_json::Value;

/// Resolve the fetch program against `query`, emitting zero or more rows.
///
/// Row resolution reinterprets the terminal shapes of the generic algorithm:
/// a fixed row-record is emitted on every call without being consumed, and a
/// sequence made up entirely of row-records stands for a full result set
/// that is replayed whole on every call. Only a mixed sequence is consumed
/// one entry per call, like any other program.
pub(crate) fn feed(
    program: &mut Program,
    query: &str,
    emit: &mut dyn FnMut(Row),
) -> Result<(), ProgramError> {
    match program {
        Program::Empty => Ok(()),
        Program::Fixed(Value::Object(row)) => {
            emit(row.clone());
            Ok(())
        }
        Program::Fixed(other) => Err(ProgramError::invalid_row_shape(format!(
            "fetch program resolved to {}, expected a row-record",
            kind_of(other)
        ))),
        Program::Sequence(items) => {
            if items.iter().all(is_row_record) {
                // The all-records case: replay, don't consume.
                for item in items.iter() {
                    if let Program::Fixed(Value::Object(row)) = item {
                        emit(row.clone());
                    }
                }
                Ok(())
            } else {
                match items.pop_front() {
                    None => Ok(()),
                    Some(mut head) => feed(&mut head, query, emit),
                }
            }
        }
        Program::Callable(f) => {
            let value = f(query).map_err(ProgramError::callable)?;
            emit_value(value, emit)
        }
        Program::Raise(spec) => Err(ProgramError::Configured(spec.build())),
    }
}

fn is_row_record(program: &Program) -> bool {
    matches!(program, Program::Fixed(Value::Object(_)))
}

fn emit_value(value: Value, emit: &mut dyn FnMut(Row)) -> Result<(), ProgramError> {
    match value {
        Value::Null => Ok(()),
        Value::Object(row) => {
            emit(row);
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(row) => emit(row),
                    other => {
                        return Err(ProgramError::invalid_row_shape(format!(
                            "callable fetch program produced a list containing {}",
                            kind_of(&other)
                        )))
                    }
                }
            }
            Ok(())
        }
        other => Err(ProgramError::invalid_row_shape(format!(
            "callable fetch program produced {}, expected a row-record or list",
            kind_of(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(program: &mut Program) -> Vec<Row> {
        let mut rows = Vec::new();
        feed(program, "SELECT * FROM t", &mut |row| rows.push(row))
            .expect("fetch should succeed");
        rows
    }

    #[test]
    fn single_record_is_emitted_every_call() {
        let mut program = Program::from(json!({"id": 1, "name": "a"}));
        for _ in 0..3 {
            let rows = collect(&mut program);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0]["name"], json!("a"));
        }
    }

    #[test]
    fn record_list_replays_whole_every_call() {
        let mut program = Program::from(json!([{"id": 1}, {"id": 2}]));
        for _ in 0..2 {
            let rows = collect(&mut program);
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0]["id"], json!(1));
            assert_eq!(rows[1]["id"], json!(2));
        }
    }

    #[test]
    fn mixed_sequence_is_consumed_one_entry_per_call() {
        // Second entry is itself a record list, so the sequence is mixed.
        let mut program = Program::from(json!([{"id": 1}, [{"id": 2}, {"id": 3}]]));

        assert_eq!(collect(&mut program).len(), 1);
        let second = collect(&mut program);
        assert_eq!(second.len(), 2);
        assert_eq!(second[1]["id"], json!(3));
        assert!(collect(&mut program).is_empty());
    }

    #[test]
    fn callable_can_return_record_or_list() {
        let mut single = Program::callable(|_| json!({"id": 10}));
        assert_eq!(collect(&mut single).len(), 1);

        let mut list = Program::callable(|_| json!([{"id": 1}, {"id": 2}]));
        assert_eq!(collect(&mut list).len(), 2);

        let mut none = Program::callable(|_| Value::Null);
        assert!(collect(&mut none).is_empty());
    }

    #[test]
    fn empty_program_emits_nothing() {
        let mut program = Program::Empty;
        assert!(collect(&mut program).is_empty());
    }

    #[test]
    fn scalar_fetch_program_is_rejected() {
        let mut program = Program::from(json!("not a row"));
        let err = feed(&mut program, "q", &mut |_| {}).unwrap_err();
        assert!(matches!(err, ProgramError::InvalidRowShape { .. }));
    }

    #[test]
    fn callable_list_with_scalar_entry_is_rejected() {
        let mut program = Program::callable(|_| json!([{"id": 1}, 2]));
        let err = feed(&mut program, "q", &mut |_| {}).unwrap_err();
        assert!(matches!(err, ProgramError::InvalidRowShape { .. }));
    }
}
