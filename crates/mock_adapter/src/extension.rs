/// Fixed extension point supplied at construction.
///
/// The hook observes every query after annotation and logging, before any
/// program resolution runs. Implementations must be cheap and must not call
/// back into the engine.
pub trait DatabaseExtension: Send + Sync {
    fn on_query(&self, sql: &str);
}
