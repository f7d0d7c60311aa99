//! Read-only collaborator contract for the data sources consumed by selection.

use crate::error::SelectionResult;

/// A keyed, read-only data source.
///
/// Implementations must be safe for concurrent reads. Absence of data is an
/// empty value (empty `Vec`, `None`), never an error; errors are reserved for
/// genuine source failures and are propagated to the caller untouched.
pub trait ReadableDao<K: ?Sized, V>: Send + Sync {
    fn get(&self, key: &K) -> SelectionResult<V>;
}
