//! Persisted search form state.
//!
//! The last search's form values are kept in a string key-value store so
//! the next run can start from them.

mod error;
mod file;
mod form;

pub use error::StoreError;
pub use file::{JsonFileStore, KeyValueStore};
pub use form::FormState;
