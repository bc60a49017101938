//! [`Database`]-related implementations.

pub mod mem;

use derive_more::{Display, Error as StdError};

pub use self::mem::InMemory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Uniqueness constraint violation.
    #[display("`{_0}` already exists")]
    AlreadyExists(#[error(not(source))] &'static str),
}
