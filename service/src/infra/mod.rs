//! Infrastructure layer.

pub mod completion;
pub mod database;

pub use self::{
    completion::{Completion, Groq},
    database::{Database, InMemory},
};
