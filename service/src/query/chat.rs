//! [`Query`] collection related to a chat history.

use common::operations::By;

use crate::domain::{chat::history, Message};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the [`Message`]s matching a [`history::Filter`], oldest first.
pub type History = DatabaseQuery<By<Vec<Message>, history::Filter>>;
