//! Chat assistant definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Single message of a [`User`]'s conversation with the assistant.
#[derive(Clone, Debug, From)]
pub struct Message {
    /// ID of this [`Message`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Message`].
    pub user_id: user::Id,

    /// [`Role`] of this [`Message`]'s author.
    pub role: Role,

    /// [`Content`] of this [`Message`].
    pub content: Content,

    /// [`DateTime`] when this [`Message`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Message`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Author role of a [`Message`]."]
    enum Role {
        #[doc = "The [`User`](crate::domain::User) themselves."]
        User,

        #[doc = "The AI assistant."]
        Assistant,
    }
}

/// Content of a [`Message`].
///
/// Kept verbatim apart from trimming: the text is conversational input for
/// the language model, never rendered as markup, and filtering it would
/// degrade questions legitimately containing code or formulas.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Content(String);

impl Content {
    /// Creates a new [`Content`] if the given `content` is valid.
    #[must_use]
    pub fn new(content: impl AsRef<str>) -> Option<Self> {
        let content = content.as_ref().trim();
        (!content.is_empty() && content.chars().count() <= 2000)
            .then(|| Self(content.to_owned()))
    }

    /// Creates a new [`Content`] out of a model reply.
    ///
    /// Unlike [`Content::new()`], never fails: oversized output is
    /// truncated and blank output is substituted with a stock apology.
    #[must_use]
    pub fn reply(content: impl AsRef<str>) -> Self {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Self(
                "Désolée, je n'ai pas pu générer de réponse.".to_owned(),
            );
        }
        Self(trimmed.chars().take(2000).collect())
    }
}

impl FromStr for Content {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Content`")
    }
}

/// [`DateTime`] when a [`Message`] was created.
pub type CreationDateTime = DateTimeOf<(Message, unit::Creation)>;

pub mod history {
    //! Definitions of [`Message`]s history listing.

    use crate::domain::user;

    use super::Message;

    /// Filter of [`Message`]s history listing.
    ///
    /// Matched [`Message`]s are ordered oldest first.
    #[derive(Clone, Copy, Debug)]
    pub struct Filter {
        /// ID of the [`User`] whose [`Message`]s should be listed.
        ///
        /// [`User`]: crate::domain::User
        pub user_id: user::Id,

        /// Number of most recent [`Message`]s to keep.
        ///
        /// [`None`] keeps the whole history.
        pub last: Option<usize>,
    }
}

#[cfg(test)]
mod content_spec {
    use super::Content;

    #[test]
    fn trims_but_does_not_filter() {
        let content = Content::new("  can you explain <b>limits</b>?  ");
        assert_eq!(
            content.unwrap().to_string(),
            "can you explain <b>limits</b>?",
        );
    }

    #[test]
    fn rejects_blank_and_oversized_messages() {
        assert!(Content::new("   ").is_none());
        assert!(Content::new("a".repeat(2001)).is_none());
        assert!(Content::new("a".repeat(2000)).is_some());
    }
}
