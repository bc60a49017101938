//! [`Resource`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::user, sanitize};
#[cfg(doc)]
use crate::domain::User;

/// Item of a [`User`]'s personal study library.
#[derive(Clone, Debug, From)]
pub struct Resource {
    /// ID of this [`Resource`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Resource`].
    pub user_id: user::Id,

    /// [`Title`] of this [`Resource`].
    pub title: Title,

    /// [`Kind`] of this [`Resource`].
    pub kind: Kind,

    /// [`Subject`] this [`Resource`] belongs to.
    pub subject: Subject,

    /// [`Content`] of this [`Resource`].
    pub content: Content,

    /// [`Tag`]s attached to this [`Resource`].
    pub tags: Vec<Tag>,

    /// [`DateTime`] when this [`Resource`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Resource`].
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

impl FromStr for Id {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

define_kind! {
    #[doc = "Kind of a [`Resource`]."]
    enum Kind {
        #[doc = "Link to an external web page."]
        Url,

        #[doc = "Link to a PDF document."]
        Pdf,

        #[doc = "Free-form text note."]
        Note,
    }
}

/// Title of a [`Resource`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    ///
    /// The `title` is sanitized before validation.
    #[must_use]
    pub fn new(title: impl AsRef<str>) -> Option<Self> {
        let title = sanitize::text(title.as_ref());
        (!title.is_empty() && title.chars().count() <= 200)
            .then_some(Self(title))
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Subject a [`Resource`] belongs to (e.g. "Mathématiques").
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Subject(String);

impl Subject {
    /// Creates a new [`Subject`] if the given `subject` is valid.
    ///
    /// The `subject` is sanitized before validation.
    #[must_use]
    pub fn new(subject: impl AsRef<str>) -> Option<Self> {
        let subject = sanitize::text(subject.as_ref());
        (!subject.is_empty() && subject.chars().count() <= 100)
            .then_some(Self(subject))
    }
}

impl FromStr for Subject {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Subject`")
    }
}

/// Content of a [`Resource`].
///
/// For [`Kind::Url`] and [`Kind::Pdf`] this is the sanitized link, for
/// [`Kind::Note`] the sanitized note body.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Content(String);

impl Content {
    /// Creates a new [`Content`] of the given [`Kind`] if the provided
    /// `content` is valid.
    ///
    /// Link kinds go through the URL allow-list, so a `javascript:` payload
    /// is rejected here rather than stored.
    #[must_use]
    pub fn new(kind: Kind, content: impl AsRef<str>) -> Option<Self> {
        let content = content.as_ref();
        if content.chars().count() > 10_000 {
            return None;
        }
        let content = match kind {
            Kind::Url | Kind::Pdf => sanitize::url(content),
            Kind::Note => sanitize::text(content),
        };
        (!content.is_empty()).then_some(Self(content))
    }
}

/// Tag attached to a [`Resource`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Tag(String);

impl Tag {
    /// Creates a new [`Tag`] if the given `tag` is valid.
    ///
    /// The `tag` is sanitized before validation.
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Option<Self> {
        let tag = sanitize::text(tag.as_ref());
        (!tag.is_empty() && tag.chars().count() <= 50).then_some(Self(tag))
    }
}

/// [`DateTime`] when a [`Resource`] was created.
pub type CreationDateTime = DateTimeOf<(Resource, unit::Creation)>;

pub mod list {
    //! Definitions of [`Resource`]s listing.

    use crate::domain::user;

    use super::{Resource, Subject};

    /// Filter of [`Resource`]s listing.
    ///
    /// Matched [`Resource`]s are ordered by creation time, newest first.
    #[derive(Clone, Debug)]
    pub struct Filter {
        /// ID of the [`User`] whose [`Resource`]s should be listed.
        ///
        /// [`User`]: crate::domain::User
        pub user_id: user::Id,

        /// [`Subject`] to list [`Resource`]s of.
        ///
        /// [`None`] lists all the subjects.
        pub subject: Option<Subject>,

        /// Maximum number of [`Resource`]s to return.
        pub limit: Option<usize>,
    }
}

#[cfg(test)]
mod content_spec {
    use super::{Content, Kind};

    #[test]
    fn link_kinds_go_through_the_url_allow_list() {
        assert!(Content::new(Kind::Url, "https://example.com").is_some());
        assert!(Content::new(Kind::Pdf, "javascript:alert(1)").is_none());
        assert!(Content::new(Kind::Url, "ftp://example.com").is_none());
    }

    #[test]
    fn notes_are_sanitized_but_kept() {
        let content =
            Content::new(Kind::Note, "<script>x</script>chapitre 3").unwrap();
        assert_eq!(content.to_string(), "xchapitre 3");
    }

    #[test]
    fn oversized_content_is_rejected() {
        assert!(Content::new(Kind::Note, "a".repeat(10_001)).is_none());
    }
}
