//! [`Block`] definitions.

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

use super::{ClockTime, Color, DayOfWeek};

/// Recurring weekly schedule entry of a [`User`].
#[derive(Clone, Debug, From)]
pub struct Block {
    /// ID of this [`Block`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Block`].
    pub user_id: user::Id,

    /// [`Title`] of this [`Block`].
    pub title: Title,

    /// [`DayOfWeek`] this [`Block`] occurs on.
    pub day_of_week: DayOfWeek,

    /// [`ClockTime`] this [`Block`] starts at.
    pub start_time: ClockTime,

    /// [`ClockTime`] this [`Block`] ends at.
    pub end_time: ClockTime,

    /// [`Kind`] of this [`Block`].
    pub kind: Kind,

    /// Display [`Color`] of this [`Block`].
    pub color: Option<Color>,

    /// [`DateTime`] when this [`Block`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Block`].
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
    #[doc = "Kind of a [`Block`]."]
    enum Kind {
        #[doc = "Regular course or lecture."]
        Course,

        #[doc = "Self-organized revision session."]
        Revision,

        #[doc = "Exam or graded assessment."]
        Exam,

        #[doc = "Anything else occupying the slot."]
        Other,
    }
}

impl Default for Kind {
    fn default() -> Self {
        Self::Course
    }
}

/// Title of a [`Block`].
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

/// [`DateTime`] when a [`Block`] was created.
pub type CreationDateTime = DateTimeOf<(Block, unit::Creation)>;
