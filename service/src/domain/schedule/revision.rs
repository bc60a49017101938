//! [`Slot`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{skill, user};
#[cfg(doc)]
use crate::domain::User;

use super::{ClockTime, DayOfWeek};

/// AI-planned revision slot of a [`User`]'s week.
///
/// Slots are regenerated as a whole set, so they carry no user edits other
/// than the completion mark.
#[derive(Clone, Debug, From)]
pub struct Slot {
    /// ID of this [`Slot`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Slot`].
    pub user_id: user::Id,

    /// [`Name`] of the subject to revise in this [`Slot`].
    ///
    /// [`Name`]: skill::Name
    pub subject: skill::Name,

    /// Revision [`Method`] suggested for this [`Slot`].
    pub method: Method,

    /// [`DayOfWeek`] this [`Slot`] occurs on.
    pub day_of_week: DayOfWeek,

    /// [`ClockTime`] this [`Slot`] starts at.
    pub start_time: ClockTime,

    /// [`ClockTime`] this [`Slot`] ends at.
    pub end_time: ClockTime,

    /// Indicator whether the [`User`] has marked this [`Slot`] as done.
    pub completed: bool,

    /// [`DateTime`] when this [`Slot`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Slot`].
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
    #[doc = "Revision method suggested for a [`Slot`]."]
    enum Method {
        #[doc = "25-minute focus intervals with short breaks."]
        Pomodoro,

        #[doc = "Recalling the material without looking at it."]
        ActiveRecall,

        #[doc = "Reviewing at growing intervals."]
        SpacedRepetition,
    }
}

/// [`DateTime`] when a [`Slot`] was created.
pub type CreationDateTime = DateTimeOf<(Slot, unit::Creation)>;
