//! [`Skill`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::Serialize;
use uuid::Uuid;

use crate::{domain::user, sanitize};
#[cfg(doc)]
use crate::domain::User;

/// Per-subject mastery level of a [`User`].
///
/// One [`Skill`] per `(user, subject name)` pair; re-running a diagnostic
/// overwrites the score.
#[derive(Clone, Debug, From)]
pub struct Skill {
    /// ID of the [`User`] owning this [`Skill`].
    pub user_id: user::Id,

    /// [`Name`] of this [`Skill`]'s subject.
    pub name: Name,

    /// Current [`Score`] of this [`Skill`].
    pub score: Score,
}

/// Outcome of one diagnostic quiz taken by a [`User`] during onboarding.
#[derive(Clone, Debug, From)]
pub struct DiagnosticResult {
    /// ID of this [`DiagnosticResult`].
    pub id: Id,

    /// ID of the [`User`] this [`DiagnosticResult`] belongs to.
    pub user_id: user::Id,

    /// [`Name`] of the assessed subject.
    pub subject: Name,

    /// Number of correctly answered questions.
    pub score: u32,

    /// Total number of questions in the quiz.
    pub total: u32,

    /// [`Area`]s the [`User`] struggled with.
    pub weak_areas: Vec<Area>,

    /// [`DateTime`] when this [`DiagnosticResult`] was recorded.
    pub created_at: CreationDateTime,
}

/// ID of a [`DiagnosticResult`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Into, PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`Skill`]'s subject (e.g. "Physique-Chimie").
#[derive(
    AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq, Serialize,
)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    ///
    /// The `name` is sanitized before validation.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = sanitize::text(name.as_ref());
        (!name.is_empty() && name.chars().count() <= 100)
            .then_some(Self(name))
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Mastery score of a [`Skill`], in percent.
#[derive(
    Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct Score(u8);

impl Score {
    /// Creates a new [`Score`] if the given `percent` does not exceed `100`.
    #[must_use]
    pub fn new(percent: u8) -> Option<Self> {
        (percent <= 100).then_some(Self(percent))
    }

    /// Creates a new [`Score`] from a `correct / total` quiz outcome,
    /// rounded to the nearest percent.
    ///
    /// A quiz with no questions scores zero.
    #[must_use]
    pub fn from_ratio(correct: u32, total: u32) -> Self {
        if total == 0 {
            return Self(0);
        }
        let percent = (f64::from(correct.min(total)) / f64::from(total)
            * 100.0)
            .round();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "bounded to `0..=100` above"
        )]
        let percent = percent as u8;
        Self(percent)
    }
}

/// Area of a subject a [`User`] struggles with.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq, Serialize)]
#[as_ref(str, String)]
pub struct Area(String);

impl Area {
    /// Creates a new [`Area`] if the given `area` is valid.
    ///
    /// The `area` is sanitized before validation.
    #[must_use]
    pub fn new(area: impl AsRef<str>) -> Option<Self> {
        let area = sanitize::text(area.as_ref());
        (!area.is_empty() && area.chars().count() <= 200)
            .then_some(Self(area))
    }
}

/// [`DateTime`] when a [`DiagnosticResult`] was recorded.
pub type CreationDateTime = DateTimeOf<(DiagnosticResult, unit::Creation)>;

#[cfg(test)]
mod score_spec {
    use super::Score;

    #[test]
    fn rounds_the_ratio_to_the_nearest_percent() {
        assert_eq!(u8::from(Score::from_ratio(3, 5)), 60);
        assert_eq!(u8::from(Score::from_ratio(1, 3)), 33);
        assert_eq!(u8::from(Score::from_ratio(2, 3)), 67);
        assert_eq!(u8::from(Score::from_ratio(5, 5)), 100);
    }

    #[test]
    fn degenerate_outcomes_stay_in_range() {
        assert_eq!(u8::from(Score::from_ratio(0, 0)), 0);
        assert_eq!(u8::from(Score::from_ratio(7, 5)), 100);
    }
}
