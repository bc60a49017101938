//! [`Completion`]-related implementations.

pub mod groq;

use derive_more::{Display, Error as StdError, From};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::{skill, Block};

pub use self::groq::Groq;

/// Language model operation.
pub use common::Handler as Completion;

/// [`Completion`] operation producing an assistant reply to a conversation.
///
/// The implementation prepends its own persona turn, so the provided
/// [`Turn`]s carry the student context and the conversation only.
#[derive(Clone, Debug)]
pub struct Chat(pub Vec<Turn>);

/// Single turn of a [`Chat`] conversation.
#[derive(Clone, Debug)]
pub struct Turn {
    /// [`Role`] of this [`Turn`]'s author.
    pub role: Role,

    /// Text of this [`Turn`].
    pub content: String,
}

/// Author role of a [`Turn`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Instructions and context for the model.
    System,

    /// The student.
    User,

    /// The model itself.
    Assistant,
}

/// [`Completion`] operation planning revision slots around a week's
/// schedule.
#[derive(Clone, Debug)]
pub struct ReviseSchedule {
    /// Schedule [`Block`]s the plan has to fit around.
    pub blocks: Vec<Block>,

    /// Subjects the plan has to cover.
    pub subjects: Vec<skill::Name>,
}

/// Unvalidated revision slot proposed by the model.
///
/// Field values are model output and get re-validated by the caller.
#[derive(Clone, Debug, Deserialize)]
pub struct SlotDraft {
    /// Proposed subject to revise.
    pub subject: String,

    /// Proposed revision method.
    pub method: String,

    /// Proposed day of week, `0` being Sunday.
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u8,

    /// Proposed start time, in `HH:MM` form.
    #[serde(rename = "startTime")]
    pub start_time: String,

    /// Proposed end time, in `HH:MM` form.
    #[serde(rename = "endTime")]
    pub end_time: String,
}

/// [`Completion`] operation generating a diagnostic quiz for a subject.
#[derive(Clone, Debug, From)]
pub struct Diagnose(pub skill::Name);

/// Single question of a generated diagnostic quiz.
///
/// Passed through to the [`User`] verbatim, so it keeps the wire casing.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Question {
    /// Question text.
    pub question: String,

    /// Possible answers.
    pub options: Vec<String>,

    /// Index of the correct answer in `options`.
    #[serde(rename = "correctAnswer")]
    pub correct_answer: u32,

    /// Explanation of the correct answer.
    pub explanation: String,
}

/// [`Completion`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Transport-level error of talking to the model provider.
    #[display("request to the model provider failed: {_0}")]
    Http(reqwest::Error),

    /// Provider replied without any choices.
    #[display("model provider returned no choices")]
    NoChoices,
}
