//! REST API definitions.

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod onboarding;
pub mod resources;
pub mod schedule;

use serde::Serialize;
use service::domain::{
    self, chat as chat_domain, resource,
    schedule::{block, revision, Block as DomainBlock},
    skill, user,
};

use crate::define_error;

/// Representation of a [`domain::User`] in API responses.
///
/// The password hash never leaves the domain layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// ID of the user.
    pub id: user::Id,

    /// Display name of the user.
    pub name: String,

    /// Email address of the user.
    pub email: String,

    /// Study level of the user, if filled in.
    pub level: Option<String>,

    /// Study objectives of the user.
    pub objectives: Vec<String>,

    /// Indicator whether the user has completed onboarding.
    pub onboarding_complete: bool,

    /// When the user was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: user::CreationDateTime,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id,
            name: user.name.into(),
            email: user.email.into(),
            level: user.level.map(Into::into),
            objectives: user.objectives.into_iter().map(Into::into).collect(),
            onboarding_complete: user.onboarding_complete,
            created_at: user.created_at,
        }
    }
}

/// Representation of a [`domain::Resource`] in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// ID of the resource.
    pub id: resource::Id,

    /// Title of the resource.
    pub title: String,

    /// Kind of the resource.
    #[serde(rename = "type")]
    pub kind: resource::Kind,

    /// Subject the resource belongs to.
    pub subject: String,

    /// Link or note body of the resource.
    pub content: String,

    /// Tags attached to the resource.
    pub tags: Vec<String>,

    /// When the resource was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: resource::CreationDateTime,
}

impl From<domain::Resource> for Resource {
    fn from(r: domain::Resource) -> Self {
        Self {
            id: r.id,
            title: r.title.into(),
            kind: r.kind,
            subject: r.subject.into(),
            content: r.content.into(),
            tags: r.tags.into_iter().map(Into::into).collect(),
            created_at: r.created_at,
        }
    }
}

/// Representation of a schedule [`DomainBlock`] in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// ID of the block.
    pub id: block::Id,

    /// Title of the block.
    pub title: String,

    /// Day of week of the block, `0` being Sunday.
    pub day_of_week: service::domain::schedule::DayOfWeek,

    /// Start time of the block.
    pub start_time: service::domain::schedule::ClockTime,

    /// End time of the block.
    pub end_time: service::domain::schedule::ClockTime,

    /// Kind of the block.
    #[serde(rename = "type")]
    pub kind: block::Kind,

    /// Display color of the block, if any.
    pub color: Option<service::domain::schedule::Color>,

    /// When the block was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: block::CreationDateTime,
}

impl From<DomainBlock> for Block {
    fn from(b: DomainBlock) -> Self {
        Self {
            id: b.id,
            title: b.title.into(),
            day_of_week: b.day_of_week,
            start_time: b.start_time,
            end_time: b.end_time,
            kind: b.kind,
            color: b.color,
            created_at: b.created_at,
        }
    }
}

/// Representation of a [`revision::Slot`] in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSlot {
    /// ID of the slot.
    pub id: revision::Id,

    /// Subject to revise in the slot.
    pub subject: skill::Name,

    /// Suggested revision method.
    pub method: revision::Method,

    /// Day of week of the slot, `0` being Sunday.
    pub day_of_week: service::domain::schedule::DayOfWeek,

    /// Start time of the slot.
    pub start_time: service::domain::schedule::ClockTime,

    /// End time of the slot.
    pub end_time: service::domain::schedule::ClockTime,

    /// Indicator whether the slot is marked as done.
    pub completed: bool,

    /// When the slot was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: revision::CreationDateTime,
}

impl From<revision::Slot> for RevisionSlot {
    fn from(s: revision::Slot) -> Self {
        Self {
            id: s.id,
            subject: s.subject,
            method: s.method,
            day_of_week: s.day_of_week,
            start_time: s.start_time,
            end_time: s.end_time,
            completed: s.completed,
            created_at: s.created_at,
        }
    }
}

/// Representation of a chat [`chat_domain::Message`] in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// ID of the message.
    pub id: chat_domain::Id,

    /// Author role of the message.
    pub role: chat_domain::Role,

    /// Text of the message.
    pub content: String,

    /// When the message was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: chat_domain::CreationDateTime,
}

impl From<domain::Message> for ChatMessage {
    fn from(m: domain::Message) -> Self {
        Self {
            id: m.id,
            role: m.role,
            content: m.content.into(),
            created_at: m.created_at,
        }
    }
}

/// Representation of a [`domain::Skill`] in API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Subject name of the skill.
    pub name: skill::Name,

    /// Mastery score of the skill, in percent.
    pub score: skill::Score,
}

impl From<domain::Skill> for Skill {
    fn from(s: domain::Skill) -> Self {
        Self {
            name: s.name,
            score: s.score,
        }
    }
}

define_error! {
    enum ApiError {
        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "Invalid input"]
        InvalidInput,

        #[code = "TOO_MANY_ATTEMPTS"]
        #[status = TOO_MANY_REQUESTS]
        #[message = "Too many attempts, try again later"]
        TooManyAttempts,
    }
}
