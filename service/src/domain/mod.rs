//! Domain definitions.

pub mod chat;
pub mod resource;
pub mod schedule;
pub mod skill;
pub mod user;

pub use self::{
    chat::Message, resource::Resource, schedule::Block, skill::Skill,
    user::User,
};
