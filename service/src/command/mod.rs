//! [`Command`] definition.

pub mod authorize_user_session;
pub mod clear_chat_history;
pub mod complete_onboarding;
pub mod create_resource;
pub mod create_schedule_block;
pub mod create_user;
pub mod create_user_session;
pub mod delete_resource;
pub mod delete_schedule_block;
pub mod generate_diagnostic_questions;
pub mod generate_revision_slots;
pub mod send_chat_message;
pub mod toggle_revision_slot;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    clear_chat_history::ClearChatHistory,
    complete_onboarding::CompleteOnboarding,
    create_resource::CreateResource,
    create_schedule_block::CreateScheduleBlock, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_resource::DeleteResource,
    delete_schedule_block::DeleteScheduleBlock,
    generate_diagnostic_questions::GenerateDiagnosticQuestions,
    generate_revision_slots::GenerateRevisionSlots,
    send_chat_message::SendChatMessage,
    toggle_revision_slot::ToggleRevisionSlot,
};
