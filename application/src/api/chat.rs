//! Study assistant chat endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        clear_chat_history, send_chat_message, Command as _,
        ClearChatHistory, SendChatMessage,
    },
    domain::chat::{self, history},
    query,
};

use crate::{
    api::{ApiError, ChatMessage},
    define_error, AsError, Context, Error,
};

/// Number of latest messages returned by the history endpoint.
const HISTORY_LIMIT: usize = 50;

/// `GET /api/chat` response payload.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Latest messages of the conversation, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Returns the latest messages of the current user's conversation.
pub async fn history(ctx: Context) -> Result<Json<HistoryResponse>, Error> {
    let session = ctx.current_session().await?;

    let messages = ctx
        .service()
        .execute(query::chat::History::by(history::Filter {
            user_id: session.user_id,
            last: Some(HISTORY_LIMIT),
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(HistoryResponse {
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/chat` request payload.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// Text of the message to send.
    pub message: String,
}

/// `POST /api/chat` response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    /// The persisted message of the user.
    pub user_message: ChatMessage,

    /// The persisted reply of the assistant.
    pub ai_message: ChatMessage,
}

/// Sends a message to the study assistant and returns both sides of the
/// exchange.
pub async fn send(
    ctx: Context,
    Json(req): Json<SendRequest>,
) -> Result<Json<SendResponse>, Error> {
    let session = ctx.current_session().await?;

    // Keyed by user rather than IP: chatting is authenticated, and the
    // expensive part is the model call made on the user's behalf.
    let quota = ctx.settings().rate_limits.chat;
    if !ctx.service().limiter().admit(
        format!("chat:{}", session.user_id),
        quota.max_requests,
        quota.window,
    ) {
        return Err(ApiError::TooManyAttempts.into());
    }

    let message =
        chat::Content::new(req.message).ok_or(ChatError::InvalidMessage)?;

    let output = ctx
        .service()
        .execute(SendChatMessage {
            user_id: session.user_id,
            message,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(SendResponse {
        user_message: output.user_message.into(),
        ai_message: output.assistant_message.into(),
    }))
}

/// Clears the conversation of the current user.
pub async fn clear(ctx: Context) -> Result<Json<serde_json::Value>, Error> {
    let session = ctx.current_session().await?;

    ctx.service()
        .execute(ClearChatHistory {
            user_id: session.user_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

impl AsError for send_chat_message::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Ai(_) | Self::Db(_) => None,
        }
    }
}

impl AsError for clear_chat_history::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(_) => None,
        }
    }
}

define_error! {
    enum ChatError {
        #[code = "INVALID_MESSAGE"]
        #[status = BAD_REQUEST]
        #[message = "Message must be between 1 and 2000 characters"]
        InvalidMessage,
    }
}
