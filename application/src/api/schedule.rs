//! Weekly schedule endpoints.

use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        create_schedule_block, delete_schedule_block, generate_revision_slots,
        toggle_revision_slot, Command as _, CreateScheduleBlock,
        DeleteScheduleBlock, GenerateRevisionSlots, ToggleRevisionSlot,
    },
    domain::schedule::{self, block, revision},
    query,
};

use crate::{
    api::{ApiError, Block, RevisionSlot},
    define_error, AsError, Context, Error,
};

/// `GET /api/schedule` response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
    /// Fixed schedule blocks, ordered by day and start time.
    pub schedule_blocks: Vec<Block>,

    /// Generated revision slots, ordered by day and start time.
    pub revision_slots: Vec<RevisionSlot>,
}

/// Returns the full week of the current user.
pub async fn week(ctx: Context) -> Result<Json<WeekResponse>, Error> {
    let session = ctx.current_session().await?;

    let blocks = ctx
        .service()
        .execute(query::schedule::Blocks::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;
    let slots = ctx
        .service()
        .execute(query::schedule::RevisionSlots::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(WeekResponse {
        schedule_blocks: blocks.into_iter().map(Into::into).collect(),
        revision_slots: slots.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/schedule` request payload.
///
/// Either creates a block (all block fields required) or, with
/// `action: "generate"`, regenerates the revision plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateRequest {
    /// Action to perform instead of creating a block.
    pub action: Option<String>,

    /// Title of the new block.
    pub title: Option<String>,

    /// Day of week of the new block, `0` being Sunday.
    pub day_of_week: Option<u8>,

    /// Start time of the new block.
    pub start_time: Option<String>,

    /// End time of the new block.
    pub end_time: Option<String>,

    /// Kind of the new block.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Display color of the new block.
    pub color: Option<String>,
}

/// `POST /api/schedule` response payload for block creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    /// The created block.
    pub schedule_block: Block,
}

/// `POST /api/schedule` response payload for plan regeneration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// The regenerated revision slots.
    pub revision_slots: Vec<RevisionSlot>,
}

/// Response payload of [`mutate`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MutateResponse {
    /// A block was created.
    Created(CreateResponse),

    /// The revision plan was regenerated.
    Generated(GenerateResponse),
}

/// Creates a schedule block, or regenerates the revision plan when the
/// payload asks for the `generate` action.
pub async fn mutate(
    ctx: Context,
    Json(req): Json<MutateRequest>,
) -> Result<(StatusCode, Json<MutateResponse>), Error> {
    let session = ctx.current_session().await?;

    match req.action.as_deref() {
        Some("generate") => {
            let slots = ctx
                .service()
                .execute(GenerateRevisionSlots {
                    user_id: session.user_id,
                })
                .await
                .map_err(AsError::into_error)?;

            Ok((
                StatusCode::OK,
                Json(MutateResponse::Generated(GenerateResponse {
                    revision_slots: slots
                        .into_iter()
                        .map(Into::into)
                        .collect(),
                })),
            ))
        }
        Some(_) => Err(ScheduleError::UnknownAction.into()),
        None => {
            let title = req
                .title
                .and_then(block::Title::new)
                .ok_or(ApiError::InvalidInput)?;
            let day_of_week = req
                .day_of_week
                .and_then(schedule::DayOfWeek::new)
                .ok_or(ApiError::InvalidInput)?;
            let start_time = req
                .start_time
                .and_then(schedule::ClockTime::new)
                .ok_or(ApiError::InvalidInput)?;
            let end_time = req
                .end_time
                .and_then(schedule::ClockTime::new)
                .ok_or(ApiError::InvalidInput)?;
            let kind = req
                .kind
                .map(|k| {
                    k.parse::<block::Kind>()
                        .map_err(|_| ApiError::InvalidInput)
                })
                .transpose()?
                .unwrap_or_default();
            let color = req
                .color
                .map(|c| {
                    schedule::Color::new(c).ok_or(ApiError::InvalidInput)
                })
                .transpose()?;

            let block = ctx
                .service()
                .execute(CreateScheduleBlock {
                    user_id: session.user_id,
                    title,
                    day_of_week,
                    start_time,
                    end_time,
                    kind,
                    color,
                })
                .await
                .map_err(AsError::into_error)?;

            Ok((
                StatusCode::CREATED,
                Json(MutateResponse::Created(CreateResponse {
                    schedule_block: block.into(),
                })),
            ))
        }
    }
}

/// `DELETE /api/schedule` request payload.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// ID of the block to delete.
    pub id: String,
}

/// Deletes a block from the current user's schedule.
pub async fn delete(
    ctx: Context,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<serde_json::Value>, Error> {
    let session = ctx.current_session().await?;

    let id = req
        .id
        .parse::<block::Id>()
        .map_err(|_| ApiError::InvalidInput)?;

    ctx.service()
        .execute(DeleteScheduleBlock {
            user_id: session.user_id,
            id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// `PATCH /api/schedule/revision` request payload.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// ID of the revision slot to toggle.
    pub id: String,
}

/// `PATCH /api/schedule/revision` response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    /// The toggled revision slot.
    pub revision_slot: RevisionSlot,
}

/// Toggles the completion mark of a revision slot.
pub async fn toggle_revision(
    ctx: Context,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, Error> {
    let session = ctx.current_session().await?;

    let id = req
        .id
        .parse::<revision::Id>()
        .map_err(|_| ApiError::InvalidInput)?;

    let slot = ctx
        .service()
        .execute(ToggleRevisionSlot {
            user_id: session.user_id,
            id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(ToggleResponse {
        revision_slot: slot.into(),
    }))
}

impl AsError for create_schedule_block::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(_) => None,
        }
    }
}

impl AsError for delete_schedule_block::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotFound(_) => Some(ScheduleError::BlockNotFound.into()),
            Self::Db(_) => None,
        }
    }
}

impl AsError for generate_revision_slots::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NoSkills => Some(ScheduleError::NoSkills.into()),
            Self::Ai(_) | Self::Db(_) => None,
        }
    }
}

impl AsError for toggle_revision_slot::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotFound(_) => Some(ScheduleError::SlotNotFound.into()),
            Self::Db(_) => None,
        }
    }
}

define_error! {
    enum ScheduleError {
        #[code = "UNKNOWN_ACTION"]
        #[status = BAD_REQUEST]
        #[message = "Unknown action"]
        UnknownAction,

        #[code = "BLOCK_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Schedule block not found"]
        BlockNotFound,

        #[code = "SLOT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Revision slot not found"]
        SlotNotFound,

        #[code = "NO_SKILLS"]
        #[status = BAD_REQUEST]
        #[message = "Complete the onboarding diagnostics first"]
        NoSkills,
    }
}
