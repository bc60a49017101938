//! Dashboard endpoint.

use axum::Json;
use serde::Serialize;
use service::{domain::resource, query, Query as _};

use crate::{
    api::{auth::AuthError, Resource, Skill, User},
    AsError, Context, Error,
};

/// Number of newest resources surfaced on the dashboard.
const RECENT_RESOURCES: usize = 5;

/// `GET /api/dashboard` response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// The authenticated user.
    pub user: User,

    /// Skills of the user, ordered by name.
    pub skills: Vec<Skill>,

    /// Newest resources of the user.
    pub recent_resources: Vec<Resource>,

    /// Aggregated progress counters.
    pub stats: Stats,
}

/// Aggregated progress counters of a dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Total number of resources in the library.
    pub total_resources: usize,

    /// Number of revision slots marked as done.
    pub completed_revisions: usize,

    /// Total number of revision slots in the plan.
    pub total_revisions: usize,

    /// Share of completed revision slots, in percent.
    pub completion_rate: u32,
}

/// Returns the dashboard of the current user.
pub async fn dashboard(ctx: Context) -> Result<Json<DashboardResponse>, Error> {
    let session = ctx.current_session().await?;

    let user = ctx
        .service()
        .execute(query::user::ById::by(session.user_id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(AuthError::UserNotFound)?;
    let skills = ctx
        .service()
        .execute(query::skills::ByUser::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;
    let resources = ctx
        .service()
        .execute(query::resources::List::by(resource::list::Filter {
            user_id: session.user_id,
            subject: None,
            limit: None,
        }))
        .await
        .map_err(AsError::into_error)?;
    let slots = ctx
        .service()
        .execute(query::schedule::RevisionSlots::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;

    let total_resources = resources.len();
    let total_revisions = slots.len();
    let completed_revisions = slots.iter().filter(|s| s.completed).count();
    let completion_rate = if total_revisions == 0 {
        0
    } else {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            reason = "percentage always fits `u32`"
        )]
        let rate = (completed_revisions as f64 / total_revisions as f64
            * 100.0)
            .round() as u32;
        rate
    };

    Ok(Json(DashboardResponse {
        user: user.into(),
        skills: skills.into_iter().map(Into::into).collect(),
        recent_resources: resources
            .into_iter()
            .take(RECENT_RESOURCES)
            .map(Into::into)
            .collect(),
        stats: Stats {
            total_resources,
            completed_revisions,
            total_revisions,
            completion_rate,
        },
    }))
}
