//! Onboarding endpoints.

use axum::{extract::Query as UrlQuery, Json};
use serde::{Deserialize, Serialize};
use service::{
    command::{
        complete_onboarding, generate_diagnostic_questions, Command as _,
        CompleteOnboarding, GenerateDiagnosticQuestions,
    },
    domain::{skill, user},
    infra::completion,
};

use crate::{
    api::{ApiError, User},
    AsError, Context, Error,
};

/// `GET /api/onboarding` query parameters.
#[derive(Debug, Deserialize)]
pub struct QuizParams {
    /// Subject to generate the diagnostic quiz for.
    pub subject: String,
}

/// `GET /api/onboarding` response payload.
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    /// Generated quiz questions.
    pub questions: Vec<completion::Question>,
}

/// Generates the diagnostic quiz of a subject.
///
/// Nothing is persisted: the outcomes only land once submitted via
/// [`complete`].
pub async fn quiz(
    ctx: Context,
    UrlQuery(params): UrlQuery<QuizParams>,
) -> Result<Json<QuizResponse>, Error> {
    drop(ctx.current_session().await?);

    let subject =
        skill::Name::new(params.subject).ok_or(ApiError::InvalidInput)?;

    let questions = ctx
        .service()
        .execute(GenerateDiagnosticQuestions { subject })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(QuizResponse { questions }))
}

/// `POST /api/onboarding` request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    /// Study level chosen by the user.
    pub level: Option<String>,

    /// Study objectives chosen by the user.
    #[serde(default)]
    pub objectives: Vec<String>,

    /// Outcomes of the diagnostic quizzes taken during onboarding.
    #[serde(default)]
    pub diagnostic_results: Vec<DiagnosticResult>,
}

/// Single diagnostic quiz outcome of a [`CompleteRequest`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    /// Name of the assessed subject.
    pub subject: String,

    /// Number of correctly answered questions.
    pub score: u32,

    /// Total number of questions in the quiz.
    pub total: u32,

    /// Areas the user struggled with.
    #[serde(default)]
    pub weak_areas: Vec<String>,
}

/// `POST /api/onboarding` response payload.
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    /// The updated user.
    pub user: User,
}

/// Completes the onboarding of the current user.
pub async fn complete(
    ctx: Context,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, Error> {
    let session = ctx.current_session().await?;

    let level = req
        .level
        .map(|l| user::Level::new(l).ok_or(ApiError::InvalidInput))
        .transpose()?;
    // Objectives and weak areas are best-effort freeform strings: the
    // ones not surviving sanitization are dropped.
    let objectives = req
        .objectives
        .into_iter()
        .filter_map(user::Objective::new)
        .collect();
    let diagnostics = req
        .diagnostic_results
        .into_iter()
        .map(|d| {
            Ok(complete_onboarding::Diagnostic {
                subject: skill::Name::new(d.subject)
                    .ok_or(ApiError::InvalidInput)?,
                score: d.score,
                total: d.total,
                weak_areas: d
                    .weak_areas
                    .into_iter()
                    .filter_map(skill::Area::new)
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let user = ctx
        .service()
        .execute(CompleteOnboarding {
            user_id: session.user_id,
            level,
            objectives,
            diagnostics,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(CompleteResponse { user: user.into() }))
}

impl AsError for generate_diagnostic_questions::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Ai(_) => None,
        }
    }
}

impl AsError for complete_onboarding::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            // The session outlived its account. Demand a fresh one.
            Self::UserNotExists(_) => {
                Some(crate::context::AuthError::AuthorizationRequired.into())
            }
            Self::Db(_) => None,
        }
    }
}
