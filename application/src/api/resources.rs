//! Resource library endpoints.

use axum::{extract::Query as UrlQuery, Json};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        create_resource, delete_resource, Command as _, CreateResource,
        DeleteResource,
    },
    domain::resource,
    query,
};

use crate::{
    api::{ApiError, Resource},
    define_error, AsError, Context, Error,
};

/// `GET /api/resources` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Subject to narrow the library down to.
    pub subject: Option<String>,
}

/// `GET /api/resources` response payload.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Resources of the user, newest first.
    pub resources: Vec<Resource>,
}

/// Lists the resources of the current user, newest first.
pub async fn list(
    ctx: Context,
    UrlQuery(params): UrlQuery<ListParams>,
) -> Result<Json<ListResponse>, Error> {
    let session = ctx.current_session().await?;

    let subject = params
        .subject
        .map(|s| resource::Subject::new(s).ok_or(ApiError::InvalidInput))
        .transpose()?;

    let resources = ctx
        .service()
        .execute(query::resources::List::by(resource::list::Filter {
            user_id: session.user_id,
            subject,
            limit: None,
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(ListResponse {
        resources: resources.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/resources` request payload.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// Title of the new resource.
    pub title: String,

    /// Kind of the new resource.
    ///
    /// Parsed manually, so an unknown kind yields a Bad Request rather
    /// than a deserialization failure.
    #[serde(rename = "type")]
    pub kind: String,

    /// Subject of the new resource.
    pub subject: String,

    /// Link or note body of the new resource.
    pub content: String,

    /// Tags of the new resource.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `POST /api/resources` response payload.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    /// The created resource.
    pub resource: Resource,
}

/// Adds a resource to the current user's library.
pub async fn create(
    ctx: Context,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<CreateResponse>), Error> {
    let session = ctx.current_session().await?;

    let title =
        resource::Title::new(req.title).ok_or(ApiError::InvalidInput)?;
    let kind = req
        .kind
        .parse::<resource::Kind>()
        .map_err(|_| ApiError::InvalidInput)?;
    let subject =
        resource::Subject::new(req.subject).ok_or(ApiError::InvalidInput)?;
    let content = resource::Content::new(kind, req.content)
        .ok_or(ResourceError::InvalidContent)?;
    // Tags surviving sanitization are kept, the rest are dropped.
    let tags = req
        .tags
        .into_iter()
        .filter_map(resource::Tag::new)
        .collect();

    let resource = ctx
        .service()
        .execute(CreateResource {
            user_id: session.user_id,
            title,
            kind,
            subject,
            content,
            tags,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            resource: resource.into(),
        }),
    ))
}

/// `DELETE /api/resources` request payload.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// ID of the resource to delete.
    pub id: String,
}

/// Deletes a resource from the current user's library.
pub async fn delete(
    ctx: Context,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<serde_json::Value>, Error> {
    let session = ctx.current_session().await?;

    let id = req
        .id
        .parse::<resource::Id>()
        .map_err(|_| ApiError::InvalidInput)?;

    ctx.service()
        .execute(DeleteResource {
            user_id: session.user_id,
            id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

impl AsError for create_resource::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(_) => None,
        }
    }
}

impl AsError for delete_resource::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotFound(_) => Some(ResourceError::NotFound.into()),
            Self::Db(_) => None,
        }
    }
}

define_error! {
    enum ResourceError {
        #[code = "INVALID_CONTENT"]
        #[status = BAD_REQUEST]
        #[message = "Resource content is empty or not allowed"]
        InvalidContent,

        #[code = "RESOURCE_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Resource not found"]
        NotFound,
    }
}
