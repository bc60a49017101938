//! Authentication endpoints.

use axum::Json;
use axum_extra::extract::CookieJar;
use http::StatusCode;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        create_user, create_user_session, Command as _, CreateUser,
        CreateUserSession,
    },
    domain::user,
    query,
};

use crate::{
    api::{ApiError, User},
    define_error, AsError, Context, Error,
};

/// `POST /api/auth/register` request payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name of the new user.
    pub name: String,

    /// Email address of the new user.
    pub email: String,

    /// Password of the new user.
    pub password: String,
}

/// Response payload of session-issuing endpoints.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The authenticated user.
    pub user: User,

    /// Issued session token.
    ///
    /// Also set as a cookie, but returned in the body for non-browser
    /// clients.
    pub token: String,
}

/// Registers a new user and signs them in.
pub async fn register(
    ctx: Context,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), Error> {
    let quota = ctx.settings().rate_limits.register;
    if !ctx.service().limiter().admit(
        format!("register:{}", ctx.client_key()),
        quota.max_requests,
        quota.window,
    ) {
        return Err(ApiError::TooManyAttempts.into());
    }

    let name = user::Name::new(req.name).ok_or(ApiError::InvalidInput)?;
    let email =
        user::Email::new(req.email).ok_or(AuthError::InvalidEmail)?;
    let password =
        user::Password::new(req.password).ok_or(AuthError::WeakPassword)?;

    let user = ctx
        .service()
        .execute(CreateUser {
            name,
            email,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    let session = ctx
        .service()
        .execute(CreateUserSession::ByUserId(user.id))
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        CookieJar::new().add(ctx.session_cookie(&session.token)),
        Json(SessionResponse {
            user: session.user.into(),
            token: session.token.into(),
        }),
    ))
}

/// `POST /api/auth/login` request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address of the user.
    pub email: String,

    /// Password of the user.
    pub password: String,
}

/// Signs an existing user in by credentials.
pub async fn login(
    ctx: Context,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), Error> {
    let quota = ctx.settings().rate_limits.login;
    if !ctx.service().limiter().admit(
        format!("login:{}", ctx.client_key()),
        quota.max_requests,
        quota.window,
    ) {
        return Err(ApiError::TooManyAttempts.into());
    }

    // Malformed credentials cannot belong to any account, so they yield
    // the same answer as wrong ones.
    let email =
        user::Email::new(req.email).ok_or(AuthError::WrongCredentials)?;
    let password = user::Password::new(req.password)
        .ok_or(AuthError::WrongCredentials)?;

    let session = ctx
        .service()
        .execute(CreateUserSession::ByCredentials {
            email,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        CookieJar::new().add(ctx.session_cookie(&session.token)),
        Json(SessionResponse {
            user: session.user.into(),
            token: session.token.into(),
        }),
    ))
}

/// Signs the current user out by removing the session cookie.
///
/// Always succeeds: an absent or invalid session has nothing to remove.
pub async fn logout(
    ctx: Context,
) -> (CookieJar, Json<serde_json::Value>) {
    (
        CookieJar::new().add(ctx.removal_session_cookie()),
        Json(serde_json::json!({ "success": true })),
    )
}

/// `GET /api/auth/me` response payload.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The authenticated user.
    pub user: User,
}

/// Returns the profile of the currently authenticated user.
pub async fn me(ctx: Context) -> Result<Json<MeResponse>, Error> {
    let session = ctx.current_session().await?;

    let user = ctx
        .service()
        .execute(query::user::ById::by(session.user_id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(MeResponse { user: user.into() }))
}

impl AsError for create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::EmailOccupied(_) => Some(AuthError::EmailOccupied.into()),
            Self::Db(_) | Self::PasswordHash(_) => None,
        }
    }
}

impl AsError for create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::WrongCredentials => {
                Some(AuthError::WrongCredentials.into())
            }
            Self::Db(_)
            | Self::JsonWebTokenEncodeError(_)
            | Self::UserNotExists(_) => None,
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid email address"]
        InvalidEmail,

        #[code = "WEAK_PASSWORD"]
        #[status = BAD_REQUEST]
        #[message = "Password must be between 6 and 128 characters"]
        WeakPassword,

        #[code = "EMAIL_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "An account with this email already exists"]
        EmailOccupied,

        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong email or password"]
        WrongCredentials,

        #[code = "USER_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "User not found"]
        UserNotFound,
    }
}
