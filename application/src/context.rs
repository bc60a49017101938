//! [`Context`]-related definitions.

use std::net::IpAddr;

use axum::{async_trait, extract::FromRequestParts};
use axum_client_ip::InsecureClientIp;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::DateTime;
use service::{
    command::{self, Command as _},
    domain::user::{self, session},
};
use tokio::sync::OnceCell;

use crate::{config, define_error, AsError, Error, Service};

/// Name of the cookie carrying the [`session::Token`].
pub const SESSION_COOKIE: &str = "athena-token";

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Application [`Settings`].
    settings: Settings,

    /// IP address the request claims to originate from.
    client_ip: Option<IpAddr>,

    /// Cookies of the HTTP request.
    cookies: CookieJar,

    /// Current [`Session`] authentication outcome.
    current_session: OnceCell<Result<Session, Error>>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`Settings`] of this [`Context`].
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the rate limiting key of the requesting client.
    ///
    /// Clients not reporting any IP address all share one bucket, which
    /// throttles them collectively rather than not at all.
    #[must_use]
    pub fn client_key(&self) -> String {
        self.client_ip
            .as_ref()
            .map_or_else(|| "unknown".to_owned(), ToString::to_string)
    }

    /// Returns the current [`Session`] of this [`Context`].
    ///
    /// The outcome is memoized: multiple calls during one request decode
    /// the token once.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request carries no session cookie;
    /// - the provided authentication token is invalid or expired.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.current_session
            .get_or_init(|| self.do_authentication())
            .await
            .clone()
    }

    /// Builds the [`SESSION_COOKIE`] carrying the provided
    /// [`session::Token`].
    #[must_use]
    pub fn session_cookie(&self, token: &session::Token) -> Cookie<'static> {
        let mut cookie =
            Cookie::new(SESSION_COOKIE, token.as_ref().to_owned());
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_secure(self.settings.cookie.secure);
        cookie.set_max_age(
            time::Duration::try_from(self.service.config().session_ttl).ok(),
        );
        cookie
    }

    /// Builds the [`SESSION_COOKIE`] removing the [`session::Token`] from
    /// the client.
    #[must_use]
    pub fn removal_session_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, "");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_secure(self.settings.cookie.secure);
        cookie.set_max_age(Some(time::Duration::ZERO));
        cookie
    }

    /// Performs the [`Session`] authentication.
    ///
    /// # Errors
    ///
    /// Errors if the session cookie is absent or its token is invalid.
    async fn do_authentication(&self) -> Result<Session, Error> {
        let Some(cookie) = self.cookies.get(SESSION_COOKIE) else {
            return Err(AuthError::AuthorizationRequired.into());
        };

        #[expect(unsafe_code, reason = "opaque token is verified by decoding")]
        let token = unsafe {
            session::Token::new_unchecked(cookie.value().to_owned())
        };

        self.service
            .execute(command::AuthorizeUserSession { token })
            .await
            .map(|s| Session {
                user_id: s.user_id,
                email: s.email,
                expires_at: s.expires_at.coerce(),
            })
            .map_err(AsError::into_error)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;
        let settings = parts
            .extensions
            .get::<Settings>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Settings` extension"))?;

        Ok(Self {
            service,
            settings,
            client_ip: InsecureClientIp::from(&parts.headers, &parts.extensions)
                .map(|ip| ip.0)
                .ok(),
            cookies: CookieJar::from_headers(&parts.headers),
            current_session: OnceCell::new(),
        })
    }
}

/// Application settings shared by all request handlers.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Session cookie configuration.
    pub cookie: config::SessionCookie,

    /// Rate limiting quotas.
    pub rate_limits: config::RateLimits,
}

/// User session.
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] associated with this [`Session`].
    ///
    /// [`User`]: service::domain::User
    pub user_id: user::Id,

    /// [`Email`] of the [`User`] associated with this [`Session`].
    ///
    /// [`Email`]: user::Email
    /// [`User`]: service::domain::User
    pub email: user::Email,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}
