//! Application provides the REST API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;

use axum::{
    routing::{get, post},
    Extension, Router,
};
// Used in binary.
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session, Settings},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service =
    service::Service<service::infra::InMemory, service::infra::Groq>;

/// Assembles the application [`Router`].
///
/// Security middleware is part of the assembly: the origin gate runs
/// before any handler, and the header injection wraps everything,
/// rejections included. Transport-level layers ([CORS], tracing) are
/// attached by the binary.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[must_use]
pub fn router(service: Service, settings: Settings) -> Router {
    Router::new()
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route(
            "/api/resources",
            get(api::resources::list)
                .post(api::resources::create)
                .delete(api::resources::delete),
        )
        .route(
            "/api/schedule",
            get(api::schedule::week)
                .post(api::schedule::mutate)
                .delete(api::schedule::delete),
        )
        .route(
            "/api/schedule/revision",
            axum::routing::patch(api::schedule::toggle_revision),
        )
        .route(
            "/api/chat",
            get(api::chat::history)
                .post(api::chat::send)
                .delete(api::chat::clear),
        )
        .route("/api/dashboard", get(api::dashboard::dashboard))
        .route(
            "/api/onboarding",
            get(api::onboarding::quiz).post(api::onboarding::complete),
        )
        .layer(Extension(service))
        .layer(Extension(settings))
        .layer(axum::middleware::from_fn(middleware::origin_gate))
        .layer(axum::middleware::from_fn(middleware::security_headers))
}
