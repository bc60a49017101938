//! Service contains the business logic of the application.

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

pub mod command;
pub mod domain;
pub mod infra;
pub mod limiter;
pub mod query;
pub mod sanitize;

use std::time::Duration;

use derive_more::Debug;

pub use self::{command::Command, limiter::RateLimiter, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Time-to-live of an issued [`Session`].
    ///
    /// There is no revocation path for an issued token, so this horizon
    /// bounds how long a leaked token stays usable.
    ///
    /// [`Session`]: domain::user::Session
    pub session_ttl: Duration,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ai> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    ///
    /// [`Database`]: infra::Database
    database: Db,

    /// [`Completion`] collaborator of this [`Service`].
    ///
    /// [`Completion`]: infra::Completion
    completion: Ai,

    /// Process-wide [`RateLimiter`] of this [`Service`].
    limiter: RateLimiter,
}

impl<Db, Ai> Service<Db, Ai> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db, completion: Ai) -> Self {
        Self {
            config,
            database,
            completion,
            limiter: RateLimiter::default(),
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    ///
    /// [`Database`]: infra::Database
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the [`Completion`] collaborator of this [`Service`].
    ///
    /// [`Completion`]: infra::Completion
    #[must_use]
    pub fn completion(&self) -> &Ai {
        &self.completion
    }

    /// Returns the [`RateLimiter`] of this [`Service`].
    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
