//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sanitize;

pub use self::session::Session;

/// Platform user.
#[derive(Clone, Debug, From)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Email`] of this [`User`], unique across the platform.
    pub email: Email,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// Study [`Level`] of this [`User`], filled in during onboarding.
    pub level: Option<Level>,

    /// Study [`Objective`]s of this [`User`], filled in during onboarding.
    pub objectives: Vec<Objective>,

    /// Indicator whether this [`User`] has completed onboarding.
    pub onboarding_complete: bool,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    ///
    /// The `name` is sanitized before validation.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = sanitize::text(name.as_ref());
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.is_empty() && name.chars().count() <= 100
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a [`User`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, Into, PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
#[serde(try_from = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// The `address` is trimmed and lowercased, so two spellings of the same
    /// mailbox compare equal.
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address = address.as_ref().trim().to_lowercase();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl TryFrom<String> for Email {
    type Error = &'static str;

    fn try_from(address: String) -> Result<Self, Self::Error> {
        address.parse()
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let len = password.as_ref().chars().count();
        (6..=128).contains(&len)
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [Argon2] hash of a [`User`]'s [`Password`].
///
/// [Argon2]: https://datatracker.ietf.org/doc/html/rfc9106
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Creates a new [`PasswordHash`] of the given [`Password`].
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    pub fn new(
        password: &Password,
    ) -> Result<Self, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.0.as_bytes(), &salt)
            .map(|h| Self(h.to_string()))
    }

    /// Checks whether the given [`Password`] matches this [`PasswordHash`].
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        argon2::PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

/// Study level of a [`User`] (e.g. "Terminale", "Licence 2").
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Level(String);

impl Level {
    /// Creates a new [`Level`] if the given `level` is valid.
    ///
    /// The `level` is sanitized before validation.
    #[must_use]
    pub fn new(level: impl AsRef<str>) -> Option<Self> {
        let level = sanitize::text(level.as_ref());
        (!level.is_empty() && level.chars().count() <= 100)
            .then_some(Self(level))
    }
}

impl FromStr for Level {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Level`")
    }
}

/// Study objective of a [`User`] (e.g. "réussir le bac").
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
pub struct Objective(String);

impl Objective {
    /// Creates a new [`Objective`] if the given `objective` is valid.
    ///
    /// The `objective` is sanitized before validation.
    #[must_use]
    pub fn new(objective: impl AsRef<str>) -> Option<Self> {
        let objective = sanitize::text(objective.as_ref());
        (!objective.is_empty() && objective.chars().count() <= 200)
            .then_some(Self(objective))
    }
}

impl FromStr for Objective {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Objective`")
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod email_spec {
    use super::Email;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.to_string(), "alice@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(Email::new("not-an-email").is_none());
        assert!(Email::new("a b@example.com").is_none());
        assert!(Email::new("a@b").is_none());
        assert!(Email::new(format!("{}@x.io", "a".repeat(260))).is_none());
    }

    #[test]
    fn accepts_addresses_up_to_254_bytes() {
        let local = "a".repeat(254 - "@example.com".len());
        assert!(Email::new(format!("{local}@example.com")).is_some());
        assert!(Email::new(format!("{local}a@example.com")).is_none());
    }
}

#[cfg(test)]
mod password_spec {
    use super::Password;

    #[test]
    fn enforces_the_length_bounds() {
        assert!(Password::new("12345").is_none());
        assert!(Password::new("123456").is_some());
        assert!(Password::new("1".repeat(128)).is_some());
        assert!(Password::new("1".repeat(129)).is_none());
    }
}

#[cfg(test)]
mod password_hash_spec {
    use super::{Password, PasswordHash};

    #[test]
    fn verifies_the_original_password_only() {
        let password = Password::new("hunter22").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("hunter23").unwrap()));
    }

    #[test]
    fn verification_of_a_corrupted_hash_fails_closed() {
        let hash = PasswordHash("not-a-phc-string".into());
        assert!(!hash.verify(&Password::new("hunter22").unwrap()));
    }
}
