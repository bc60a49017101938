//! [`Command`] for creating a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{session::Token, Email, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`].
#[derive(Debug, From)]
pub enum CreateUserSession {
    /// Create a new [`Session`] by [`User`] credentials.
    ByCredentials {
        /// [`Email`] of a [`User`].
        email: user::Email,

        /// [`Password`] of a [`User`].
        password: SecretBox<user::Password>,
    },

    /// Create a new [`Session`] by [`User`] ID.
    ByUserId(user::Id),
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db, Ai> Command<CreateUserSession> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateUserSession as Cmd;
        use ExecutionError as E;

        let user = match cmd {
            Cmd::ByCredentials { email, password } => {
                // An unknown email and a wrong password are
                // indistinguishable to the caller.
                let user = self
                    .database()
                    .execute(Select(By::new(&email)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::WrongCredentials)
                    .map_err(tracerr::wrap!())?;

                if !user.password_hash.verify(password.expose_secret()) {
                    return Err(tracerr::new!(E::WrongCredentials));
                }

                user
            }
            Cmd::ByUserId(user_id) => self
                .database()
                .execute(Select(By::new(user_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UserNotExists(user_id))
                .map_err(tracerr::wrap!())?,
        };

        let issued_at = DateTime::now();
        let expires_at = (issued_at + self.config.session_ttl).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                email: user.email.clone(),
                issued_at: issued_at.coerce(),
                expires_at,
            },
            &self.config.jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`CreateUserSession::ByCredentials`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use secrecy::SecretBox;

    use crate::{
        command::{self, AuthorizeUserSession, CreateUser},
        domain::user,
        infra::database::InMemory,
        Command as _, Config, Service,
    };

    fn service(session_ttl: Duration) -> Service<InMemory, ()> {
        Service::new(
            Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    b"test-secret",
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"test-secret",
                ),
                session_ttl,
            },
            InMemory::default(),
            (),
        )
    }

    async fn register(service: &Service<InMemory, ()>) -> user::Id {
        service
            .execute(CreateUser {
                name: user::Name::new("Alice").unwrap(),
                email: user::Email::new("alice@example.com").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("hunter22").unwrap(),
                )),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn issued_token_authorizes_and_carries_the_claims() {
        let service = service(Duration::from_secs(7 * 24 * 60 * 60));
        let user_id = register(&service).await;

        let output = service
            .execute(super::CreateUserSession::ByUserId(user_id))
            .await
            .unwrap();

        let session = service
            .execute(AuthorizeUserSession {
                token: output.token,
            })
            .await
            .unwrap();

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.email.to_string(), "alice@example.com");
        assert!(session.expires_at > DateTime::now().coerce());
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let service = service(Duration::from_secs(60));
        let user_id = register(&service).await;

        let output = service
            .execute(super::CreateUserSession::ByUserId(user_id))
            .await
            .unwrap();

        let mut forged = output.token.to_string();
        forged.pop();
        forged.push('x');
        // SAFETY: opaque token contents are irrelevant to the test.
        #[expect(unsafe_code, reason = "test input")]
        let forged =
            unsafe { user::session::Token::new_unchecked(forged) };

        assert!(service
            .execute(AuthorizeUserSession { token: forged })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let service = service(Duration::ZERO);
        let user_id = register(&service).await;

        let output = service
            .execute(super::CreateUserSession::ByUserId(user_id))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(service
            .execute(AuthorizeUserSession {
                token: output.token,
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let service = service(Duration::from_secs(60));
        drop(register(&service).await);

        let wrong_password = service
            .execute(super::CreateUserSession::ByCredentials {
                email: user::Email::new("alice@example.com").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("wrong-pass").unwrap(),
                )),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .execute(super::CreateUserSession::ByCredentials {
                email: user::Email::new("nobody@example.com").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("hunter22").unwrap(),
                )),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            wrong_password.as_ref(),
            command::create_user_session::ExecutionError::WrongCredentials,
        ));
        assert!(matches!(
            unknown_email.as_ref(),
            command::create_user_session::ExecutionError::WrongCredentials,
        ));
    }
}
