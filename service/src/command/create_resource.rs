//! [`Command`] for adding a [`Resource`] to a library.

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{resource, user, Resource},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`Resource`] to a [`User`]'s library.
///
/// All fields are already validated and sanitized by their domain types.
#[derive(Clone, Debug)]
pub struct CreateResource {
    /// ID of the [`User`] owning the new [`Resource`].
    pub user_id: user::Id,

    /// [`Title`] of the new [`Resource`].
    ///
    /// [`Title`]: resource::Title
    pub title: resource::Title,

    /// [`Kind`] of the new [`Resource`].
    ///
    /// [`Kind`]: resource::Kind
    pub kind: resource::Kind,

    /// [`Subject`] of the new [`Resource`].
    ///
    /// [`Subject`]: resource::Subject
    pub subject: resource::Subject,

    /// [`Content`] of the new [`Resource`].
    ///
    /// [`Content`]: resource::Content
    pub content: resource::Content,

    /// [`Tag`]s of the new [`Resource`].
    ///
    /// [`Tag`]: resource::Tag
    pub tags: Vec<resource::Tag>,
}

impl<Db, Ai> Command<CreateResource> for Service<Db, Ai>
where
    Db: Database<Insert<Resource>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Resource;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateResource,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateResource {
            user_id,
            title,
            kind,
            subject,
            content,
            tags,
        } = cmd;

        let resource = Resource {
            id: resource::Id::new(),
            user_id,
            title,
            kind,
            subject,
            content,
            tags,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(resource.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(resource)
    }
}

/// Error of [`CreateResource`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
