//! [`Command`] for removing a [`Resource`] from a library.

use common::operations::{By, Delete};
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

/// [`Command`] for removing a [`Resource`] from a [`User`]'s library.
#[derive(Clone, Copy, Debug)]
pub struct DeleteResource {
    /// ID of the [`User`] owning the [`Resource`].
    pub user_id: user::Id,

    /// ID of the [`Resource`] to remove.
    pub id: resource::Id,
}

impl<Db, Ai> Command<DeleteResource> for Service<Db, Ai>
where
    Db: Database<
        Delete<By<Option<Resource>, (user::Id, resource::Id)>>,
        Ok = Option<Resource>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteResource,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteResource { user_id, id } = cmd;

        // Scoping the removal by owner makes someone else's `Resource`
        // indistinguishable from a missing one.
        self.database()
            .execute(Delete(By::new((user_id, id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotFound(id))
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Error of [`DeleteResource`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Resource`] does not exist in the [`User`]'s library.
    #[display("`Resource(id: {_0})` does not exist")]
    #[from(ignore)]
    NotFound(#[error(not(source))] resource::Id),
}
