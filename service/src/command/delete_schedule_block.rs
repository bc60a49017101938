//! [`Command`] for removing a [`Block`] from a schedule.

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        schedule::{block, Block},
        user,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Block`] from a [`User`]'s weekly schedule.
#[derive(Clone, Copy, Debug)]
pub struct DeleteScheduleBlock {
    /// ID of the [`User`] owning the [`Block`].
    pub user_id: user::Id,

    /// ID of the [`Block`] to remove.
    pub id: block::Id,
}

impl<Db, Ai> Command<DeleteScheduleBlock> for Service<Db, Ai>
where
    Db: Database<
        Delete<By<Option<Block>, (user::Id, block::Id)>>,
        Ok = Option<Block>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteScheduleBlock,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteScheduleBlock { user_id, id } = cmd;

        self.database()
            .execute(Delete(By::new((user_id, id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotFound(id))
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Error of [`DeleteScheduleBlock`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Block`] does not exist in the [`User`]'s schedule.
    #[display("`Block(id: {_0})` does not exist")]
    #[from(ignore)]
    NotFound(#[error(not(source))] block::Id),
}
