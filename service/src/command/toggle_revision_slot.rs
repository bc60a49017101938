//! [`Command`] for toggling a revision [`Slot`] completion.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{schedule::revision::{self, Slot}, user},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for toggling the completion mark of a revision [`Slot`].
#[derive(Clone, Copy, Debug)]
pub struct ToggleRevisionSlot {
    /// ID of the [`User`] owning the [`Slot`].
    pub user_id: user::Id,

    /// ID of the [`Slot`] to toggle.
    pub id: revision::Id,
}

impl<Db, Ai> Command<ToggleRevisionSlot> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Option<Slot>, (user::Id, revision::Id)>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        > + Database<Update<Slot>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Slot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ToggleRevisionSlot,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ToggleRevisionSlot { user_id, id } = cmd;

        let mut slot = self
            .database()
            .execute(Select(By::new((user_id, id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotFound(id))
            .map_err(tracerr::wrap!())?;

        slot.completed = !slot.completed;

        self.database()
            .execute(Update(slot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(slot)
    }
}

/// Error of [`ToggleRevisionSlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Slot`] does not exist in the [`User`]'s plan.
    #[display("`Slot(id: {_0})` does not exist")]
    #[from(ignore)]
    NotFound(#[error(not(source))] revision::Id),
}
