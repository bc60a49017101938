//! [`Command`] for clearing a chat history.

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{user, Message},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for clearing the whole chat history of a [`User`].
#[derive(Clone, Copy, Debug, From)]
pub struct ClearChatHistory {
    /// ID of the [`User`] whose history should be cleared.
    pub user_id: user::Id,
}

impl<Db, Ai> Command<ClearChatHistory> for Service<Db, Ai>
where
    Db: Database<
        Delete<By<Vec<Message>, user::Id>>,
        Ok = Vec<Message>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ClearChatHistory,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ClearChatHistory { user_id } = cmd;

        self.database()
            .execute(Delete(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`ClearChatHistory`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
