//! [`Command`] for adding a [`Block`] to a schedule.

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        schedule::{self, block, Block},
        user,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`Block`] to a [`User`]'s weekly schedule.
#[derive(Clone, Debug)]
pub struct CreateScheduleBlock {
    /// ID of the [`User`] owning the new [`Block`].
    pub user_id: user::Id,

    /// [`Title`] of the new [`Block`].
    ///
    /// [`Title`]: block::Title
    pub title: block::Title,

    /// [`DayOfWeek`] of the new [`Block`].
    ///
    /// [`DayOfWeek`]: schedule::DayOfWeek
    pub day_of_week: schedule::DayOfWeek,

    /// Start [`ClockTime`] of the new [`Block`].
    ///
    /// [`ClockTime`]: schedule::ClockTime
    pub start_time: schedule::ClockTime,

    /// End [`ClockTime`] of the new [`Block`].
    ///
    /// [`ClockTime`]: schedule::ClockTime
    pub end_time: schedule::ClockTime,

    /// [`Kind`] of the new [`Block`].
    ///
    /// [`Kind`]: block::Kind
    pub kind: block::Kind,

    /// Display [`Color`] of the new [`Block`].
    ///
    /// [`Color`]: schedule::Color
    pub color: Option<schedule::Color>,
}

impl<Db, Ai> Command<CreateScheduleBlock> for Service<Db, Ai>
where
    Db: Database<Insert<Block>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Block;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateScheduleBlock,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateScheduleBlock {
            user_id,
            title,
            day_of_week,
            start_time,
            end_time,
            kind,
            color,
        } = cmd;

        let block = Block {
            id: block::Id::new(),
            user_id,
            title,
            day_of_week,
            start_time,
            end_time,
            kind,
            color,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(block.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(block)
    }
}

/// Error of [`CreateScheduleBlock`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
