//! [`Command`] for regenerating a week's revision plan.

use common::{
    operations::{By, Delete, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        schedule::{self, revision, Block},
        skill, user, Skill,
    },
    infra::{completion, database, Completion, Database},
    Service,
};

use super::Command;

/// [`Command`] for regenerating the AI revision plan of a [`User`]'s week.
///
/// The previous plan is discarded as a whole: slots are cheap to recreate
/// and merging two generated plans has no meaningful semantics.
#[derive(Clone, Copy, Debug, From)]
pub struct GenerateRevisionSlots {
    /// ID of the [`User`] to generate the plan for.
    pub user_id: user::Id,
}

impl<Db, Ai> Command<GenerateRevisionSlots> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Vec<Block>, user::Id>>,
            Ok = Vec<Block>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Skill>, user::Id>>,
            Ok = Vec<Skill>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Vec<revision::Slot>, user::Id>>,
            Ok = Vec<revision::Slot>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<Vec<revision::Slot>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
    Ai: Completion<
        completion::ReviseSchedule,
        Ok = Vec<completion::SlotDraft>,
        Err = Traced<completion::Error>,
    >,
{
    type Ok = Vec<revision::Slot>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateRevisionSlots,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateRevisionSlots { user_id } = cmd;

        let skills: Vec<Skill> = self
            .database()
            .execute(Select(By::<Vec<Skill>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if skills.is_empty() {
            return Err(tracerr::new!(E::NoSkills));
        }

        let blocks = self
            .database()
            .execute(Select(By::<Vec<Block>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let drafts = self
            .completion()
            .execute(completion::ReviseSchedule {
                blocks,
                subjects: skills.into_iter().map(|s| s.name).collect(),
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Drafts are model output, so each one is re-validated and the
        // unusable ones are dropped silently.
        let slots: Vec<_> = drafts
            .into_iter()
            .filter_map(|draft| {
                Some(revision::Slot {
                    id: revision::Id::new(),
                    user_id,
                    subject: skill::Name::new(&draft.subject)?,
                    method: draft.method.parse().ok()?,
                    day_of_week: schedule::DayOfWeek::new(draft.day_of_week)?,
                    start_time: schedule::ClockTime::new(&draft.start_time)?,
                    end_time: schedule::ClockTime::new(&draft.end_time)?,
                    completed: false,
                    created_at: DateTime::now().coerce(),
                })
            })
            .collect();

        drop(
            self.database()
                .execute(Delete(By::new(user_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?,
        );
        self.database()
            .execute(Insert(slots.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(slots)
    }
}

/// Error of [`GenerateRevisionSlots`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Completion`] error.
    #[display("`Completion` operation failed: {_0}")]
    Ai(completion::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] has no [`Skill`]s to plan revisions for.
    #[display("no `Skill`s to plan revisions for")]
    NoSkills,
}
