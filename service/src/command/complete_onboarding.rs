//! [`Command`] for completing a [`User`]'s onboarding.

use common::{
    operations::{By, Insert, Select, Update, Upsert},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{skill, user, Skill, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for completing a [`User`]'s onboarding.
///
/// Records the study profile, persists the diagnostic outcomes and derives
/// an initial [`Skill`] score per assessed subject.
#[derive(Clone, Debug)]
pub struct CompleteOnboarding {
    /// ID of the onboarded [`User`].
    pub user_id: user::Id,

    /// Study [`Level`] chosen by the [`User`].
    ///
    /// [`Level`]: user::Level
    pub level: Option<user::Level>,

    /// Study [`Objective`]s chosen by the [`User`].
    ///
    /// [`Objective`]: user::Objective
    pub objectives: Vec<user::Objective>,

    /// Outcomes of the diagnostic quizzes taken during onboarding.
    pub diagnostics: Vec<Diagnostic>,
}

/// Single diagnostic quiz outcome of a [`CompleteOnboarding`] [`Command`].
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// [`Name`] of the assessed subject.
    ///
    /// [`Name`]: skill::Name
    pub subject: skill::Name,

    /// Number of correctly answered questions.
    pub score: u32,

    /// Total number of questions in the quiz.
    pub total: u32,

    /// [`Area`]s the [`User`] struggled with.
    ///
    /// [`Area`]: skill::Area
    pub weak_areas: Vec<skill::Area>,
}

impl<Db, Ai> Command<CompleteOnboarding> for Service<Db, Ai>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<User>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Insert<skill::DiagnosticResult>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Upsert<Skill>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompleteOnboarding,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompleteOnboarding {
            user_id,
            level,
            objectives,
            diagnostics,
        } = cmd;

        let mut user = self
            .database()
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;

        user.level = level;
        user.objectives = objectives;
        user.onboarding_complete = true;

        self.database()
            .execute(Update(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for diagnostic in diagnostics {
            let Diagnostic {
                subject,
                score,
                total,
                weak_areas,
            } = diagnostic;

            self.database()
                .execute(Insert(skill::DiagnosticResult {
                    id: skill::Id::new(),
                    user_id,
                    subject: subject.clone(),
                    score,
                    total,
                    weak_areas,
                    created_at: DateTime::now().coerce(),
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            self.database()
                .execute(Upsert(Skill {
                    user_id,
                    name: subject,
                    score: skill::Score::from_ratio(score, total),
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        Ok(user)
    }
}

/// Error of [`CompleteOnboarding`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}
