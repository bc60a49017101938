//! [`Command`] for generating a diagnostic quiz.

use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::skill,
    infra::{completion, Completion},
    Service,
};

use super::Command;

/// [`Command`] for generating the diagnostic quiz of a subject.
///
/// Purely generative: nothing is persisted until the [`User`] submits the
/// outcomes via onboarding completion.
#[derive(Clone, Debug, From)]
pub struct GenerateDiagnosticQuestions {
    /// [`Name`] of the subject to assess.
    ///
    /// [`Name`]: skill::Name
    pub subject: skill::Name,
}

impl<Db, Ai> Command<GenerateDiagnosticQuestions> for Service<Db, Ai>
where
    Ai: Completion<
        completion::Diagnose,
        Ok = Vec<completion::Question>,
        Err = Traced<completion::Error>,
    >,
{
    type Ok = Vec<completion::Question>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateDiagnosticQuestions,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateDiagnosticQuestions { subject } = cmd;

        self.completion()
            .execute(completion::Diagnose(subject))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`GenerateDiagnosticQuestions`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Completion`] error.
    #[display("`Completion` operation failed: {_0}")]
    Ai(completion::Error),
}
