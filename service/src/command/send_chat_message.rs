//! [`Command`] for talking to the study assistant.

use std::fmt::Write as _;

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{
        chat::{self, history, Message},
        resource, user, Block, Resource,
    },
    infra::{completion, database, Completion, Database},
    Service,
};

use super::Command;

/// Number of latest [`Message`]s replayed to the model as conversation
/// history.
const HISTORY_DEPTH: usize = 9;

/// Number of newest [`Resource`]s mentioned in the student context.
const CONTEXT_RESOURCES: usize = 5;

/// [`Command`] for sending a [`Message`] to the study assistant.
#[derive(Clone, Debug)]
pub struct SendChatMessage {
    /// ID of the [`User`] talking to the assistant.
    pub user_id: user::Id,

    /// [`Content`] of the [`User`]'s [`Message`].
    ///
    /// [`Content`]: chat::Content
    pub message: chat::Content,
}

/// Output of [`SendChatMessage`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Persisted [`Message`] of the [`User`].
    pub user_message: Message,

    /// Persisted reply of the assistant.
    pub assistant_message: Message,
}

impl<Db, Ai> Command<SendChatMessage> for Service<Db, Ai>
where
    Db: Database<Insert<Message>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<Message>, history::Filter>>,
            Ok = Vec<Message>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Block>, user::Id>>,
            Ok = Vec<Block>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Resource>, resource::list::Filter>>,
            Ok = Vec<Resource>,
            Err = Traced<database::Error>,
        >,
    Ai: Completion<
        completion::Chat,
        Ok = String,
        Err = Traced<completion::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SendChatMessage,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendChatMessage { user_id, message } = cmd;

        // History is captured before the new message lands, so the model
        // sees it exactly once, appended as the final turn.
        let history = self
            .database()
            .execute(Select(By::new(history::Filter {
                user_id,
                last: Some(HISTORY_DEPTH),
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let user_message = Message {
            id: chat::Id::new(),
            user_id,
            role: chat::Role::User,
            content: message,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(user_message.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let blocks = self
            .database()
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let resources = self
            .database()
            .execute(Select(By::new(resource::list::Filter {
                user_id,
                subject: None,
                limit: Some(CONTEXT_RESOURCES),
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut turns = vec![completion::Turn {
            role: completion::Role::System,
            content: student_context(&blocks, &resources),
        }];
        turns.extend(history.into_iter().map(|m| completion::Turn {
            role: match m.role {
                chat::Role::User => completion::Role::User,
                chat::Role::Assistant => completion::Role::Assistant,
            },
            content: m.content.into(),
        }));
        turns.push(completion::Turn {
            role: completion::Role::User,
            content: user_message.content.to_string(),
        });

        let reply = self
            .completion()
            .execute(completion::Chat(turns))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let assistant_message = Message {
            id: chat::Id::new(),
            user_id,
            role: chat::Role::Assistant,
            content: chat::Content::reply(&reply),
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(assistant_message.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Output {
            user_message,
            assistant_message,
        })
    }
}

/// Renders the student's current situation into a system turn, so the
/// assistant can ground its advice without any retrieval round-trip.
fn student_context(blocks: &[Block], resources: &[Resource]) -> String {
    /// French day names, indexed by day of week (Sunday first).
    const DAYS: [&str; 7] = [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi",
        "samedi",
    ];

    let mut out = String::from("Contexte de l'étudiant.\n");

    if blocks.is_empty() {
        out.push_str("Emploi du temps: aucun créneau enregistré.\n");
    } else {
        out.push_str("Emploi du temps:\n");
        for b in blocks {
            let day = DAYS[usize::from(u8::from(b.day_of_week))];
            _ = writeln!(
                out,
                "- {} ({day} {}-{})",
                b.title, b.start_time, b.end_time,
            );
        }
    }

    if resources.is_empty() {
        out.push_str("Ressources: aucune ressource enregistrée.\n");
    } else {
        out.push_str("Ressources récentes:\n");
        for r in resources {
            _ = writeln!(out, "- {} ({})", r.title, r.subject);
        }
    }

    out
}

/// Error of [`SendChatMessage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Completion`] error.
    #[display("`Completion` operation failed: {_0}")]
    Ai(completion::Error),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
