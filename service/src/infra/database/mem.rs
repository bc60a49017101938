//! In-memory [`Database`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Insert, Select, Update, Upsert};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::domain::{
    chat::history,
    resource,
    schedule::{block, revision},
    skill, user, Block, Message, Resource, Skill, User,
};

use super::{Database, Error};

/// [`Database`] keeping all the data in process memory.
///
/// Clones share the same state. Everything is lost on restart, which is
/// acceptable for the current single-node deployment.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    /// Shared state of this [`InMemory`] database.
    state: Arc<RwLock<State>>,
}

/// State of an [`InMemory`] database.
///
/// [`Vec`]s keep insertion order, which doubles as chronological order for
/// every collection here.
#[derive(Debug, Default)]
struct State {
    /// All the registered [`User`]s, keyed by ID.
    users: HashMap<user::Id, User>,

    /// All the stored [`Resource`]s.
    resources: Vec<Resource>,

    /// All the stored schedule [`Block`]s.
    blocks: Vec<Block>,

    /// All the stored revision [`Slot`]s.
    ///
    /// [`Slot`]: revision::Slot
    slots: Vec<revision::Slot>,

    /// All the stored chat [`Message`]s.
    messages: Vec<Message>,

    /// All the recorded [`DiagnosticResult`]s.
    ///
    /// [`DiagnosticResult`]: skill::DiagnosticResult
    diagnostics: Vec<skill::DiagnosticResult>,

    /// All the tracked [`Skill`]s, keyed by owner and subject name.
    skills: HashMap<(user::Id, skill::Name), Skill>,
}

impl Database<Select<By<Option<User>, user::Id>>> for InMemory {
    type Ok = Option<User>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

impl<'e> Database<Select<By<Option<User>, &'e user::Email>>> for InMemory {
    type Ok = Option<User>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }
}

impl Database<Insert<User>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(tracerr::new!(Error::AlreadyExists("User.email")));
        }
        drop(state.users.insert(user.id, user));
        Ok(())
    }
}

impl Database<Update<User>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state.write().await.users.insert(user.id, user));
        Ok(())
    }
}

impl Database<Insert<Resource>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(resource): Insert<Resource>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state.write().await.resources.push(resource);
        Ok(())
    }
}

impl Database<Select<By<Vec<Resource>, resource::list::Filter>>>
    for InMemory
{
    type Ok = Vec<Resource>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Resource>, resource::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let mut resources: Vec<_> = self
            .state
            .read()
            .await
            .resources
            .iter()
            .filter(|r| {
                r.user_id == filter.user_id
                    && filter
                        .subject
                        .as_ref()
                        .is_none_or(|subject| r.subject == *subject)
            })
            .cloned()
            .collect();
        resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            resources.truncate(limit);
        }
        Ok(resources)
    }
}

impl Database<Delete<By<Option<Resource>, (user::Id, resource::Id)>>>
    for InMemory
{
    type Ok = Option<Resource>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Resource>, (user::Id, resource::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, id) = by.into_inner();
        let mut state = self.state.write().await;
        Ok(state
            .resources
            .iter()
            .position(|r| r.user_id == user_id && r.id == id)
            .map(|i| state.resources.remove(i)))
    }
}

impl Database<Insert<Block>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(b): Insert<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state.write().await.blocks.push(b);
        Ok(())
    }
}

impl Database<Select<By<Vec<Block>, user::Id>>> for InMemory {
    type Ok = Vec<Block>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Block>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let mut blocks: Vec<_> = self
            .state
            .read()
            .await
            .blocks
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        blocks.sort_by(|a, b| {
            (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time))
        });
        Ok(blocks)
    }
}

impl Database<Delete<By<Option<Block>, (user::Id, block::Id)>>>
    for InMemory
{
    type Ok = Option<Block>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Block>, (user::Id, block::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, id) = by.into_inner();
        let mut state = self.state.write().await;
        Ok(state
            .blocks
            .iter()
            .position(|b| b.user_id == user_id && b.id == id)
            .map(|i| state.blocks.remove(i)))
    }
}

impl Database<Insert<Vec<revision::Slot>>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(slots): Insert<Vec<revision::Slot>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state.write().await.slots.extend(slots);
        Ok(())
    }
}

impl Database<Select<By<Vec<revision::Slot>, user::Id>>> for InMemory {
    type Ok = Vec<revision::Slot>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<revision::Slot>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let mut slots: Vec<_> = self
            .state
            .read()
            .await
            .slots
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        slots.sort_by(|a, b| {
            (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time))
        });
        Ok(slots)
    }
}

impl Database<Select<By<Option<revision::Slot>, (user::Id, revision::Id)>>>
    for InMemory
{
    type Ok = Option<revision::Slot>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<revision::Slot>, (user::Id, revision::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, id) = by.into_inner();
        Ok(self
            .state
            .read()
            .await
            .slots
            .iter()
            .find(|s| s.user_id == user_id && s.id == id)
            .cloned())
    }
}

impl Database<Update<revision::Slot>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(slot): Update<revision::Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if let Some(stored) =
            state.slots.iter_mut().find(|s| s.id == slot.id)
        {
            *stored = slot;
        }
        Ok(())
    }
}

impl Database<Delete<By<Vec<revision::Slot>, user::Id>>> for InMemory {
    type Ok = Vec<revision::Slot>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<revision::Slot>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let mut state = self.state.write().await;
        let (removed, kept): (Vec<_>, Vec<_>) = state
            .slots
            .drain(..)
            .partition(|s| s.user_id == user_id);
        state.slots = kept;
        Ok(removed)
    }
}

impl Database<Insert<Message>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(message): Insert<Message>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state.write().await.messages.push(message);
        Ok(())
    }
}

impl Database<Select<By<Vec<Message>, history::Filter>>> for InMemory {
    type Ok = Vec<Message>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Message>, history::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let mut messages: Vec<_> = self
            .state
            .read()
            .await
            .messages
            .iter()
            .filter(|m| m.user_id == filter.user_id)
            .cloned()
            .collect();
        if let Some(last) = filter.last {
            if messages.len() > last {
                messages.drain(..messages.len() - last);
            }
        }
        Ok(messages)
    }
}

impl Database<Delete<By<Vec<Message>, user::Id>>> for InMemory {
    type Ok = Vec<Message>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Message>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let mut state = self.state.write().await;
        let (removed, kept): (Vec<_>, Vec<_>) = state
            .messages
            .drain(..)
            .partition(|m| m.user_id == user_id);
        state.messages = kept;
        Ok(removed)
    }
}

impl Database<Insert<skill::DiagnosticResult>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(result): Insert<skill::DiagnosticResult>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state.write().await.diagnostics.push(result);
        Ok(())
    }
}

impl Database<Upsert<Skill>> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Upsert(skill): Upsert<Skill>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(
            self.state
                .write()
                .await
                .skills
                .insert((skill.user_id, skill.name.clone()), skill),
        );
        Ok(())
    }
}

impl Database<Select<By<Vec<Skill>, user::Id>>> for InMemory {
    type Ok = Vec<Skill>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Skill>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let mut skills: Vec<_> = self
            .state
            .read()
            .await
            .skills
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        skills.sort_by(|a, b| {
            let (a, b): (&str, &str) = (a.name.as_ref(), b.name.as_ref());
            a.cmp(b)
        });
        Ok(skills)
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        DateTime,
    };

    use crate::{
        domain::{
            chat::{self, history},
            user, Message,
        },
        infra::Database as _,
    };

    use super::InMemory;

    fn message(user_id: user::Id, text: &str) -> Message {
        Message {
            id: chat::Id::new(),
            user_id,
            role: chat::Role::User,
            content: chat::Content::new(text).unwrap(),
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn history_keeps_insertion_order_and_trims_to_the_last_n() {
        let db = InMemory::default();
        let user_id = user::Id::new();

        for text in ["one", "two", "three", "four"] {
            db.execute(Insert(message(user_id, text))).await.unwrap();
        }
        db.execute(Insert(message(user::Id::new(), "other")))
            .await
            .unwrap();

        let all: Vec<Message> = db
            .execute(Select(By::new(history::Filter {
                user_id,
                last: None,
            })))
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].content.to_string(), "one");

        let last: Vec<Message> = db
            .execute(Select(By::new(history::Filter {
                user_id,
                last: Some(2),
            })))
            .await
            .unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].content.to_string(), "three");
        assert_eq!(last[1].content.to_string(), "four");
    }
}
