//! [`Query`] collection related to [`Skill`]s.

use common::operations::By;

use crate::domain::{user, Skill};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries all the [`Skill`]s of a [`User`], ordered by name.
pub type ByUser = DatabaseQuery<By<Vec<Skill>, user::Id>>;
