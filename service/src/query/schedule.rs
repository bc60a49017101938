//! [`Query`] collection related to a weekly schedule.

use common::operations::By;

use crate::domain::{
    schedule::{revision, Block},
    user,
};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries all the schedule [`Block`]s of a [`User`], ordered by day and
/// start time.
pub type Blocks = DatabaseQuery<By<Vec<Block>, user::Id>>;

/// Queries all the revision [`Slot`]s of a [`User`], ordered by day and
/// start time.
///
/// [`Slot`]: revision::Slot
pub type RevisionSlots = DatabaseQuery<By<Vec<revision::Slot>, user::Id>>;
