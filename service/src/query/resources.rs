//! [`Query`] collection related to [`Resource`]s.

use common::operations::By;

use crate::domain::{resource, Resource};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Resource`]s matching a [`resource::list::Filter`], newest
/// first.
pub type List = DatabaseQuery<By<Vec<Resource>, resource::list::Filter>>;
