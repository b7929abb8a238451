//! Record types supplied by the caller: activities, projects, collaborators.
//!
//! All records are immutable values. The engine borrows them, re-indexes
//! them, and never writes them back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

id_newtype!(
    /// Identity of an [`Activity`].
    ActivityId
);
id_newtype!(
    /// Identity of a [`Project`].
    ProjectId
);
id_newtype!(
    /// Identity of a [`Collaborator`].
    CollaboratorId
);

/// A single logged unit of work by a collaborator on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub project_id: ProjectId,
    pub collaborator_id: CollaboratorId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-boxed project. Start and end are calendar dates with no time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// A project is closed once its end date is strictly before `today`.
    ///
    /// The comparison is date-only: a project ending today is still open.
    #[must_use]
    pub fn is_closed(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// Someone who logs activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: CollaboratorId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub created_at: DateTime<Utc>,
}
