//! logbook-core library.
//!
//! Filtering, grouping, recency, and report layout over an activity log.
//! Every operation is a pure function of its inputs and a [`clock::Clock`];
//! nothing here touches the file system except [`config`].

pub mod clock;
pub mod config;
pub mod dates;
pub mod directory;
pub mod error;
pub mod filter;
pub mod group;
pub mod model;
pub mod recency;
pub mod report;
pub mod snapshot;
pub mod view;

// Conventions
//
// - Errors: `thiserror` enums at parse boundaries, `anyhow::Result` for
//   config file access.
// - Logging: `tracing` macros (`debug!`, `trace!`); the binary owns the
//   subscriber.

pub use clock::{Clock, FixedClock, SystemClock};
pub use filter::{DatePreset, Filters, Selector};
pub use model::{Activity, ActivityId, Collaborator, CollaboratorId, Project, ProjectId};
pub use snapshot::{Snapshot, SnapshotError};
