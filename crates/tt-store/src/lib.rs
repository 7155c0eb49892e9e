//! Entry and credential storage for the TimeTracker sync tools.
//!
//! This crate holds the data model shared by the synchronization core
//! and the collaborator contracts the core depends on:
//!
//! - [`Entry`]: a local time entry with its remembered remote worklog id
//! - [`Credential`]: per-user-per-tracker OAuth access token pair
//! - [`EntryAccess`] / [`EntryStore`] / [`CredentialStore`]: traits the
//!   surrounding application implements
//! - [`JsonStore`]: file-backed implementation used by the CLI
//! - [`MemoryStore`]: in-memory mock for tests (feature `mock`)

mod credential;
mod entry;
mod error;
mod json;
mod traits;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use credential::{Credential, REQUEST_TOKEN_PLACEHOLDER};
pub use entry::Entry;
pub use error::StoreError;
pub use json::JsonStore;
pub use traits::{CredentialStore, EntryAccess, EntryStore};

#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryStore;
