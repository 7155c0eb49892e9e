//! Jira work-log synchronization core.
//!
//! This crate provides the complete tracker integration:
//! - [`JiraClient`]: REST API client with OAuth 1.0 RSA-SHA1 authentication
//! - [`OAuthHandshake`](oauth::OAuthHandshake): three-legged token flow
//! - [`WorklogSyncer`](sync::WorklogSyncer): idempotent entry/worklog
//!   reconciliation with per-entry failure isolation
//!
//! # API Client
//!
//! ```ignore
//! use std::sync::Arc;
//! use tt_jira::JiraClient;
//!
//! let client = JiraClient::new(&tracker, "jdoe", Arc::clone(&store))?;
//!
//! if client.issue_exists("ABC-1")? {
//!     let created = client.create_worklog("ABC-1", &request)?;
//!     println!("worklog id: {}", created.id);
//! }
//! ```

// API client
mod client;
pub use client::JiraClient;

// OAuth
pub mod oauth;

// Types (decoded API results and request bodies)
mod types;
pub use types::{CreatedIssue, CreatedWorklog, IssueRef, SearchResult, WorklogRequest};

// Work-log synchronizer
pub mod sync;
pub use sync::{SyncOutcome, SyncReport, WorklogGateway, WorklogSyncer};

// Errors
pub mod error;
pub use error::JiraError;
