//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! This keeps the reducer pure: it only mutates state and returns effects,
//! never performs I/O or spawns tasks directly.

use leadctl_core::api::types::{LeadDraft, LoginRequest, RegisterRequest};
use leadctl_core::leads::FetchStart;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Verify the persisted session against the backend.
    Bootstrap,

    /// Exchange credentials for a bearer token and persist it.
    Login(LoginRequest),

    /// Create a new account (does not log in).
    Register(RegisterRequest),

    /// Revoke the token server-side and clear the local session.
    Logout,

    /// Drop the local session without a server round-trip.
    ///
    /// Used when the backend already rejected the token.
    DiscardSession,

    /// Fetch one page of leads. The id labels the eventual result.
    FetchLeads(FetchStart),

    /// Fetch the status list.
    FetchStatuses,

    /// Create (`id: None`) or update (`id: Some`) a lead.
    SaveLead {
        id: Option<u64>,
        draft: LeadDraft,
    },
}
