//! UI event types.
//!
//! Events are inputs to the reducer: terminal input, timer ticks, and the
//! results of async work spawned by the runtime. Handlers send completion
//! events into the runtime inbox; the reducer never touches the network.

use leadctl_core::api::types::{Lead, LeadPage, LeadStatus, User};
use leadctl_core::api::ApiError;
use leadctl_core::leads::FetchId;

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic timer tick (drives spinner animation and render cadence).
    Tick,
    /// Raw terminal event (key, paste, resize).
    Terminal(crossterm::event::Event),

    /// Persisted session verification finished.
    ///
    /// `Ok(Some(user))` means the stored token is still valid. `Ok(None)`
    /// means there was no token or it was rejected and has been discarded.
    BootstrapDone(Result<Option<User>, String>),
    /// Login attempt finished. Errors arrive display-ready.
    LoginDone(Result<User, String>),
    /// Account creation finished. Errors arrive display-ready.
    RegisterDone(Result<(), String>),
    /// Logout finished. The local session is gone either way.
    LogoutDone,

    /// One page of leads arrived for the fetch labeled `id`.
    ///
    /// Results for superseded fetch ids are dropped by the reducer.
    LeadsPage {
        id: FetchId,
        result: Result<LeadPage, ApiError>,
    },
    /// The status list arrived (used for filtering and the lead form).
    StatusesLoaded(Result<Vec<LeadStatus>, ApiError>),
    /// A lead create/update round-trip finished.
    LeadSaved(Result<Lead, ApiError>),
}
