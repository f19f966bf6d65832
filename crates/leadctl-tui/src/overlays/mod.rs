//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard input.
//! Each overlay is self-contained: it owns its state, key handler, and render
//! function.
//!
//! Overlays do not touch the lead browser or the network directly. On submit
//! they hand an [`OverlayAction`] back to the reducer, which owns the
//! resulting state changes and effects.

pub mod jump;
pub mod lead_form;
pub mod render_utils;
pub mod search;

use crossterm::event::KeyEvent;
pub use jump::JumpState;
pub use lead_form::{LeadField, LeadFormState};
use leadctl_core::api::types::LeadDraft;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use search::SearchState;

// ============================================================================
// OverlayAction / OverlayTransition / OverlayUpdate
// ============================================================================

/// Domain actions an overlay hands back to the reducer on submit.
#[derive(Debug)]
pub enum OverlayAction {
    /// Create (`id: None`) or update (`id: Some`) a lead from the form.
    SubmitLead { id: Option<u64>, draft: LeadDraft },
    /// Jump the list to the given page.
    JumpToPage(u32),
    /// Replace the free-text search filter (empty clears it).
    SetSearch(String),
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub action: Option<OverlayAction>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            action: None,
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_action(mut self, action: OverlayAction) -> Self {
        self.action = Some(action);
        self
    }
}

// ============================================================================
// Overlay
// ============================================================================

/// Modal overlays. At most one is active at a time.
#[derive(Debug)]
pub enum Overlay {
    LeadForm(LeadFormState),
    Jump(JumpState),
    Search(SearchState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::LeadForm(form) => form.render(frame, area),
            Overlay::Jump(jump) => jump.render(frame, area),
            Overlay::Search(search) => search.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::LeadForm(form) => form.handle_key(key),
            Overlay::Jump(jump) => jump.handle_key(key),
            Overlay::Search(search) => search.handle_key(key),
        }
    }

    /// Routes pasted text into the overlay's focused input.
    pub fn insert_text(&mut self, text: &str) {
        match self {
            Overlay::LeadForm(form) => form.insert_text(text),
            Overlay::Jump(jump) => jump.insert_text(text),
            Overlay::Search(search) => search.insert_text(text),
        }
    }
}

// ============================================================================
// OverlayExt - Extension trait for Option<Overlay>
// ============================================================================

/// Extension trait for `Option<Overlay>` providing convenience render helpers.
pub trait OverlayExt {
    /// Renders the overlay if one is active.
    fn render(&self, frame: &mut Frame, area: Rect);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }
}
