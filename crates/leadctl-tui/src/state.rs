//! Application state composition.
//!
//! Top-level state hierarchy for the TUI:
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── screen: Screen       (boot / login / register / leads)
//! │   ├── session: Session     (auth phase)
//! │   └── notice: Option<Notice> (status line message)
//! └── overlay: Option<Overlay> (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can take `&mut` to both sides without borrow conflicts.

use leadctl_core::api::types::{Lead, LeadStatus};
use leadctl_core::leads::LeadBrowser;
use leadctl_core::session::Session;

use crate::overlays::Overlay;

// ============================================================================
// AppState (Combined State)
// ============================================================================

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// Creates the initial state, on the boot screen.
    pub fn new(base_url: String) -> Self {
        Self {
            tui: TuiState::new(base_url),
            overlay: None,
        }
    }

    /// Returns true while async work the user is waiting on is in flight.
    ///
    /// The runtime polls faster while busy so spinners animate smoothly.
    pub fn is_busy(&self) -> bool {
        let screen_busy = match &self.tui.screen {
            Screen::Boot => true,
            Screen::Login(form) => form.submitting,
            Screen::Register(form) => form.submitting,
            Screen::Leads(view) => view.browser.is_loading(),
        };
        let overlay_busy = matches!(
            &self.overlay,
            Some(Overlay::LeadForm(form)) if form.submitting
        );
        screen_busy || overlay_busy
    }
}

// ============================================================================
// TuiState
// ============================================================================

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Active screen.
    pub screen: Screen,
    /// Authentication phase.
    pub session: Session,
    /// Transient message shown in the status line.
    pub notice: Option<Notice>,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Backend base URL (shown in the footer).
    pub base_url: String,
}

impl TuiState {
    pub fn new(base_url: String) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Boot,
            session: Session::new(),
            notice: None,
            spinner_frame: 0,
            base_url,
        }
    }
}

/// The screen currently occupying the main area.
pub enum Screen {
    /// Verifying the persisted session at startup.
    Boot,
    Login(LoginForm),
    Register(RegisterForm),
    Leads(LeadsView),
}

// ============================================================================
// Auth Forms
// ============================================================================

/// Focusable fields of the login form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

/// Login form state.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    /// Form with the email pre-filled (used after registration).
    pub fn with_email(email: String) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Focusable fields of the register form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegisterField {
    #[default]
    Name,
    Email,
    Password,
    Confirm,
}

impl RegisterField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Password,
            Self::Password => Self::Confirm,
            Self::Confirm => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Confirm,
            Self::Email => Self::Name,
            Self::Password => Self::Email,
            Self::Confirm => Self::Password,
        }
    }
}

/// Register form state.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub focus: RegisterField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl RegisterForm {
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            RegisterField::Name => &mut self.name,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
            RegisterField::Confirm => &mut self.password_confirmation,
        }
    }
}

// ============================================================================
// LeadsView
// ============================================================================

/// State of the lead list screen: the browser plus selection and the
/// status list used for filtering and the lead form.
#[derive(Debug, Default)]
pub struct LeadsView {
    pub browser: LeadBrowser,
    pub selected: usize,
    pub statuses: Vec<LeadStatus>,
}

impl LeadsView {
    pub fn selected_lead(&self) -> Option<&Lead> {
        self.browser.rows().get(self.selected)
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.browser.rows().len() {
            self.selected += 1;
        }
    }

    /// Keeps the selection inside the current rows after a page change.
    pub fn clamp_selection(&mut self) {
        let len = self.browser.rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Next stop in the status filter cycle: none, each status in order,
    /// back to none. A filter id no longer in the list also wraps to none.
    pub fn next_status_filter(&self) -> Option<u64> {
        if self.statuses.is_empty() {
            return None;
        }
        match self.browser.query().status {
            None => Some(self.statuses[0].id),
            Some(current) => match self.statuses.iter().position(|s| s.id == current) {
                Some(i) if i + 1 < self.statuses.len() => Some(self.statuses[i + 1].id),
                _ => None,
            },
        }
    }

    /// Display name of the active status filter.
    pub fn status_filter_name(&self) -> Option<&str> {
        let id = self.browser.query().status?;
        self.statuses
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }
}

// ============================================================================
// Notice
// ============================================================================

/// Severity of a status line notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient message shown in the status line until replaced.
#[derive(Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}
