//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use leadctl_core::api::ApiError;
use leadctl_core::api::types::{Lead, LeadPage, LeadStatus, LoginRequest, RegisterRequest, User};
use leadctl_core::leads::{FetchId, QueryPatch};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::overlays::{
    JumpState, LeadFormState, Overlay, OverlayAction, OverlayTransition, OverlayUpdate, SearchState,
};
use crate::state::{AppState, LeadsView, LoginForm, Notice, RegisterForm, Screen, TuiState};

/// Shown when the backend rejects the bearer token mid-session.
const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            // Advance spinner animation
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::BootstrapDone(result) => handle_bootstrap_done(app, result),
        UiEvent::LoginDone(result) => handle_login_done(app, result),
        UiEvent::RegisterDone(result) => handle_register_done(app, result),
        UiEvent::LogoutDone => {
            app.tui.session.resolve_anonymous();
            app.tui.screen = Screen::Login(LoginForm::default());
            app.overlay = None;
            app.tui.notice = Some(Notice::info("Logged out."));
            vec![]
        }
        UiEvent::LeadsPage { id, result } => handle_leads_page(app, id, result),
        UiEvent::StatusesLoaded(result) => handle_statuses_loaded(app, result),
        UiEvent::LeadSaved(result) => handle_lead_saved(app, result),
    }
}

// ============================================================================
// Async Result Handlers
// ============================================================================

/// Switches to the lead list and kicks off the initial fetches.
fn enter_leads(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut view = LeadsView::default();
    let start = view.browser.refetch();
    tui.screen = Screen::Leads(view);
    vec![UiEffect::FetchLeads(start), UiEffect::FetchStatuses]
}

/// Drops to the login screen after the backend rejected the token.
fn expire_session(app: &mut AppState) -> Vec<UiEffect> {
    app.tui.session.resolve_anonymous();
    app.tui.screen = Screen::Login(LoginForm::default());
    app.overlay = None;
    app.tui.notice = Some(Notice::error(SESSION_EXPIRED_MESSAGE));
    vec![UiEffect::DiscardSession]
}

fn handle_bootstrap_done(app: &mut AppState, result: Result<Option<User>, String>) -> Vec<UiEffect> {
    match result {
        Ok(Some(user)) => {
            app.tui.session.resolve_authenticated(user);
            enter_leads(&mut app.tui)
        }
        Ok(None) => {
            app.tui.session.resolve_anonymous();
            app.tui.screen = Screen::Login(LoginForm::default());
            vec![]
        }
        Err(message) => {
            app.tui.session.resolve_anonymous();
            app.tui.screen = Screen::Login(LoginForm::default());
            app.tui.notice = Some(Notice::error(message));
            vec![]
        }
    }
}

fn handle_login_done(app: &mut AppState, result: Result<User, String>) -> Vec<UiEffect> {
    match result {
        Ok(user) => {
            app.tui.notice = None;
            app.tui.session.resolve_authenticated(user);
            enter_leads(&mut app.tui)
        }
        Err(message) => {
            if let Screen::Login(form) = &mut app.tui.screen {
                form.submitting = false;
                form.error = Some(message);
            }
            vec![]
        }
    }
}

fn handle_register_done(app: &mut AppState, result: Result<(), String>) -> Vec<UiEffect> {
    match result {
        Ok(()) => {
            let email = match &mut app.tui.screen {
                Screen::Register(form) => std::mem::take(&mut form.email),
                _ => String::new(),
            };
            app.tui.screen = Screen::Login(LoginForm::with_email(email));
            app.tui.notice = Some(Notice::info("Account created. Please log in."));
            vec![]
        }
        Err(message) => {
            if let Screen::Register(form) = &mut app.tui.screen {
                form.submitting = false;
                form.error = Some(message);
            }
            vec![]
        }
    }
}

fn handle_leads_page(
    app: &mut AppState,
    id: FetchId,
    result: Result<LeadPage, ApiError>,
) -> Vec<UiEffect> {
    match result {
        Ok(page) => {
            let Screen::Leads(view) = &mut app.tui.screen else {
                return vec![];
            };
            let follow_up = view.browser.apply_page(id, page);
            view.clamp_selection();
            match follow_up {
                Some(start) => vec![UiEffect::FetchLeads(start)],
                None => vec![],
            }
        }
        Err(err) if err.is_auth() => expire_session(app),
        Err(err) => {
            let Screen::Leads(view) = &mut app.tui.screen else {
                return vec![];
            };
            // Superseded fetches report errors too; only the newest one counts.
            if view.browser.apply_error(id) {
                app.tui.notice = Some(Notice::error(err.to_string()));
            }
            vec![]
        }
    }
}

fn handle_statuses_loaded(
    app: &mut AppState,
    result: Result<Vec<LeadStatus>, ApiError>,
) -> Vec<UiEffect> {
    match result {
        Ok(statuses) => {
            if let Screen::Leads(view) = &mut app.tui.screen {
                view.statuses = statuses;
            }
            vec![]
        }
        Err(err) if err.is_auth() => expire_session(app),
        Err(err) => {
            app.tui.notice = Some(Notice::error(err.to_string()));
            vec![]
        }
    }
}

fn handle_lead_saved(app: &mut AppState, result: Result<Lead, ApiError>) -> Vec<UiEffect> {
    match result {
        Ok(lead) => {
            app.overlay = None;
            app.tui.notice = Some(Notice::info(format!("Lead #{} saved.", lead.id)));
            if let Screen::Leads(view) = &mut app.tui.screen {
                vec![UiEffect::FetchLeads(view.browser.refetch())]
            } else {
                vec![]
            }
        }
        Err(err) if err.is_auth() => expire_session(app),
        Err(err) => {
            if let Some(Overlay::LeadForm(form)) = &mut app.overlay {
                form.submitting = false;
                form.error = Some(err.to_string());
            } else {
                app.tui.notice = Some(Notice::error(err.to_string()));
            }
            vec![]
        }
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            handle_paste(app, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_paste(app: &mut AppState, text: &str) {
    if let Some(overlay) = &mut app.overlay {
        overlay.insert_text(text);
        return;
    }
    match &mut app.tui.screen {
        Screen::Login(form) if !form.submitting => push_filtered(form.focused_value_mut(), text),
        Screen::Register(form) if !form.submitting => push_filtered(form.focused_value_mut(), text),
        _ => {}
    }
}

fn push_filtered(value: &mut String, text: &str) {
    value.extend(text.chars().filter(|c| !c.is_control()));
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Dispatch to the active overlay first
    let overlay_update = app.overlay.as_mut().map(|overlay| overlay.handle_key(key));
    if let Some(update) = overlay_update {
        return apply_overlay_update(app, update);
    }

    match &app.tui.screen {
        Screen::Boot => handle_boot_key(key),
        Screen::Login(_) => handle_login_key(app, key),
        Screen::Register(_) => handle_register_key(app, key),
        Screen::Leads(_) => handle_leads_key(app, key),
    }
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    let effects = match update.action {
        Some(action) => handle_overlay_action(app, action),
        None => vec![],
    };
    if matches!(update.transition, OverlayTransition::Close) {
        app.overlay = None;
    }
    effects
}

fn handle_overlay_action(app: &mut AppState, action: OverlayAction) -> Vec<UiEffect> {
    match action {
        OverlayAction::SubmitLead { id, draft } => vec![UiEffect::SaveLead { id, draft }],
        OverlayAction::JumpToPage(page) => {
            let Screen::Leads(view) = &mut app.tui.screen else {
                return vec![];
            };
            match view.browser.set_page(page) {
                Some(start) => vec![UiEffect::FetchLeads(start)],
                None => vec![],
            }
        }
        OverlayAction::SetSearch(search) => {
            let Screen::Leads(view) = &mut app.tui.screen else {
                return vec![];
            };
            let start = view.browser.set_filter(QueryPatch {
                search: Some(search),
                ..QueryPatch::default()
            });
            vec![UiEffect::FetchLeads(start)]
        }
    }
}

fn handle_boot_key(key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('q') | KeyCode::Esc => vec![UiEffect::Quit],
        _ => vec![],
    }
}

fn handle_login_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') => vec![UiEffect::Quit],
            KeyCode::Char('n') => {
                app.tui.screen = Screen::Register(RegisterForm::default());
                vec![]
            }
            _ => vec![],
        };
    }

    let Screen::Login(form) = &mut app.tui.screen else {
        return vec![];
    };
    if form.submitting {
        return vec![];
    }

    // Clear the failure message on any edit
    if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        form.error = None;
    }

    match key.code {
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            form.focus = form.focus.next();
            vec![]
        }
        KeyCode::Enter => {
            let email = form.email.trim().to_string();
            if email.is_empty() || form.password.is_empty() {
                form.error = Some("Email and password are required".to_string());
                vec![]
            } else {
                form.submitting = true;
                form.error = None;
                vec![UiEffect::Login(LoginRequest {
                    email,
                    password: form.password.clone(),
                })]
            }
        }
        KeyCode::Backspace => {
            form.focused_value_mut().pop();
            vec![]
        }
        KeyCode::Char(c) => {
            form.focused_value_mut().push(c);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_register_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') => vec![UiEffect::Quit],
            _ => vec![],
        };
    }

    if key.code == KeyCode::Esc {
        app.tui.screen = Screen::Login(LoginForm::default());
        return vec![];
    }

    let Screen::Register(form) = &mut app.tui.screen else {
        return vec![];
    };
    if form.submitting {
        return vec![];
    }

    if key.code != KeyCode::Enter {
        form.error = None;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = form.focus.prev();
            vec![]
        }
        KeyCode::Enter => {
            let name = form.name.trim().to_string();
            let email = form.email.trim().to_string();
            if name.is_empty() || email.is_empty() || form.password.is_empty() {
                form.error = Some("Name, email and password are required".to_string());
                vec![]
            } else if form.password != form.password_confirmation {
                form.error = Some("Passwords do not match".to_string());
                vec![]
            } else {
                form.submitting = true;
                form.error = None;
                vec![UiEffect::Register(RegisterRequest {
                    name,
                    email,
                    password: form.password.clone(),
                    password_confirmation: form.password_confirmation.clone(),
                })]
            }
        }
        KeyCode::Backspace => {
            form.focused_value_mut().pop();
            vec![]
        }
        KeyCode::Char(c) => {
            form.focused_value_mut().push(c);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_leads_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') => vec![UiEffect::Quit],
            _ => vec![],
        };
    }

    let Screen::Leads(view) = &mut app.tui.screen else {
        return vec![];
    };

    match key.code {
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('r') => vec![UiEffect::FetchLeads(view.browser.refetch())],
        KeyCode::Char('/') => {
            app.overlay = Some(Overlay::Search(SearchState::open(
                &view.browser.query().search,
            )));
            vec![]
        }
        KeyCode::Char('g') => {
            app.overlay = Some(Overlay::Jump(JumpState::open(view.browser.total_pages())));
            vec![]
        }
        KeyCode::Char('a') => {
            app.overlay = Some(Overlay::LeadForm(LeadFormState::create(
                view.statuses.clone(),
            )));
            vec![]
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(lead) = view.selected_lead() {
                app.overlay = Some(Overlay::LeadForm(LeadFormState::edit(
                    lead,
                    view.statuses.clone(),
                )));
            }
            vec![]
        }
        KeyCode::Char('f') => {
            let next = view.next_status_filter();
            let start = view.browser.set_filter(QueryPatch {
                status: Some(next),
                ..QueryPatch::default()
            });
            vec![UiEffect::FetchLeads(start)]
        }
        KeyCode::Char('s') => {
            let next = view.browser.query().sort_by.cycle();
            let start = view.browser.set_filter(QueryPatch {
                sort_by: Some(next),
                ..QueryPatch::default()
            });
            vec![UiEffect::FetchLeads(start)]
        }
        KeyCode::Char('o') => {
            let next = view.browser.query().sort_order.toggle();
            let start = view.browser.set_filter(QueryPatch {
                sort_order: Some(next),
                ..QueryPatch::default()
            });
            vec![UiEffect::FetchLeads(start)]
        }
        KeyCode::Char('+') => {
            let next = view.browser.query().per_page.cycle();
            let start = view.browser.set_filter(QueryPatch {
                per_page: Some(next),
                ..QueryPatch::default()
            });
            vec![UiEffect::FetchLeads(start)]
        }
        KeyCode::Left => match view.browser.prev_page() {
            Some(start) => vec![UiEffect::FetchLeads(start)],
            None => vec![],
        },
        KeyCode::Right => match view.browser.next_page() {
            Some(start) => vec![UiEffect::FetchLeads(start)],
            None => vec![],
        },
        KeyCode::Up | KeyCode::Char('k') => {
            view.select_prev();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view.select_next();
            vec![]
        }
        KeyCode::Char('L') => vec![UiEffect::Logout],
        _ => vec![],
    }
}
