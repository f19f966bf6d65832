//! Pure view/render functions for the TUI.
//!
//! This module contains all rendering logic. Functions here:
//! - Take `&AppState` by immutable reference
//! - Draw to a ratatui Frame
//! - Never mutate state or return effects

use leadctl_core::leads::SortOrder;
use leadctl_core::pager::{PagerSlot, pager_slots};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::overlays::OverlayExt;
use crate::overlays::render_utils::{
    InputHint, OverlayConfig, calculate_overlay_area, render_overlay, render_separator,
};
use crate::state::{
    AppState, LeadsView, LoginField, LoginForm, NoticeKind, RegisterField, RegisterForm, Screen,
    TuiState,
};
use crate::text::{truncate_start_with_ellipsis, truncate_with_ellipsis};

/// Height of the header above the lead table.
const HEADER_HEIGHT: u16 = 1;

/// Height of the pager line below the lead table.
const PAGER_HEIGHT: u16 = 1;

/// Height of the status line at the bottom.
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks each spinner frame is held for.
const SPINNER_SPEED_DIVISOR: usize = 2;

/// Widest search term shown in the filter summary.
const SEARCH_SUMMARY_WIDTH: usize = 20;

/// Renders the entire TUI to the frame.
///
/// This is a pure render function - it only reads state and draws to frame.
/// No mutations, no side effects.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    match &state.screen {
        Screen::Boot => render_boot(state, frame, area),
        Screen::Login(form) => render_login(state, form, frame, area),
        Screen::Register(form) => render_register(state, form, frame, area),
        Screen::Leads(view) => render_leads(state, view, frame, area),
    }

    // Render overlay (last, so it appears on top)
    app.overlay.render(frame, area);
}

fn spinner(frame_count: usize) -> &'static str {
    SPINNER_FRAMES[(frame_count / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()]
}

// ============================================================================
// Boot Screen
// ============================================================================

fn render_boot(state: &TuiState, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                spinner(state.spinner_frame),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" "),
            Span::styled("Connecting...", Style::default().fg(Color::Yellow)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            state.base_url.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let target = calculate_overlay_area(area, area.width, 3);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

// ============================================================================
// Auth Screens
// ============================================================================

fn render_login(state: &TuiState, form: &LoginForm, frame: &mut Frame, area: Rect) {
    let hints = [
        InputHint::new("Enter", "sign in"),
        InputHint::new("Tab", "next field"),
        InputHint::new("Ctrl+N", "register"),
        InputHint::new("Esc", "quit"),
    ];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "Sign In",
            border_color: Color::Cyan,
            width: 56,
            height: 7,
            hints: &hints,
        },
    );

    render_form_field(
        frame,
        layout.body,
        0,
        "Email",
        &form.email,
        form.focus == LoginField::Email,
        false,
    );
    render_form_field(
        frame,
        layout.body,
        1,
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        true,
    );
    render_separator(frame, layout.body, 2);

    let message = if form.submitting {
        progress_line(state, "Signing in...")
    } else if let Some(error) = &form.error {
        error_line(error)
    } else {
        notice_line(state).unwrap_or_else(|| {
            Line::from(Span::styled(
                state.base_url.clone(),
                Style::default().fg(Color::DarkGray),
            ))
        })
    };
    render_message(frame, layout.body, 3, message);
}

fn render_register(state: &TuiState, form: &RegisterForm, frame: &mut Frame, area: Rect) {
    let hints = [
        InputHint::new("Enter", "create account"),
        InputHint::new("Tab", "next field"),
        InputHint::new("Esc", "back"),
    ];
    let layout = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "Create Account",
            border_color: Color::Cyan,
            width: 56,
            height: 9,
            hints: &hints,
        },
    );

    render_form_field(
        frame,
        layout.body,
        0,
        "Name",
        &form.name,
        form.focus == RegisterField::Name,
        false,
    );
    render_form_field(
        frame,
        layout.body,
        1,
        "Email",
        &form.email,
        form.focus == RegisterField::Email,
        false,
    );
    render_form_field(
        frame,
        layout.body,
        2,
        "Password",
        &form.password,
        form.focus == RegisterField::Password,
        true,
    );
    render_form_field(
        frame,
        layout.body,
        3,
        "Confirm",
        &form.password_confirmation,
        form.focus == RegisterField::Confirm,
        true,
    );
    render_separator(frame, layout.body, 4);

    let message = if form.submitting {
        progress_line(state, "Creating account...")
    } else if let Some(error) = &form.error {
        error_line(error)
    } else {
        Line::from(Span::styled(
            "Passwords must match",
            Style::default().fg(Color::DarkGray),
        ))
    };
    render_message(frame, layout.body, 5, message);
}

/// Label column width inside the auth forms, including the focus marker.
const FORM_LABEL_WIDTH: u16 = 11;

fn render_form_field(
    frame: &mut Frame,
    body: Rect,
    row: u16,
    label: &str,
    value: &str,
    focused: bool,
    mask: bool,
) {
    if row >= body.height {
        return;
    }
    let area = Rect::new(body.x, body.y + row, body.width, 1);

    let marker = if focused { "> " } else { "  " };
    let label_color = if focused { Color::Cyan } else { Color::DarkGray };
    let shown = if mask {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let max_width = body.width.saturating_sub(FORM_LABEL_WIDTH + 1) as usize;
    let shown = truncate_start_with_ellipsis(&shown, max_width);

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{label:<9}"), Style::default().fg(label_color)),
        Span::styled(shown, Style::default().fg(Color::White)),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_message(frame: &mut Frame, body: Rect, row: u16, line: Line<'_>) {
    if row >= body.height {
        return;
    }
    let area = Rect::new(body.x, body.y + row, body.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn progress_line(state: &TuiState, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            spinner(state.spinner_frame),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(text.to_string(), Style::default().fg(Color::Yellow)),
    ])
}

fn error_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Red),
    ))
}

fn notice_line(state: &TuiState) -> Option<Line<'static>> {
    let notice = state.notice.as_ref()?;
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    Some(Line::from(Span::styled(
        notice.text.clone(),
        Style::default().fg(color),
    )))
}

// ============================================================================
// Lead List Screen
// ============================================================================

fn render_leads(state: &TuiState, view: &LeadsView, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(PAGER_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(state, frame, chunks[0]);
    render_lead_table(view, frame, chunks[1]);
    render_pager_line(view, frame, chunks[2]);
    render_status_line(state, view, frame, chunks[3]);
}

fn render_header(state: &TuiState, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Leads",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);

    if let Some(user) = state.session.user() {
        let who = Paragraph::new(Line::from(Span::styled(
            format!("{} <{}> ", user.name, user.email),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(who, area);
    }
}

fn render_lead_table(view: &LeadsView, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let rows = view.browser.rows();
    if rows.is_empty() {
        let text = if view.browser.is_loading() {
            "Loading..."
        } else {
            "No leads match the current filters"
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let message = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        let target = calculate_overlay_area(inner, inner.width, 1);
        frame.render_widget(message, target);
        return;
    }

    let header = Row::new(vec!["ID", "Name", "Email", "Phone", "Status"]).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let body: Vec<Row> = rows
        .iter()
        .map(|lead| {
            Row::new(vec![
                Cell::from(lead.id.to_string()),
                Cell::from(lead.name.clone()),
                Cell::from(lead.email.clone()),
                Cell::from(lead.phone.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(
                    lead.status
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |s| s.name.clone()),
                ),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(28),
        Constraint::Percentage(36),
        Constraint::Length(16),
        Constraint::Length(14),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(view.selected));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Pager slots on the left, active filter summary on the right.
fn render_pager_line(view: &LeadsView, frame: &mut Frame, area: Rect) {
    let current = view.browser.page();
    let mut spans = vec![Span::styled(" Page", Style::default().fg(Color::DarkGray))];
    for slot in pager_slots(view.browser.total_pages()) {
        spans.push(Span::raw(" "));
        spans.push(match slot {
            PagerSlot::Page(n) if n == current => Span::styled(
                format!("[{n}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            PagerSlot::Page(n) => Span::styled(n.to_string(), Style::default().fg(Color::White)),
            PagerSlot::Gap => Span::styled("…", Style::default().fg(Color::DarkGray)),
            PagerSlot::Jump => Span::styled("g", Style::default().fg(Color::DarkGray)),
        });
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let summary = Paragraph::new(Line::from(Span::styled(
        format!("{} ", filter_summary(view)),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(summary, area);
}

fn filter_summary(view: &LeadsView) -> String {
    let query = view.browser.query();
    let mut parts = Vec::new();
    if !query.search.is_empty() {
        parts.push(format!(
            "search \"{}\"",
            truncate_with_ellipsis(&query.search, SEARCH_SUMMARY_WIDTH)
        ));
    }
    if let Some(name) = view.status_filter_name() {
        parts.push(format!("status {name}"));
    }
    let arrow = match query.sort_order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };
    parts.push(format!("{} {arrow}", query.sort_by.wire_name()));
    parts.push(format!("{}/page", query.per_page.as_u32()));
    parts.join(" · ")
}

fn render_status_line(state: &TuiState, view: &LeadsView, frame: &mut Frame, area: Rect) {
    let spans: Vec<Span> = if view.browser.is_loading() {
        vec![
            Span::raw(" "),
            Span::styled(
                spinner(state.spinner_frame),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" "),
            Span::styled("Loading...", Style::default().fg(Color::Yellow)),
        ]
    } else if let Some(notice) = &state.notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        vec![
            Span::raw(" "),
            Span::styled(notice.text.clone(), Style::default().fg(color)),
        ]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, action)) in [
            ("/", "search"),
            ("a", "add"),
            ("e", "edit"),
            ("f", "filter"),
            ("←/→", "page"),
            ("q", "quit"),
        ]
        .into_iter()
        .enumerate()
        {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key, Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(format!(" {action}")));
        }
        spans
    };

    let status = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(status, area);

    let url = Paragraph::new(Line::from(Span::styled(
        format!("{} ", state.base_url),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(url, area);
}
