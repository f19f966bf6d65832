//! Lead create/edit form overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use leadctl_core::api::types::{Lead, LeadDraft, LeadStatus};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{OverlayAction, OverlayUpdate};
use crate::text::truncate_start_with_ellipsis;

/// Focusable fields of the lead form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeadField {
    #[default]
    Name,
    Email,
    Phone,
    Status,
}

impl LeadField {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Phone,
            Self::Phone => Self::Status,
            Self::Status => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Status,
            Self::Email => Self::Name,
            Self::Phone => Self::Email,
            Self::Status => Self::Phone,
        }
    }
}

/// State for the lead create/edit overlay.
#[derive(Debug, Clone)]
pub struct LeadFormState {
    /// Id of the lead being edited; `None` creates a new lead.
    pub lead_id: Option<u64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Status choices, in display order.
    pub statuses: Vec<LeadStatus>,
    /// Index into `statuses` for the picked status; `None` leaves it unset.
    pub status_idx: Option<usize>,
    pub focus: LeadField,
    /// Error message to display (validation or a failed save).
    pub error: Option<String>,
    /// True while a save round-trip is in flight.
    pub submitting: bool,
}

impl LeadFormState {
    /// Opens an empty form that creates a new lead.
    pub fn create(statuses: Vec<LeadStatus>) -> Self {
        Self {
            lead_id: None,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            statuses,
            status_idx: None,
            focus: LeadField::default(),
            error: None,
            submitting: false,
        }
    }

    /// Opens the form pre-filled from an existing lead.
    pub fn edit(lead: &Lead, statuses: Vec<LeadStatus>) -> Self {
        let status_idx = lead
            .lead_status_id
            .and_then(|id| statuses.iter().position(|s| s.id == id));
        Self {
            lead_id: Some(lead.id),
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone().unwrap_or_default(),
            statuses,
            status_idx,
            focus: LeadField::default(),
            error: None,
            submitting: false,
        }
    }

    /// Builds the payload from the current form contents.
    fn draft(&self) -> LeadDraft {
        let phone = self.phone.trim();
        LeadDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            lead_status_id: self.status_idx.map(|i| self.statuses[i].id),
        }
    }

    fn focused_value_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            LeadField::Name => Some(&mut self.name),
            LeadField::Email => Some(&mut self.email),
            LeadField::Phone => Some(&mut self.phone),
            LeadField::Status => None,
        }
    }

    /// Steps the status selection: none, each status in order, back to none.
    fn cycle_status(&mut self, forward: bool) {
        if self.statuses.is_empty() {
            return;
        }
        self.status_idx = if forward {
            match self.status_idx {
                None => Some(0),
                Some(i) if i + 1 < self.statuses.len() => Some(i + 1),
                Some(_) => None,
            }
        } else {
            match self.status_idx {
                None => Some(self.statuses.len() - 1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            }
        };
    }

    fn status_label(&self) -> &str {
        match self.status_idx {
            Some(i) => self.statuses[i].name.as_str(),
            None => "(none)",
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // While saving, only allow closing; the result still lands via the
        // reducer whether the form is open or not.
        if self.submitting {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                    OverlayUpdate::close()
                }
                _ => OverlayUpdate::stay(),
            };
        }

        // Clear error on any input
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                OverlayUpdate::stay()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                OverlayUpdate::stay()
            }
            KeyCode::Left if self.focus == LeadField::Status => {
                self.cycle_status(false);
                OverlayUpdate::stay()
            }
            KeyCode::Right if self.focus == LeadField::Status => {
                self.cycle_status(true);
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                let draft = self.draft();
                if draft.name.is_empty() {
                    self.error = Some("Name cannot be empty".to_string());
                    OverlayUpdate::stay()
                } else if draft.email.is_empty() || !draft.email.contains('@') {
                    self.error = Some("Enter a valid email address".to_string());
                    OverlayUpdate::stay()
                } else {
                    self.submitting = true;
                    OverlayUpdate::stay().with_action(OverlayAction::SubmitLead {
                        id: self.lead_id,
                        draft,
                    })
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = self.focused_value_mut() {
                    value.pop();
                }
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(value) = self.focused_value_mut() {
                    value.push(c);
                }
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn insert_text(&mut self, text: &str) {
        if self.submitting {
            return;
        }
        if let Some(value) = self.focused_value_mut() {
            value.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        use super::render_utils::{InputHint, OverlayConfig, render_overlay, render_separator};

        let title = if self.lead_id.is_some() {
            "Edit Lead"
        } else {
            "New Lead"
        };
        let hints = [
            InputHint::new("Tab", "next field"),
            InputHint::new("◂ ▸", "status"),
            InputHint::new("Enter", "save"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title,
                border_color: Color::Cyan,
                width: 56,
                height: 11,
                hints: &hints,
            },
        );

        render_text_field(
            frame,
            layout.body,
            0,
            "Name",
            &self.name,
            self.focus == LeadField::Name,
        );
        render_text_field(
            frame,
            layout.body,
            1,
            "Email",
            &self.email,
            self.focus == LeadField::Email,
        );
        render_text_field(
            frame,
            layout.body,
            2,
            "Phone",
            &self.phone,
            self.focus == LeadField::Phone,
        );
        render_status_field(
            frame,
            layout.body,
            3,
            self.status_label(),
            self.focus == LeadField::Status,
        );

        render_separator(frame, layout.body, 4);

        let (message, style) = if let Some(error) = &self.error {
            (error.as_str(), Style::default().fg(Color::Red))
        } else if self.submitting {
            ("Saving...", Style::default().fg(Color::Yellow))
        } else {
            (
                "Name and email are required",
                Style::default().fg(Color::DarkGray),
            )
        };
        let message_area = Rect::new(layout.body.x, layout.body.y + 5, layout.body.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, style))),
            message_area,
        );
    }
}

/// Width of the label column, including the focus marker.
const LABEL_WIDTH: u16 = 9;

fn render_text_field(
    frame: &mut Frame,
    body: Rect,
    row: u16,
    label: &str,
    value: &str,
    focused: bool,
) {
    if row >= body.height {
        return;
    }
    let area = Rect::new(body.x, body.y + row, body.width, 1);

    let marker = if focused { "> " } else { "  " };
    let label_color = if focused { Color::Cyan } else { Color::DarkGray };
    let max_width = body.width.saturating_sub(LABEL_WIDTH + 1) as usize;
    let shown = truncate_start_with_ellipsis(value, max_width);

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{label:<7}"), Style::default().fg(label_color)),
        Span::styled(shown, Style::default().fg(Color::White)),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_field(frame: &mut Frame, body: Rect, row: u16, label: &str, focused: bool) {
    if row >= body.height {
        return;
    }
    let area = Rect::new(body.x, body.y + row, body.width, 1);

    let marker = if focused { "> " } else { "  " };
    let label_color = if focused { Color::Cyan } else { Color::DarkGray };
    let value_color = if focused { Color::Cyan } else { Color::White };

    let value = if focused {
        format!("◂ {label} ▸")
    } else {
        label.to_string()
    };
    let spans = vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:<7}", "Status"), Style::default().fg(label_color)),
        Span::styled(value, Style::default().fg(value_color)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
