//! Jump-to-page overlay for the lead list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use leadctl_core::pager::clamp_page;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{OverlayAction, OverlayUpdate};

/// Maximum digits accepted in the page input.
const MAX_DIGITS: usize = 6;

/// State for the jump-to-page overlay.
#[derive(Debug, Clone)]
pub struct JumpState {
    /// The current input text (digits only).
    pub input: String,
    /// Upper bound for valid pages.
    pub total_pages: u32,
    /// Error message to display (empty input).
    pub error: Option<String>,
}

impl JumpState {
    pub fn open(total_pages: u32) -> Self {
        Self {
            input: String::new(),
            total_pages,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Clear error on any input
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            // Out-of-range input is clamped, not rejected
            KeyCode::Enter => match self.input.parse::<u32>() {
                Ok(page) => OverlayUpdate::close()
                    .with_action(OverlayAction::JumpToPage(clamp_page(page, self.total_pages))),
                Err(_) => {
                    self.error = Some("Enter a page number".to_string());
                    OverlayUpdate::stay()
                }
            },
            KeyCode::Backspace => {
                self.input.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < MAX_DIGITS => {
                self.input.push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn insert_text(&mut self, text: &str) {
        for c in text.chars().filter(char::is_ascii_digit) {
            if self.input.len() >= MAX_DIGITS {
                break;
            }
            self.input.push(c);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        use super::render_utils::{
            InputHint, InputLine, OverlayConfig, render_input_line, render_overlay, render_separator,
        };

        let hints = [InputHint::new("Enter", "go"), InputHint::new("Esc", "cancel")];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Go to Page",
                border_color: Color::Cyan,
                width: 40,
                height: 7,
                hints: &hints,
            },
        );

        let input_area = Rect::new(layout.body.x, layout.body.y, layout.body.width, 1);
        render_input_line(
            frame,
            input_area,
            &InputLine {
                value: &self.input,
                placeholder: Some("Page number..."),
                prompt: "> ",
                prompt_color: Color::DarkGray,
                text_color: Color::Cyan,
                placeholder_color: Color::DarkGray,
                cursor_color: Color::Cyan,
            },
        );

        render_separator(frame, layout.body, 1);

        let (help_text, help_style) = if let Some(error) = &self.error {
            (error.clone(), Style::default().fg(Color::Red))
        } else {
            (
                format!("Pages 1-{}", self.total_pages),
                Style::default().fg(Color::DarkGray),
            )
        };
        let help_area = Rect::new(layout.body.x, layout.body.y + 2, layout.body.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(help_text, help_style))),
            help_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_only_digits_are_accepted() {
        let mut jump = JumpState::open(10);
        jump.handle_key(key(KeyCode::Char('a')));
        jump.handle_key(key(KeyCode::Char('4')));
        jump.handle_key(key(KeyCode::Char('-')));
        assert_eq!(jump.input, "4");
    }

    #[test]
    fn test_valid_page_submits_and_closes() {
        let mut jump = JumpState::open(10);
        jump.handle_key(key(KeyCode::Char('7')));

        let update = jump.handle_key(key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(matches!(update.action, Some(OverlayAction::JumpToPage(7))));
    }

    #[test]
    fn test_page_beyond_last_clamps_to_last() {
        let mut jump = JumpState::open(5);
        jump.handle_key(key(KeyCode::Char('9')));
        jump.handle_key(key(KeyCode::Char('9')));

        let update = jump.handle_key(key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(matches!(update.action, Some(OverlayAction::JumpToPage(5))));
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let mut jump = JumpState::open(5);
        jump.handle_key(key(KeyCode::Char('0')));

        let update = jump.handle_key(key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(matches!(update.action, Some(OverlayAction::JumpToPage(1))));
    }

    #[test]
    fn test_empty_input_shows_error() {
        let mut jump = JumpState::open(5);
        let update = jump.handle_key(key(KeyCode::Enter));
        assert!(matches!(update.transition, OverlayTransition::Stay));
        assert!(jump.error.is_some());
    }

    #[test]
    fn test_error_cleared_on_next_keypress() {
        let mut jump = JumpState::open(5);
        jump.handle_key(key(KeyCode::Enter));
        assert!(jump.error.is_some());

        jump.handle_key(key(KeyCode::Char('3')));
        assert!(jump.error.is_none());
    }

    #[test]
    fn test_paste_filters_non_digits() {
        let mut jump = JumpState::open(100);
        jump.insert_text("page 42!");
        assert_eq!(jump.input, "42");
    }
}
