//! Search overlay for the lead list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::{OverlayAction, OverlayUpdate};

/// State for the search overlay.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// The current input text.
    pub input: String,
}

impl SearchState {
    /// Opens the search overlay pre-filled with the active filter.
    pub fn open(current: &str) -> Self {
        Self {
            input: current.to_string(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') if key.code == KeyCode::Esc || ctrl => {
                OverlayUpdate::close()
            }
            // Empty input clears the filter
            KeyCode::Enter => OverlayUpdate::close()
                .with_action(OverlayAction::SetSearch(self.input.trim().to_string())),
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                OverlayUpdate::stay()
            }
            KeyCode::Backspace => {
                self.input.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn insert_text(&mut self, text: &str) {
        self.input.extend(text.chars().filter(|c| !c.is_control()));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        use super::render_utils::{
            InputHint, InputLine, OverlayConfig, render_input_line, render_overlay,
        };

        let hints = [
            InputHint::new("Enter", "apply"),
            InputHint::new("Ctrl+U", "clear"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Search Leads",
                border_color: Color::Cyan,
                width: 50,
                height: 5,
                hints: &hints,
            },
        );

        let input_area = Rect::new(layout.body.x, layout.body.y, layout.body.width, 1);
        render_input_line(
            frame,
            input_area,
            &InputLine {
                value: &self.input,
                placeholder: Some("Name, email or phone..."),
                prompt: "> ",
                prompt_color: Color::DarkGray,
                text_color: Color::Cyan,
                placeholder_color: Color::DarkGray,
                cursor_color: Color::Cyan,
            },
        );
    }
}
