//! Single-line query input built on tui-textarea.
//!
//! Enter and Ctrl+M never insert a newline; callers use Enter to commit the
//! highlighted suggestion instead.

use crate::theme::Theme;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tui_textarea::{Input, Key, TextArea};

pub struct QueryInput<'a> {
    textarea: TextArea<'a>,
    placeholder: String,
}

impl<'a> QueryInput<'a> {
    pub fn new(initial_text: impl Into<String>) -> Self {
        Self {
            textarea: single_line(initial_text.into()),
            placeholder: String::new(),
        }
    }

    /// Shown dimmed while the input is empty.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Feed a key. Returns `true` when the text changed.
    pub fn input(&mut self, input: impl Into<Input>) -> bool {
        let input = input.into();
        match input {
            Input {
                key: Key::Char('m'),
                ctrl: true,
                alt: false,
                ..
            }
            | Input {
                key: Key::Enter, ..
            } => false,
            _ => {
                let before = self.text().to_string();
                self.textarea.input(input);
                before != self.text()
            }
        }
    }

    pub fn text(&self) -> &str {
        self.textarea.lines()[0].as_str()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.textarea = single_line(text.into());
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, block: Block<'a>, theme: &Theme) {
        if self.text().is_empty() && !self.placeholder.is_empty() {
            let placeholder = Paragraph::new(self.placeholder.as_str())
                .style(theme.empty_style())
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }
        let mut textarea = self.textarea.clone();
        textarea.set_block(block);
        textarea.set_style(theme.prompt_style());
        frame.render_widget(&textarea, area);
    }
}

impl Default for QueryInput<'_> {
    fn default() -> Self {
        Self::new("")
    }
}

fn single_line<'a>(text: String) -> TextArea<'a> {
    let text = text.replace(['\n', '\r'], " ");
    let mut textarea = TextArea::new(vec![text]);
    textarea.remove_line_number();
    textarea.move_cursor(tui_textarea::CursorMove::End);
    textarea
}
