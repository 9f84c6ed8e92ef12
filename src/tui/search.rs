use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Cursor for the search box. The text itself lives in the
/// dashboard state; edits are applied to a copy and handed back.
#[derive(Default)]
pub struct SearchInput {
    /// Byte offset into the text, always on a char boundary
    pub cursor_pos: usize,
}

impl SearchInput {
    /// Apply an editing key to `text`. Returns true when the text changed.
    pub fn edit(&mut self, text: &mut String, key: KeyEvent) -> bool {
        self.clamp(text);
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                text.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
                true
            }
            KeyCode::Backspace => {
                if self.cursor_pos == 0 {
                    return false;
                }
                let prev = prev_boundary(text, self.cursor_pos);
                text.remove(prev);
                self.cursor_pos = prev;
                true
            }
            KeyCode::Delete => {
                if self.cursor_pos < text.len() {
                    text.remove(self.cursor_pos);
                    true
                } else {
                    false
                }
            }
            KeyCode::Left => {
                self.cursor_pos = prev_boundary(text, self.cursor_pos);
                false
            }
            KeyCode::Right => {
                self.cursor_pos = next_boundary(text, self.cursor_pos);
                false
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                false
            }
            KeyCode::End => {
                self.cursor_pos = text.len();
                false
            }
            _ => false,
        }
    }

    pub fn cursor_to_end(&mut self, text: &str) {
        self.cursor_pos = text.len();
    }

    /// Keep the cursor valid after the text was replaced from elsewhere
    pub fn clamp(&mut self, text: &str) {
        if self.cursor_pos > text.len() {
            self.cursor_pos = text.len();
        }
        while !text.is_char_boundary(self.cursor_pos) {
            self.cursor_pos -= 1;
        }
    }

    /// Display columns between the start of `text` and the cursor
    pub fn cursor_column(&self, text: &str) -> u16 {
        let end = self.cursor_pos.min(text.len());
        let prefix = text.get(..end).unwrap_or(text);
        UnicodeWidthStr::width(prefix) as u16
    }
}

fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_boundary(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut SearchInput, text: &mut String, s: &str) {
        for c in s.chars() {
            input.edit(text, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_backspace_respect_char_boundaries() {
        let mut input = SearchInput::default();
        let mut text = String::new();
        type_str(&mut input, &mut text, "Rüe");
        assert_eq!(text, "Rüe");
        assert_eq!(input.cursor_pos, text.len());

        input.edit(&mut text, key(KeyCode::Left));
        assert!(input.edit(&mut text, key(KeyCode::Backspace)));
        assert_eq!(text, "Re");
        assert_eq!(input.cursor_pos, 1);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut input = SearchInput::default();
        let mut text = String::from("Main");
        input.cursor_to_end(&text);
        input.edit(&mut text, key(KeyCode::Home));
        type_str(&mut input, &mut text, "12 ");
        assert_eq!(text, "12 Main");

        input.edit(&mut text, key(KeyCode::End));
        assert!(!input.edit(&mut text, key(KeyCode::Delete)));
        assert!(!input.edit(&mut text, key(KeyCode::Right)));
        assert_eq!(input.cursor_pos, text.len());
    }

    #[test]
    fn control_chars_are_not_inserted() {
        let mut input = SearchInput::default();
        let mut text = String::new();
        let changed = input.edit(
            &mut text,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert!(!changed);
        assert!(text.is_empty());
    }

    #[test]
    fn clamp_after_external_replace() {
        let mut input = SearchInput::default();
        let mut text = String::from("125 Main St");
        input.cursor_to_end(&text);
        text = String::from("é");
        input.clamp(&text);
        assert_eq!(input.cursor_pos, 2);
        assert_eq!(input.cursor_column(&text), 1);
    }
}
