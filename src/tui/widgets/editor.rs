use std::cmp;

/// Single-line text input with a character cursor and horizontal scrolling
#[derive(Debug, Clone, Default)]
pub struct Editor {
    chars: Vec<char>,
    pub cursor_col: usize,
    pub scroll_col: usize, // Horizontal scroll (column offset)
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(content: impl Into<String>) -> Self {
        // Only the first line is kept; the input is single-line
        let content = content.into();
        let chars: Vec<char> = content.lines().next().unwrap_or("").chars().collect();
        let cursor_col = chars.len();
        Self {
            chars,
            cursor_col,
            scroll_col: 0,
        }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor_col = 0;
        self.scroll_col = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let col = cmp::min(self.cursor_col, self.chars.len());
        self.chars.insert(col, ch);
        self.cursor_col = col + 1;
    }

    /// Delete the character before the cursor (Backspace)
    pub fn delete_char(&mut self) {
        let col = cmp::min(self.cursor_col, self.chars.len());
        if col > 0 {
            self.chars.remove(col - 1);
            self.cursor_col = col - 1;
        }
    }

    /// Delete the character under the cursor (Delete)
    pub fn delete_char_forward(&mut self) {
        if self.cursor_col < self.chars.len() {
            self.chars.remove(self.cursor_col);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.chars.len() {
            self.cursor_col += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.chars.len();
    }

    /// Move to the start of the previous word
    pub fn move_cursor_word_left(&mut self) {
        let mut col = cmp::min(self.cursor_col, self.chars.len());
        while col > 0 && self.chars[col - 1].is_whitespace() {
            col -= 1;
        }
        while col > 0 && !self.chars[col - 1].is_whitespace() {
            col -= 1;
        }
        self.cursor_col = col;
    }

    /// Move past the end of the next word
    pub fn move_cursor_word_right(&mut self) {
        let len = self.chars.len();
        let mut col = cmp::min(self.cursor_col, len);
        while col < len && self.chars[col].is_whitespace() {
            col += 1;
        }
        while col < len && !self.chars[col].is_whitespace() {
            col += 1;
        }
        self.cursor_col = col;
    }

    /// Keep the cursor inside a viewport `viewport_width` columns wide
    pub fn update_horizontal_scroll(&mut self, viewport_width: usize) {
        if viewport_width == 0 {
            return;
        }
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + viewport_width {
            self.scroll_col = self.cursor_col + 1 - viewport_width;
        }
    }

    /// The part of the text visible in the viewport
    pub fn visible_text(&self, viewport_width: usize) -> String {
        self.chars
            .iter()
            .skip(self.scroll_col)
            .take(viewport_width)
            .collect()
    }

    /// Cursor column relative to the viewport
    pub fn cursor_offset(&self) -> usize {
        self.cursor_col.saturating_sub(self.scroll_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_at_cursor() {
        let mut editor = Editor::from_string("milk");
        editor.move_cursor_home();
        for ch in "Buy ".chars() {
            editor.insert_char(ch);
        }
        assert_eq!(editor.value(), "Buy milk");

        editor.move_cursor_end();
        editor.delete_char();
        assert_eq!(editor.value(), "Buy mil");
        assert_eq!(editor.cursor_col, 7);
    }

    #[test]
    fn newlines_are_ignored() {
        let mut editor = Editor::new();
        editor.insert_char('a');
        editor.insert_char('\n');
        assert_eq!(editor.value(), "a");
        assert_eq!(Editor::from_string("one\ntwo").value(), "one");
    }

    #[test]
    fn multibyte_characters_count_as_one_column() {
        let mut editor = Editor::from_string("café");
        assert_eq!(editor.len(), 4);
        editor.delete_char();
        assert_eq!(editor.value(), "caf");
    }

    #[test]
    fn word_navigation() {
        let mut editor = Editor::from_string("call the bank");
        editor.move_cursor_word_left();
        assert_eq!(editor.cursor_col, 9);
        editor.move_cursor_word_left();
        assert_eq!(editor.cursor_col, 5);
        editor.move_cursor_word_right();
        assert_eq!(editor.cursor_col, 8);
    }

    #[test]
    fn horizontal_scroll_follows_cursor() {
        let mut editor = Editor::from_string("abcdefghij");
        editor.update_horizontal_scroll(4);
        assert_eq!(editor.scroll_col, 7);
        assert_eq!(editor.visible_text(4), "hij");
        assert_eq!(editor.cursor_offset(), 3);

        editor.move_cursor_home();
        editor.update_horizontal_scroll(4);
        assert_eq!(editor.scroll_col, 0);
        assert_eq!(editor.visible_text(4), "abcd");
    }
}
