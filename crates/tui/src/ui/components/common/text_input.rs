//! UTF-8 safe single-line input state backing the search box.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    input: String,
    /// Byte index into `input`, always on a char boundary.
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position in chars, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.input[..self.cursor].chars().count()
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= previous.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Removes the char before the cursor. Returns whether the text changed.
    pub fn backspace(&mut self) -> bool {
        let Some(previous) = self.input[..self.cursor].chars().next_back() else {
            return false;
        };
        let start = self.cursor - previous.len_utf8();
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Removes the char under the cursor. Returns whether the text changed.
    pub fn delete(&mut self) -> bool {
        let Some(next) = self.input[self.cursor..].chars().next() else {
            return false;
        };
        self.input.drain(self.cursor..self.cursor + next.len_utf8());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_respect_multibyte_chars() {
        let mut search = TextInputState::new();
        for c in "kepler-ß2".chars() {
            search.insert_char(c);
        }
        search.move_left();
        search.move_left();
        assert_eq!(search.cursor_column(), 7);
        assert!(search.backspace());
        assert_eq!(search.input(), "keplerß2");
        search.move_home();
        assert!(search.delete());
        assert_eq!(search.input(), "eplerß2");
        search.move_end();
        assert!(!search.delete());
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut search = TextInputState::new();
        assert!(!search.backspace());
        search.insert_char('a');
        search.move_left();
        assert!(!search.backspace());
        assert_eq!(search.input(), "a");
    }
}
