//! Minimal multi-line buffer backing the editor pane.
//!
//! The buffer is the source of truth for submissions: `text()` returns the
//! contents verbatim, including literal tab characters. Tabs are only
//! expanded for display.

const TAB_DISPLAY_WIDTH: usize = 4;

pub struct Editor {
    lines: Vec<String>,
    row: usize,
    // Char index within the current line, not a byte offset.
    col: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer contents exactly as they will be submitted.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn line_chars(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = Self::byte_index(&self.lines[self.row], self.col);
        self.lines[self.row].insert(idx, c);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        let idx = Self::byte_index(&self.lines[self.row], self.col);
        let rest = self.lines[self.row].split_off(idx);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let idx = Self::byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].remove(idx);
        } else if self.row > 0 {
            let removed = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_chars();
            self.lines[self.row].push_str(&removed);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_chars() {
            let idx = Self::byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].remove(idx);
        } else if self.row + 1 < self.lines.len() {
            let removed = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&removed);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_chars();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_chars() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_chars());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_chars());
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_chars();
    }

    /// A line with tabs expanded for display.
    pub fn display_line(line: &str) -> String {
        line.replace('\t', &" ".repeat(TAB_DISPLAY_WIDTH))
    }

    /// Cursor column in display cells, accounting for tab expansion.
    pub fn display_col(&self) -> usize {
        self.lines[self.row]
            .chars()
            .take(self.col)
            .map(|c| if c == '\t' { TAB_DISPLAY_WIDTH } else { 1 })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(ed: &mut Editor, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                ed.insert_newline();
            } else {
                ed.insert_char(c);
            }
        }
    }

    #[test]
    fn typed_text_round_trips_verbatim() {
        let mut ed = Editor::new();
        type_str(&mut ed, "a: str = 'hey';\n\tprint(a);");
        assert_eq!(ed.text(), "a: str = 'hey';\n\tprint(a);");
    }

    #[test]
    fn tab_inserts_a_literal_tab() {
        let mut ed = Editor::new();
        ed.insert_char('\t');
        ed.insert_char('x');
        assert_eq!(ed.text(), "\tx");
        assert_eq!(Editor::display_line("\tx"), "    x");
        assert_eq!(ed.display_col(), 5);
    }

    #[test]
    fn backspace_joins_lines_at_start_of_line() {
        let mut ed = Editor::new();
        type_str(&mut ed, "ab\ncd");
        ed.move_home();
        ed.backspace();
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.cursor(), (0, 2));
    }

    #[test]
    fn delete_joins_lines_at_end_of_line() {
        let mut ed = Editor::new();
        type_str(&mut ed, "ab\ncd");
        ed.move_up();
        ed.move_end();
        ed.delete();
        assert_eq!(ed.text(), "abcd");
    }

    #[test]
    fn newline_splits_the_current_line() {
        let mut ed = Editor::new();
        type_str(&mut ed, "abcd");
        ed.move_left();
        ed.move_left();
        ed.insert_newline();
        assert_eq!(ed.text(), "ab\ncd");
        assert_eq!(ed.cursor(), (1, 0));
    }

    #[test]
    fn vertical_moves_clamp_the_column() {
        let mut ed = Editor::new();
        type_str(&mut ed, "long line\nab");
        assert_eq!(ed.cursor(), (1, 2));
        ed.move_up();
        assert_eq!(ed.cursor(), (0, 2));
        ed.move_end();
        ed.move_down();
        assert_eq!(ed.cursor(), (1, 2));
    }

    #[test]
    fn multibyte_chars_edit_on_char_boundaries() {
        let mut ed = Editor::new();
        type_str(&mut ed, "héllo");
        ed.backspace();
        ed.backspace();
        assert_eq!(ed.text(), "hél");
        ed.backspace();
        assert_eq!(ed.text(), "hé");
    }
}
