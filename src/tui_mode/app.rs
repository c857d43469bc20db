use eazicalc::{HistoryStore, Outcome, Session};

/// What a key press or wheel turn asks the calculator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    Delete,
    Cursor(i32),
    CursorWord(i32),
    Home,
    End,
    Recall(i32),
    RecallPage(i32),
    ScrollHistory(i32),
    ScrollHelp(i32),
    Submit,
    ClearInput,
    OpenHelp,
    CloseHelp,
    Quit,
}

pub struct App {
    pub session: Session,
    store: Option<HistoryStore>,
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
}

impl App {
    pub fn new(session: Session, store: Option<HistoryStore>) -> Self {
        let cursor_history = session.history().len().saturating_sub(1);
        App {
            session,
            store,
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            cursor_history,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: true,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Insert(c) => self.insert_char(c),
            Action::Backspace => self.delete_before_cursor(),
            Action::Delete => self.delete_at_cursor(),
            Action::Cursor(direction) => self.move_cursor(direction),
            Action::CursorWord(direction) => self.move_cursor_by_words(direction),
            Action::Home => {
                self.cursor_position = 0;
                self.input_scroll = 0;
            }
            Action::End => self.cursor_position = self.input.chars().count(),
            Action::Recall(direction) => self.navigate_history(direction),
            Action::RecallPage(direction) => self.scroll_history(direction),
            Action::ScrollHistory(lines) => {
                self.history_scroll = offset_by(self.history_scroll, lines);
            }
            Action::ScrollHelp(lines) => self.help_scroll = offset_by(self.help_scroll, lines),
            Action::Submit => self.submit(),
            Action::ClearInput => self.clear_input(),
            Action::OpenHelp => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            Action::CloseHelp => {
                self.show_help = false;
                self.help_scroll = 0;
            }
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        } else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total_chars.saturating_sub(visible_width) {
            self.input_scroll = total_chars.saturating_sub(visible_width);
        }
    }

    pub fn submit(&mut self) {
        match self.session.submit(&self.input) {
            Outcome::Ignored => return,
            Outcome::Quit => {
                self.should_quit = true;
                return;
            }
            Outcome::Help => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            Outcome::Cleared => {
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.persist();
            }
            Outcome::Evaluated { index } => {
                self.cursor_history = index;
                self.scroll_to_bottom = true;
                self.persist();
            }
        }
        self.clear_input();
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            store.sync(&self.session);
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let input_chars: Vec<char> = self.input.chars().collect();
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && !is_word_char(input_chars[pos - 1]) {
                pos -= 1;
            }
            while pos > 0 && is_word_char(input_chars[pos - 1]) {
                pos -= 1;
            }
        } else {
            let len = input_chars.len();
            while pos < len && is_word_char(input_chars[pos]) {
                pos += 1;
            }
            while pos < len && !is_word_char(input_chars[pos]) {
                pos += 1;
            }
        }

        self.cursor_position = pos.min(input_chars.len());
    }

    /// Walks through the history, loading successful entries into the input.
    pub fn navigate_history(&mut self, direction: i32) {
        let len = self.session.history().len();
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < len.saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.load_selected();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.session.history().len().saturating_sub(1));
        }
        self.load_selected();
    }

    fn load_selected(&mut self) {
        match self.session.recall(self.cursor_history) {
            Some(input) => self.input = input.to_string(),
            None => self.input.clear(),
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_at_cursor();
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let byte_idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        if let Some(c) = self.input[byte_idx..].chars().next() {
            self.input.drain(byte_idx..byte_idx + c.len_utf8());
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    }
}

fn offset_by(value: usize, delta: i32) -> usize {
    if delta < 0 {
        value.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        value.saturating_add(delta as usize)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == 'x'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn submit_evaluates_and_clears_input() {
        let mut app = App::new(Session::new(), None);
        typed(&mut app, "2(3+4)");
        app.submit();
        assert!(app.input.is_empty());
        assert_eq!(app.session.last_result(), Some(14.0));
        assert_eq!(app.cursor_history, 0);
    }

    #[test]
    fn history_navigation_recalls_successful_input() {
        let mut app = App::new(Session::new(), None);
        typed(&mut app, "1+1");
        app.submit();
        typed(&mut app, "1+");
        app.submit();
        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        assert_eq!(app.cursor_position, 3);
        app.navigate_history(1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn editing_handles_multibyte_glyphs() {
        let mut app = App::new(Session::new(), None);
        typed(&mut app, "6×2");
        app.move_cursor(-1);
        app.delete_before_cursor();
        assert_eq!(app.input, "62");
        assert_eq!(app.cursor_position, 1);
    }

    #[test]
    fn word_moves_skip_numbers() {
        let mut app = App::new(Session::new(), None);
        typed(&mut app, "12+345");
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 3);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 0);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 3);
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = App::new(Session::new(), None);
        typed(&mut app, "help");
        app.apply(Action::Submit);
        assert!(app.show_help);
        assert!(app.input.is_empty());
        app.apply(Action::ScrollHelp(5));
        app.apply(Action::ScrollHelp(-9));
        assert_eq!(app.help_scroll, 0);
        app.apply(Action::CloseHelp);
        assert!(!app.show_help);
    }

    #[test]
    fn actions_edit_input() {
        let mut app = App::new(Session::new(), None);
        for c in "1+23".chars() {
            app.apply(Action::Insert(c));
        }
        app.apply(Action::Home);
        app.apply(Action::Delete);
        app.apply(Action::End);
        app.apply(Action::Backspace);
        assert_eq!(app.input, "+2");
        app.apply(Action::ClearInput);
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn quit_command_sets_flag() {
        let mut app = App::new(Session::new(), None);
        typed(&mut app, "quit");
        app.submit();
        assert!(app.should_quit);
    }
}
