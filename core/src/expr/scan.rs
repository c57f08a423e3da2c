use super::position::CharPos;

/// Single character cursor over the source text.
///
/// Positions can be saved with [`Scanner::push`] and restored with
/// [`Scanner::pop`], allowing any amount of read-ahead.
pub struct Scanner {
    /// Source characters.
    src: Vec<char>,

    /// Cursor position, always in `0..=src.len()`.
    pos: usize,

    /// Saved cursor positions.
    saved: Vec<usize>,
}

impl Scanner {
    pub fn new(src: impl AsRef<str>) -> Self {
        Self {
            src: src.as_ref().chars().collect(),
            pos: 0,
            saved: vec![],
        }
    }

    pub fn pos(&self) -> CharPos {
        CharPos(self.pos)
    }

    /// If the cursor has reached the end of the source.
    pub fn end_of_source(&self) -> bool {
        self.pos >= self.src.len()
    }
}

impl Scanner {
    /// Read the character at the cursor and advance.
    /// `None` once the end of the source is reached, the cursor does not move past it.
    pub fn read(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(?ch, pos = self.pos);

        self.pos += 1;
        Some(ch)
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        self.push();
        let ch = self.read();
        self.pop();
        ch
    }

    /// Save the current position.
    pub fn push(&mut self) {
        self.saved.push(self.pos);
    }

    /// Restore the last saved position.
    ///
    /// # Panics
    /// In debug builds, if there is no saved position.
    pub fn pop(&mut self) {
        let pos = self.saved.pop();
        debug_assert!(pos.is_some(), "unbalanced scanner push/pop");
        if let Some(pos) = pos {
            self.pos = pos;
        }
    }

    /// Consume the next character if it matches the predicate.
    pub fn next_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if predicate(ch) => self.read(),
            _ => None,
        }
    }

    /// Consume characters while they match the predicate.
    pub fn next_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut chars = String::new();
        while let Some(ch) = self.next_if(&predicate) {
            chars.push(ch);
        }
        chars
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SRC: &str = "1 + 2 - 3 * 4 / 5";

    #[test]
    fn scanner_read() {
        let mut scanner = Scanner::new(SRC);
        assert!(!scanner.end_of_source());
        assert_eq!(scanner.pos(), CharPos(0));

        for ch in SRC.chars() {
            assert_eq!(scanner.read(), Some(ch));
        }
        assert!(scanner.end_of_source());
        assert_eq!(scanner.pos(), CharPos(SRC.len()));
    }

    #[test]
    fn scanner_read_past_end() {
        let mut scanner = Scanner::new(SRC);
        while !scanner.end_of_source() {
            scanner.read();
        }
        assert_eq!(scanner.read(), None);
        assert_eq!(scanner.read(), None);
        assert_eq!(scanner.pos(), CharPos(SRC.len()));
        assert_eq!(scanner.peek(), None);
    }

    #[test]
    fn scanner_peek() {
        let mut scanner = Scanner::new(SRC);
        assert_eq!(scanner.peek(), Some('1'));
        assert_eq!(scanner.pos(), CharPos(0));
        assert_eq!(scanner.read(), Some('1'));
        assert_eq!(scanner.pos(), CharPos(1));
        assert!(!scanner.end_of_source());
    }

    #[test]
    fn scanner_push_pop() {
        let mut scanner = Scanner::new(SRC);
        scanner.push();
        for ch in SRC.chars() {
            assert_eq!(scanner.read(), Some(ch));
        }
        assert!(scanner.end_of_source());

        scanner.pop();
        assert!(!scanner.end_of_source());
        assert_eq!(scanner.pos(), CharPos(0));

        // nested
        scanner.read();
        scanner.push();
        scanner.read();
        scanner.push();
        scanner.read();
        assert_eq!(scanner.pos(), CharPos(3));
        scanner.pop();
        assert_eq!(scanner.pos(), CharPos(2));
        scanner.pop();
        assert_eq!(scanner.pos(), CharPos(1));
    }

    #[test]
    fn scanner_next_while() {
        let mut scanner = Scanner::new("123abc");
        assert_eq!(scanner.next_while(|ch| ch.is_ascii_digit()), "123");
        assert_eq!(scanner.next_while(|ch| ch.is_ascii_digit()), "");
        assert_eq!(scanner.pos(), CharPos(3));
        assert_eq!(scanner.next_if(|ch| ch == 'a'), Some('a'));
        assert_eq!(scanner.next_if(|ch| ch == 'a'), None);
    }

    #[test]
    fn scanner_unicode_positions() {
        let mut scanner = Scanner::new("π1");
        assert_eq!(scanner.read(), Some('π'));
        assert_eq!(scanner.pos(), CharPos(1));
    }
}
