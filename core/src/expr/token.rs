use super::position::{CharPos, Span};

/// Kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    #[display("end of input")]
    EndOfInput,
    #[display("number")]
    Number,
    #[display("identifier")]
    Identifier,
    #[display("`+`")]
    Plus,
    #[display("`-`")]
    Minus,
    #[display("`*`")]
    Star,
    #[display("`/`")]
    SlashForward,
    #[display("`(`")]
    ParenLeft,
    #[display("`)`")]
    ParenRight,
    #[display("`!`")]
    Bang,
    #[display("`^`")]
    Caret,
    #[display("`,`")]
    Comma,
}

impl Kind {
    /// Kind of a single character token.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Star),
            '/' => Some(Self::SlashForward),
            '(' => Some(Self::ParenLeft),
            ')' => Some(Self::ParenRight),
            '!' => Some(Self::Bang),
            '^' => Some(Self::Caret),
            ',' => Some(Self::Comma),
            _ => None,
        }
    }

    /// If a token of this kind can begin a primary expression.
    pub fn starts_primary(&self) -> bool {
        matches!(self, Self::Number | Self::Identifier | Self::ParenLeft)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,

    /// Offset of the first character of the token.
    pub pos: CharPos,

    /// Source text of the token.
    /// `None` for [`Kind::EndOfInput`].
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: Kind, pos: impl Into<CharPos>, text: impl Into<String>) -> Self {
        Self {
            kind,
            pos: pos.into(),
            text: Some(text.into()),
        }
    }

    pub fn end_of_input(pos: impl Into<CharPos>) -> Self {
        Self {
            kind: Kind::EndOfInput,
            pos: pos.into(),
            text: None,
        }
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Offset one past the last character of the token.
    pub fn end(&self) -> CharPos {
        self.pos + self.text().chars().count()
    }

    pub fn span(&self) -> Span {
        Span::new(self.pos, self.end())
    }
}
