use super::{
    position::{CharPos, WithSpan},
    scan::Scanner,
    token::{self, Token},
};

/// Tokenize the entire input.
/// The final token is always [`token::Kind::EndOfInput`].
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all, fields(src = %src.as_ref())))]
pub fn tokenize(src: impl AsRef<str>) -> Result<Vec<Token>, WithSpan<error::Kind>> {
    let mut lexer = Lexer::new(src.as_ref());
    let mut tokens = vec![];
    loop {
        let token = lexer.read_next()?;
        let end = token.is(token::Kind::EndOfInput);
        tokens.push(token);
        if end {
            return Ok(tokens);
        }
    }
}

/// Produces tokens on demand from a [`Scanner`].
pub struct Lexer {
    it: Scanner,
}

impl Lexer {
    pub fn new(src: impl AsRef<str>) -> Self {
        Self {
            it: Scanner::new(src),
        }
    }

    /// Current position of the underlying scanner.
    pub fn pos(&self) -> CharPos {
        self.it.pos()
    }

    /// Consume and return the next token.
    /// Once the input is exhausted every call returns an end of input token.
    pub fn read_next(&mut self) -> Result<Token, WithSpan<error::Kind>> {
        self.it.next_while(char::is_whitespace);
        let pos_start = self.it.pos();
        let Some(ch) = self.it.peek() else {
            return Ok(Token::end_of_input(pos_start));
        };

        let token = if let Some(kind) = token::Kind::from_char(ch) {
            self.it.read();
            Token::new(kind, pos_start, ch)
        } else if ch.is_ascii_digit() || ch == DECIMAL_SEPARATOR {
            self.number()?
        } else if is_ident_start(ch) {
            let value = self.it.next_while(is_ident_char);
            Token::new(token::Kind::Identifier, pos_start, value)
        } else {
            return Err(WithSpan::at(
                error::Kind::UnrecognizedCharacter { character: ch },
                pos_start,
            ));
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(?token);

        Ok(token)
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token, WithSpan<error::Kind>> {
        self.it.push();
        let token = self.read_next();
        self.it.pop();
        token
    }
}

const DECIMAL_SEPARATOR: char = '.';

/// Valid first characters of an identifier are alphabetic (`a-z`, `A-Z`) and underscore (`_`).
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Identifiers continue with alphanumerics (`a-z`, `A-Z`, `0-9`) and underscore (`_`).
fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

impl Lexer {
    /// Scan a number of the form `\d* (\.\d*)? ([eE][+-]?\d+)?`.
    /// e.g. `1`, `100`, `1.5`, `.5`, `1e5`, `.1e5`, `1e-5`.
    fn number(&mut self) -> Result<Token, WithSpan<error::Kind>> {
        let pos_start = self.it.pos();
        let mut value = self.it.next_while(|ch| ch.is_ascii_digit());
        if let Some(ch) = self.it.next_if(|ch| ch == DECIMAL_SEPARATOR) {
            value.push(ch);
            value.push_str(&self.it.next_while(|ch| ch.is_ascii_digit()));
        }

        let ends_in_digit = value.chars().last().is_some_and(|ch| ch.is_ascii_digit());
        if ends_in_digit {
            if let Some(e) = self.it.next_if(|ch| ch == 'e' || ch == 'E') {
                value.push(e);
                if let Some(sign) = self.it.next_if(|ch| ch == '+' || ch == '-') {
                    value.push(sign);
                }

                let exponent = self.it.next_while(|ch| ch.is_ascii_digit());
                if exponent.is_empty() {
                    return Err(WithSpan::new(
                        error::Kind::MalformedNumber { text: value },
                        pos_start,
                        self.it.pos(),
                    ));
                }
                value.push_str(&exponent);
            }
        }

        if value.parse::<f64>().is_err() {
            return Err(WithSpan::new(
                error::Kind::MalformedNumber { text: value },
                pos_start,
                self.it.pos(),
            ));
        }

        Ok(Token::new(token::Kind::Number, pos_start, value))
    }
}

pub mod error {
    #[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// A character that does not begin any token.
        #[display("unrecognized character `{character}`")]
        UnrecognizedCharacter { character: char },

        /// Scanned text is not a valid number.
        /// e.g. `.`, `1e`, `2e+`
        #[display("malformed number `{text}`")]
        MalformedNumber { text: String },
    }

    impl std::error::Error for Kind {}
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::position::Span;

    fn assert_tokens(src: &str, expected: &[(token::Kind, usize, Option<&str>)]) {
        let mut lexer = Lexer::new(src);
        for (kind, pos, text) in expected {
            let token = lexer.read_next().expect("input to be valid");
            assert_eq!(token.kind, *kind);
            assert_eq!(token.pos, CharPos(*pos));
            assert_eq!(token.text.as_deref(), *text);
        }
    }

    #[test]
    fn tokenize_empty() {
        let tokens = tokenize("").expect("input to be valid");
        assert_eq!(tokens, vec![Token::end_of_input(0)]);

        let tokens = tokenize(" \t\r\n").expect("input to be valid");
        assert_eq!(tokens, vec![Token::end_of_input(4)]);
    }

    #[test]
    fn tokenize_simple_expression() {
        use token::Kind;
        assert_tokens(
            "1 + 2 - 3 * 4 / 5",
            &[
                (Kind::Number, 0, Some("1")),
                (Kind::Plus, 2, Some("+")),
                (Kind::Number, 4, Some("2")),
                (Kind::Minus, 6, Some("-")),
                (Kind::Number, 8, Some("3")),
                (Kind::Star, 10, Some("*")),
                (Kind::Number, 12, Some("4")),
                (Kind::SlashForward, 14, Some("/")),
                (Kind::Number, 16, Some("5")),
                (Kind::EndOfInput, 17, None),
            ],
        );
    }

    #[test]
    fn tokenize_simple_expression_no_spaces() {
        use token::Kind;
        assert_tokens(
            "1+2-3*4/5",
            &[
                (Kind::Number, 0, Some("1")),
                (Kind::Plus, 1, Some("+")),
                (Kind::Number, 2, Some("2")),
                (Kind::Minus, 3, Some("-")),
                (Kind::Number, 4, Some("3")),
                (Kind::Star, 5, Some("*")),
                (Kind::Number, 6, Some("4")),
                (Kind::SlashForward, 7, Some("/")),
                (Kind::Number, 8, Some("5")),
                (Kind::EndOfInput, 9, None),
            ],
        );
    }

    #[test]
    fn tokenize_end_of_input_repeats() {
        let mut lexer = Lexer::new("1 ");
        assert!(lexer.read_next().unwrap().is(token::Kind::Number));
        for _ in 0..3 {
            let token = lexer.read_next().unwrap();
            assert_eq!(token, Token::end_of_input(2));
        }
    }

    #[test]
    fn tokenize_single_char_tokens() {
        use token::Kind;
        assert_tokens(
            "()!^,",
            &[
                (Kind::ParenLeft, 0, Some("(")),
                (Kind::ParenRight, 1, Some(")")),
                (Kind::Bang, 2, Some("!")),
                (Kind::Caret, 3, Some("^")),
                (Kind::Comma, 4, Some(",")),
                (Kind::EndOfInput, 5, None),
            ],
        );
    }

    #[test]
    fn tokenize_number() {
        for src in ["100", "1.5", ".5", "1e5", "1E5", ".1e5", "1e-5", "2.5e+3", "1."] {
            let tokens = tokenize(src).expect("input to be valid");
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[0], Token::new(token::Kind::Number, 0, src));
        }
    }

    #[test]
    fn tokenize_number_malformed() {
        let err = tokenize(".").expect_err("input should be invalid");
        assert_eq!(
            err.value,
            error::Kind::MalformedNumber {
                text: ".".to_string()
            }
        );
        assert_eq!(err.span, Span::new(0, 1));

        let err = tokenize("1 + 2e").expect_err("input should be invalid");
        assert_eq!(
            err.value,
            error::Kind::MalformedNumber {
                text: "2e".to_string()
            }
        );
        assert_eq!(err.span.start, CharPos(4));

        let err = tokenize("2e+").expect_err("input should be invalid");
        assert!(matches!(err.value, error::Kind::MalformedNumber { .. }));

        let err = tokenize("3E-x").expect_err("input should be invalid");
        assert!(matches!(err.value, error::Kind::MalformedNumber { .. }));
    }

    #[test]
    fn tokenize_multiple_radix_points() {
        // the second radix point begins a new number
        let tokens = tokenize("1.2.3").expect("input to be valid");
        assert_eq!(tokens[0], Token::new(token::Kind::Number, 0, "1.2"));
        assert_eq!(tokens[1], Token::new(token::Kind::Number, 3, ".3"));
    }

    #[test]
    fn tokenize_ident() {
        for src in ["a", "a_b", "_x", "x2", "Good_Func_1"] {
            let tokens = tokenize(src).expect("input to be valid");
            assert_eq!(tokens[0], Token::new(token::Kind::Identifier, 0, src));
            assert_eq!(tokens[1], Token::end_of_input(src.len()));
        }
    }

    #[test]
    fn tokenize_implicit_multiplication() {
        use token::Kind;
        assert_tokens(
            "2x(y)",
            &[
                (Kind::Number, 0, Some("2")),
                (Kind::Identifier, 1, Some("x")),
                (Kind::ParenLeft, 2, Some("(")),
                (Kind::Identifier, 3, Some("y")),
                (Kind::ParenRight, 4, Some(")")),
                (Kind::EndOfInput, 5, None),
            ],
        );
    }

    #[test]
    fn tokenize_unrecognized_character() {
        let err = tokenize("1 + $").expect_err("input should be invalid");
        assert_eq!(
            err.value,
            error::Kind::UnrecognizedCharacter { character: '$' }
        );
        assert_eq!(err.span, Span::at(4));
    }

    #[test]
    fn lexer_peek() {
        let mut lexer = Lexer::new("12 + x");
        let peeked = lexer.peek().unwrap();
        assert_eq!(peeked, Token::new(token::Kind::Number, 0, "12"));
        assert_eq!(lexer.pos(), CharPos(0));
        assert_eq!(lexer.peek().unwrap(), peeked);
        assert_eq!(lexer.read_next().unwrap(), peeked);
        assert_eq!(
            lexer.peek().unwrap(),
            Token::new(token::Kind::Plus, 3, "+")
        );
        assert_eq!(lexer.pos(), CharPos(2));
    }

    #[test]
    fn lexer_peek_error_restores_position() {
        let mut lexer = Lexer::new("1 #");
        lexer.read_next().unwrap();
        let pos = lexer.pos();
        assert!(lexer.peek().is_err());
        assert_eq!(lexer.pos(), pos);
    }
}
