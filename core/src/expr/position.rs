use std::fmt;

/// Zero-based character offset into the expression text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, derive_more::Deref, derive_more::From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharPos(pub usize);

impl std::ops::Add<usize> for CharPos {
    type Output = Self;
    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl fmt::Display for CharPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: CharPos,
    pub end: CharPos,
}

impl Span {
    pub fn new(start: impl Into<CharPos>, end: impl Into<CharPos>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Span a single position.
    pub fn at(position: impl Into<CharPos>) -> Self {
        let pos = position.into();
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Zero width span, used for the end of input.
    pub fn empty(position: impl Into<CharPos>) -> Self {
        let pos = position.into();
        Self {
            start: pos,
            end: pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

impl<T> WithSpan<T> {
    pub fn new(value: T, start: impl Into<CharPos>, end: impl Into<CharPos>) -> Self {
        Self {
            value,
            span: Span::new(start, end),
        }
    }

    /// Span a single position.
    pub fn at(value: T, pos: impl Into<CharPos>) -> Self {
        Self {
            value,
            span: Span::at(pos),
        }
    }

    /// Replace the value, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WithSpan<U> {
        WithSpan {
            value: f(self.value),
            span: self.span,
        }
    }
}

impl<T> fmt::Display for WithSpan<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.value, self.span.start)
    }
}

impl<T> std::error::Error for WithSpan<T> where T: fmt::Debug + fmt::Display {}
