use std::fmt;

use tracing::trace;

use crate::buffer::GrowBuffer;
use crate::error::Result;
use crate::word::{STRUCTURAL_SYMBOLS, Word};

// ============================================================================
// Character Sources
// ============================================================================

/// Pull-style byte source. `None` or a `0` byte ends the input.
pub trait CharSource {
    fn pull(&mut self) -> Option<u8>;
}

/// Adapts a closure into a [`CharSource`].
pub struct FnSource<F>(pub F);

impl<F> CharSource for FnSource<F>
where
    F: FnMut() -> Option<u8>,
{
    fn pull(&mut self) -> Option<u8> {
        (self.0)()
    }
}

/// A refillable source holding one line of input at a time.
#[derive(Debug)]
pub struct LineCursor {
    line: GrowBuffer,
    index: usize,
}

impl LineCursor {
    pub fn new() -> Result<Self> {
        Ok(LineCursor {
            line: GrowBuffer::new()?,
            index: 0,
        })
    }

    /// Replace the held text with `text` and rewind to its start.
    pub fn load(&mut self, text: &str) -> Result<()> {
        self.line.clear();
        self.index = 0;
        self.line.append(text.as_bytes())
    }
}

impl CharSource for LineCursor {
    fn pull(&mut self) -> Option<u8> {
        let byte = self.line.as_bytes().get(self.index).copied()?;
        self.index += 1;
        Some(byte)
    }
}

// ============================================================================
// Positions
// ============================================================================

/// A 1-based line and column in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Nothing read yet since creation or the last reset.
    Fresh,
    At(u8),
    End,
}

/// Splits a byte stream into [`Word`]s.
///
/// Words are whitespace-delimited, except that `[` and `]` are always words
/// of their own and end any word they interrupt.
pub struct Lexer<S> {
    source: S,
    lexeme: GrowBuffer,
    cursor: Cursor,
    line: usize,
    column: usize,
    token_start: Position,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Result<Self> {
        Ok(Lexer {
            source,
            lexeme: GrowBuffer::new()?,
            cursor: Cursor::Fresh,
            line: 1,
            column: 0,
            token_start: Position::default(),
        })
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Forget the current character so the next read pulls from the source
    /// again. Call after refilling the source.
    pub fn reset(&mut self) {
        self.cursor = Cursor::Fresh;
    }

    /// Where the lexer is now.
    pub fn location(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Where the most recent word began.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    /// The next word, or `None` once the source is exhausted.
    pub fn next_word(&mut self) -> Result<Option<Word>> {
        self.lexeme.clear();

        self.skip_whitespace();
        let Cursor::At(first) = self.cursor else {
            return Ok(None);
        };
        self.token_start = self.location();

        self.consume(first)?;
        if !is_stop(first) {
            while let Cursor::At(c) = self.cursor {
                if is_stop(c) {
                    break;
                }
                self.consume(c)?;
            }
        }

        self.lexeme.push(0)?;
        let word = Word::from_text(&self.lexeme.text());
        trace!(
            at = %self.token_start,
            kind = %word.kind(),
            text = %word,
            "lexeme"
        );
        Ok(Some(word))
    }

    fn advance(&mut self) {
        let next = match self.source.pull() {
            None | Some(0) => Cursor::End,
            Some(c) => Cursor::At(c),
        };

        if let Cursor::At(c) = next {
            if c == b'\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.cursor = next;
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.cursor {
                Cursor::Fresh => self.advance(),
                Cursor::At(c) if is_space(c) => self.advance(),
                _ => break,
            }
        }
    }

    fn consume(&mut self, c: u8) -> Result<()> {
        self.lexeme.push(c)?;
        self.advance();
        Ok(())
    }
}

impl<S: CharSource> Iterator for Lexer<S> {
    type Item = Result<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_word().transpose()
    }
}

/// Matches C `isspace`: ASCII whitespace plus vertical tab.
fn is_space(c: u8) -> bool {
    c.is_ascii_whitespace() || c == 0x0b
}

fn is_stop(c: u8) -> bool {
    is_space(c) || STRUCTURAL_SYMBOLS.iter().any(|&s| s as u32 == u32::from(c))
}
