//! Tree builder
//!
//! A [`Reader`] pulls one unit of input (a line) from a [`LineSource`], lexes
//! it, and folds the words into a [`Node`] tree. An unclosed `[` asks the
//! line source for continuation lines until the bracket closes.
//!
//! Bracket imbalance never fails a read. Instead:
//! - a `]` with no open `[` is skipped and reported as
//!   [`SyntaxWarning::UnexpectedClose`];
//! - running out of input inside a `[` closes every open list as-is and
//!   reports [`SyntaxWarning::UnclosedOpen`] for the innermost one.

use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;
use std::mem;

use tracing::{debug, warn};

use crate::error::Result;
use crate::lexer::{Lexer, LineCursor, Position};
use crate::node::Node;

// ============================================================================
// Line Sources
// ============================================================================

/// Supplies input one line at a time.
///
/// `depth` is 0 when a new unit is wanted and the current bracket nesting
/// depth when a continuation line is wanted.
pub trait LineSource {
    fn next_line(&mut self, depth: usize) -> Option<String>;
}

impl LineSource for VecDeque<String> {
    fn next_line(&mut self, _depth: usize) -> Option<String> {
        self.pop_front()
    }
}

/// A source with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMoreInput;

impl LineSource for NoMoreInput {
    fn next_line(&mut self, _depth: usize) -> Option<String> {
        None
    }
}

/// Lines from any buffered reader. Read errors end the input.
#[derive(Debug)]
pub struct ReaderLines<R> {
    inner: R,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(inner: R) -> Self {
        ReaderLines { inner }
    }
}

impl<R: BufRead> LineSource for ReaderLines<R> {
    fn next_line(&mut self, _depth: usize) -> Option<String> {
        let mut line = String::new();
        match self.inner.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                warn!(error = %e, "input read failed, treating as end of input");
                None
            }
        }
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxWarning {
    /// A `]` appeared outside any list.
    UnexpectedClose { position: Position },
    /// Input ended while a `[` opened at `opened_at` was still open.
    UnclosedOpen { depth: usize, opened_at: Position },
}

impl fmt::Display for SyntaxWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxWarning::UnexpectedClose { position } => {
                write!(f, "{position}: unexpected ']' ignored")
            }
            SyntaxWarning::UnclosedOpen { depth, opened_at } => {
                write!(f, "{opened_at}: '[' never closed (depth {depth})")
            }
        }
    }
}

/// One read unit: the tree of a line (plus any continuation lines) and the
/// bracket warnings raised while building it.
#[derive(Debug, PartialEq)]
pub struct Parsed {
    pub tree: Node,
    pub warnings: Vec<SyntaxWarning>,
}

impl Parsed {
    pub fn is_balanced(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl Default for Parsed {
    fn default() -> Self {
        Parsed {
            tree: Node::List(Vec::new()),
            warnings: Vec::new(),
        }
    }
}

// ============================================================================
// Reader
// ============================================================================

pub struct Reader<L> {
    lexer: Lexer<LineCursor>,
    lines: L,
    exhausted: bool,
}

impl<L: LineSource> Reader<L> {
    pub fn new(lines: L) -> Result<Self> {
        Ok(Reader {
            lexer: Lexer::new(LineCursor::new()?)?,
            lines,
            exhausted: false,
        })
    }

    /// Read the next unit, or `None` once the line source is exhausted.
    ///
    /// Open lists are kept on an explicit stack, so nesting depth is bounded
    /// by memory rather than by the call stack.
    pub fn read(&mut self) -> Result<Option<Parsed>> {
        if !self.refill(0)? {
            return Ok(None);
        }
        self.build().map(Some)
    }

    /// Fold the words of the loaded line, plus any continuation lines, into
    /// one tree.
    fn build(&mut self) -> Result<Parsed> {
        let mut warnings = Vec::new();
        let mut current = Level::new(Position::default());
        let mut parents: Vec<Level> = Vec::new();

        loop {
            let Some(word) = self.lexer.next_word()? else {
                let depth = parents.len();
                if depth == 0 {
                    break;
                }
                if self.refill(depth)? {
                    continue;
                }
                let warning = SyntaxWarning::UnclosedOpen {
                    depth,
                    opened_at: current.opened_at,
                };
                warn!(%warning, "unbalanced brackets");
                warnings.push(warning);
                break;
            };

            if word.is_open() {
                let opened = Level::new(self.lexer.token_start());
                parents.push(mem::replace(&mut current, opened));
            } else if word.is_close() {
                match parents.pop() {
                    Some(parent) => {
                        let done = mem::replace(&mut current, parent);
                        current.children.push(Node::List(done.children));
                    }
                    None => {
                        let warning = SyntaxWarning::UnexpectedClose {
                            position: self.lexer.token_start(),
                        };
                        warn!(%warning, "unbalanced brackets");
                        warnings.push(warning);
                    }
                }
            } else {
                current.children.push(Node::Atom(word));
            }
        }

        // Close whatever is still open, innermost first.
        while let Some(parent) = parents.pop() {
            let done = mem::replace(&mut current, parent);
            current.children.push(Node::List(done.children));
        }

        Ok(Parsed {
            tree: Node::List(current.children),
            warnings,
        })
    }

    /// Load the next line into the lexer. Returns `false` at end of input.
    fn refill(&mut self, depth: usize) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if depth > 0 {
            debug!(depth, "requesting continuation line");
        }

        let Some(line) = self.lines.next_line(depth) else {
            self.exhausted = true;
            return Ok(false);
        };
        self.load(line)?;
        Ok(true)
    }

    fn load(&mut self, mut line: String) -> Result<()> {
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.lexer.source_mut().load(&line)?;
        self.lexer.reset();
        Ok(())
    }
}

/// A list still being filled, and where its `[` was.
struct Level {
    children: Vec<Node>,
    opened_at: Position,
}

impl Level {
    fn new(opened_at: Position) -> Self {
        Level {
            children: Vec::new(),
            opened_at,
        }
    }
}

impl<L: LineSource> Iterator for Reader<L> {
    type Item = Result<Parsed>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

/// Read `text` as a single unit. Newlines inside `text` are plain whitespace.
pub fn read_str(text: &str) -> Result<Parsed> {
    let mut reader = Reader::new(NoMoreInput)?;
    reader.load(text.to_string())?;
    reader.build()
}
