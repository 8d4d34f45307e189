//! Core reader for Emlogo
//!
//! This crate turns text into trees of typed words. It contains the
//! growable byte buffer, the word type, the word-keyed hash table, the lexer,
//! and the tree builder. It does not evaluate anything - the `emlogo-repl`
//! crate drives it from a terminal or a file.

pub mod buffer;
pub mod count;
pub mod error;
pub mod lexer;
pub mod node;
pub mod reader;
pub mod table;
pub mod word;

// Re-export commonly used items for convenience
pub use buffer::GrowBuffer;
pub use count::{ranked, tally, tally_with};
pub use error::{EmlError, Result};
pub use lexer::{CharSource, FnSource, Lexer, LineCursor, Position};
pub use node::Node;
pub use reader::{LineSource, NoMoreInput, Parsed, Reader, ReaderLines, SyntaxWarning, read_str};
pub use table::WordTable;
pub use word::{Word, WordKind, WordValue};
