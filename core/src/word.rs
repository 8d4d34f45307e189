use std::fmt;
use std::hash::{Hash, Hasher};

/// Single-character words that delimit lists.
pub const STRUCTURAL_SYMBOLS: [char; 2] = ['[', ']'];

const HASH_MULTIPLIER: u32 = 31;

// ============================================================================
// Word Types
// ============================================================================

/// The variant of a [`Word`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordKind {
    String,
    Integer,
    Float,
    Token,
}

impl fmt::Display for WordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            WordKind::String => "string",
            WordKind::Integer => "integer",
            WordKind::Float => "float",
            WordKind::Token => "token",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum WordValue {
    String(Box<str>),
    Integer(i64),
    Float(f64),
    /// A structural symbol, one of [`STRUCTURAL_SYMBOLS`].
    Token(char),
}

/// An immutable typed scalar with a precomputed content hash.
///
/// Text comparison is ASCII case-insensitive, so `Foo` and `foo` are the
/// same word and hash alike. Words of different kinds are never equal, even
/// when they render to the same text.
#[derive(Debug, Clone)]
pub struct Word {
    value: WordValue,
    hash: u32,
}

// ============================================================================
// Construction
// ============================================================================

impl Word {
    /// Classify `text` and build the matching word.
    ///
    /// Integers are an optional `-` then one or more digits. Floats are an
    /// optional `-`, optional digits, a single `.`, then one or more digits.
    /// Any other character anywhere makes the whole text a string, as does
    /// an integer that does not fit in 64 bits. A lone `[` or `]` is a
    /// structural token.
    pub fn from_text(text: &str) -> Word {
        match classify(text) {
            WordKind::Integer => {
                if let Ok(n) = text.parse::<i64>() {
                    return Word::from_integer(n);
                }
            }
            WordKind::Float => {
                if let Ok(x) = text.parse::<f64>() {
                    return Word::from_float(x);
                }
            }
            WordKind::Token => {
                if let Some(c) = text.chars().next() {
                    return Word {
                        hash: byte_hash(text.as_bytes()),
                        value: WordValue::Token(c),
                    };
                }
            }
            WordKind::String => {}
        }

        Word {
            hash: byte_hash(text.as_bytes()),
            value: WordValue::String(text.into()),
        }
    }

    pub fn from_integer(n: i64) -> Word {
        Word {
            value: WordValue::Integer(n),
            hash: byte_hash(&n.to_le_bytes()),
        }
    }

    pub fn from_float(x: f64) -> Word {
        Word {
            value: WordValue::Float(x),
            hash: byte_hash(&canonical_bits(x).to_le_bytes()),
        }
    }

    /// Render both words as text, join them, and classify the result again.
    ///
    /// This is textual: `12` and `3` make the integer `123`, `1` and `a`
    /// make the string `1a`.
    pub fn concat(&self, other: &Word) -> Word {
        Word::from_text(&format!("{self}{other}"))
    }
}

impl From<i64> for Word {
    fn from(n: i64) -> Self {
        Word::from_integer(n)
    }
}

impl From<f64> for Word {
    fn from(x: f64) -> Self {
        Word::from_float(x)
    }
}

impl From<&str> for Word {
    fn from(text: &str) -> Self {
        Word::from_text(text)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Word {
    pub fn kind(&self) -> WordKind {
        match self.value {
            WordValue::String(_) => WordKind::String,
            WordValue::Integer(_) => WordKind::Integer,
            WordValue::Float(_) => WordKind::Float,
            WordValue::Token(_) => WordKind::Token,
        }
    }

    pub fn value(&self) -> &WordValue {
        &self.value
    }

    pub fn hash_code(&self) -> u32 {
        self.hash
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            WordValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            WordValue::Float(x) => Some(x),
            _ => None,
        }
    }

    /// The text of a string word.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            WordValue::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<char> {
        match self.value {
            WordValue::Token(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.as_token() == Some('[')
    }

    pub fn is_close(&self) -> bool {
        self.as_token() == Some(']')
    }

    /// Canonical text of this word.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// Equality, Hashing, Display
// ============================================================================

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        match (&self.value, &other.value) {
            (WordValue::String(a), WordValue::String(b)) => a.eq_ignore_ascii_case(b),
            (WordValue::Integer(a), WordValue::Integer(b)) => a == b,
            (WordValue::Float(a), WordValue::Float(b)) => {
                canonical_bits(*a) == canonical_bits(*b)
            }
            (WordValue::Token(a), WordValue::Token(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            WordValue::String(s) => f.write_str(s),
            WordValue::Integer(n) => write!(f, "{n}"),
            WordValue::Float(x) => write!(f, "{x}"),
            WordValue::Token(c) => write!(f, "{c}"),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn byte_hash(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |hash, b| {
        hash.wrapping_add(HASH_MULTIPLIER.wrapping_mul(u32::from(b.to_ascii_uppercase())))
    })
}

/// Bit pattern used for float hashing and equality. Both zeros collapse to
/// `0.0` and every NaN to one NaN, so a float word always equals itself.
fn canonical_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else if x.is_nan() {
        f64::NAN.to_bits()
    } else {
        x.to_bits()
    }
}

fn classify(text: &str) -> WordKind {
    let mut chars = text.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && STRUCTURAL_SYMBOLS.contains(&c)
    {
        return WordKind::Token;
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match fraction {
        None if !whole.is_empty() && all_digits(whole) => WordKind::Integer,
        Some(fraction) if !fraction.is_empty() && all_digits(whole) && all_digits(fraction) => {
            WordKind::Float
        }
        _ => WordKind::String,
    }
}
