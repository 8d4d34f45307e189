//! Word frequency counting over a lexer.

use crate::error::Result;
use crate::lexer::{CharSource, Lexer};
use crate::table::WordTable;
use crate::word::Word;

/// Count every word the lexer produces. Equal words (including text that
/// differs only in case) share one entry.
pub fn tally<S: CharSource>(lexer: &mut Lexer<S>) -> Result<WordTable<usize>> {
    tally_with(lexer, |_, _| {})
}

/// Like [`tally`], calling `each` with every word and its running count.
pub fn tally_with<S, F>(lexer: &mut Lexer<S>, mut each: F) -> Result<WordTable<usize>>
where
    S: CharSource,
    F: FnMut(&Word, usize),
{
    let mut counts = WordTable::new()?;
    while let Some(word) = lexer.next_word()? {
        let count = counts.increment(&word)?;
        each(&word, count);
    }
    Ok(counts)
}

/// Entries ordered by descending count, ties broken by text.
pub fn ranked(counts: &WordTable<usize>) -> Vec<(&Word, usize)> {
    let mut entries: Vec<(&Word, usize)> = counts.iter().map(|(w, &n)| (w, n)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_text().cmp(&b.0.to_text())));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LineCursor;

    fn lexer(input: &str) -> Lexer<LineCursor> {
        let mut cursor = LineCursor::new().unwrap();
        cursor.load(input).unwrap();
        Lexer::new(cursor).unwrap()
    }

    #[test]
    fn test_tally_merges_case() {
        let counts = tally(&mut lexer("fd 10 FD 10 rt [ fd ]")).unwrap();
        assert_eq!(counts.get(&Word::from_text("fd")), Some(&3));
        assert_eq!(counts.get(&Word::from_integer(10)), Some(&2));
        assert_eq!(counts.get(&Word::from_text("[")), Some(&1));
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_tally_with_reports_running_counts() {
        let mut seen = Vec::new();
        tally_with(&mut lexer("a b a"), |w, n| seen.push((w.to_text(), n))).unwrap();
        assert_eq!(
            seen,
            vec![("a".to_string(), 1), ("b".to_string(), 1), ("a".to_string(), 2)]
        );
    }

    #[test]
    fn test_ranked() {
        let counts = tally(&mut lexer("b a b c a b")).unwrap();
        let ranked: Vec<(String, usize)> = ranked(&counts)
            .into_iter()
            .map(|(w, n)| (w.to_text(), n))
            .collect();
        assert_eq!(
            ranked,
            vec![("b".to_string(), 3), ("a".to_string(), 2), ("c".to_string(), 1)]
        );
    }
}
