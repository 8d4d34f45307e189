//! Open-addressing table keyed by [`Word`]
//!
//! Slots are probed with triangular steps: attempt `p` looks at
//! `hash + (p + p²) / 2`. The slot count is always a power of two, which
//! makes that sequence visit every slot. The table grows by doubling and
//! reinserting as soon as its size reaches the load limit, so
//! `len() < load_limit()` holds between operations.

use tracing::debug;

use crate::error::{EmlError, Result};
use crate::word::Word;

/// Slot count of a table made with [`WordTable::new`].
pub const INITIAL_SLOTS: usize = 256;

/// Occupancy, in percent of the slot count, that triggers a rehash.
pub const LOAD_FACTOR_PERCENT: usize = 80;

type Slot<V> = Option<(Word, V)>;

#[derive(Debug, Clone)]
pub struct WordTable<V> {
    slots: Vec<Slot<V>>,
    size: usize,
    load_limit: usize,
}

enum Probe {
    Vacant(usize),
    Occupied(usize),
}

impl<V> WordTable<V> {
    pub fn new() -> Result<Self> {
        Self::with_capacity(INITIAL_SLOTS)
    }

    /// Create a table with at least `capacity` slots, rounded up to a power
    /// of two.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity
            .max(2)
            .checked_next_power_of_two()
            .ok_or(EmlError::CapacityOverflow {
                requested: capacity,
                unit: "slots",
            })?;
        Ok(WordTable {
            slots: allocate_slots(capacity)?,
            size: 0,
            load_limit: load_limit(capacity),
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_limit(&self) -> usize {
        self.load_limit
    }

    /// Associate `value` with `key`, returning the value it replaced.
    pub fn set(&mut self, key: Word, value: V) -> Result<Option<V>> {
        match probe(&self.slots, &key) {
            Probe::Occupied(i) => {
                let slot = self.slots[i].as_mut().map(|(_, v)| v);
                Ok(slot.map(|v| std::mem::replace(v, value)))
            }
            Probe::Vacant(i) => {
                self.slots[i] = Some((key, value));
                self.size += 1;
                if self.size >= self.load_limit {
                    self.rehash()?;
                }
                Ok(None)
            }
        }
    }

    pub fn get(&self, key: &Word) -> Option<&V> {
        match probe(&self.slots, key) {
            Probe::Occupied(i) => self.slots[i].as_ref().map(|(_, v)| v),
            Probe::Vacant(_) => None,
        }
    }

    pub fn get_mut(&mut self, key: &Word) -> Option<&mut V> {
        match probe(&self.slots, key) {
            Probe::Occupied(i) => self.slots[i].as_mut().map(|(_, v)| v),
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains(&self, key: &Word) -> bool {
        matches!(probe(&self.slots, key), Probe::Occupied(_))
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&Word, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(k, v)| (k, v)))
    }

    fn rehash(&mut self) -> Result<()> {
        let previous = self.capacity();
        let capacity = previous
            .checked_mul(2)
            .ok_or(EmlError::CapacityOverflow {
                requested: usize::MAX,
                unit: "slots",
            })?;
        let mut slots = allocate_slots(capacity)?;

        for (key, value) in self.slots.drain(..).flatten() {
            let Probe::Vacant(i) = probe(&slots, &key) else {
                unreachable!("duplicate key `{key}` while rehashing");
            };
            slots[i] = Some((key, value));
        }

        debug!(
            from = previous,
            to = capacity,
            size = self.size,
            "word table rehashed"
        );
        self.slots = slots;
        self.load_limit = load_limit(capacity);
        Ok(())
    }
}

impl WordTable<usize> {
    /// Bump the counter for `key`, starting from zero. Returns the new count.
    pub fn increment(&mut self, key: &Word) -> Result<usize> {
        if let Some(count) = self.get_mut(key) {
            *count += 1;
            return Ok(*count);
        }
        self.set(key.clone(), 1)?;
        Ok(1)
    }
}

fn allocate_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

fn load_limit(capacity: usize) -> usize {
    capacity / 100 * LOAD_FACTOR_PERCENT + capacity % 100 * LOAD_FACTOR_PERCENT / 100
}

fn probe<V>(slots: &[Slot<V>], key: &Word) -> Probe {
    let capacity = slots.len();
    let hash = key.hash_code() as usize;

    for attempt in 0..capacity {
        let i = hash.wrapping_add((attempt + attempt * attempt) / 2) % capacity;
        match &slots[i] {
            None => return Probe::Vacant(i),
            Some((k, _)) if k == key => return Probe::Occupied(i),
            Some(_) => {}
        }
    }

    unreachable!("load limit keeps at least one slot vacant")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table() {
        let table: WordTable<i32> = WordTable::new().unwrap();
        assert_eq!(table.capacity(), INITIAL_SLOTS);
        assert_eq!(table.load_limit(), 204);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut table = WordTable::new().unwrap();
        assert_eq!(table.set(Word::from_text("forward"), 1).unwrap(), None);
        assert_eq!(table.set(Word::from_integer(90), 2).unwrap(), None);

        assert_eq!(table.get(&Word::from_text("FORWARD")), Some(&1));
        assert_eq!(table.get(&Word::from_integer(90)), Some(&2));
        assert_eq!(table.get(&Word::from_text("back")), None);
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let mut table = WordTable::new().unwrap();
        table.set(Word::from_text("x"), "old").unwrap();
        let previous = table.set(Word::from_text("X"), "new").unwrap();
        assert_eq!(previous, Some("old"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&Word::from_text("x")), Some(&"new"));
    }

    #[test]
    fn test_colliding_hashes_probe_apart() {
        // Anagrams sum to the same hash.
        let mut table = WordTable::with_capacity(8).unwrap();
        table.set(Word::from_text("abc"), 1).unwrap();
        table.set(Word::from_text("cab"), 2).unwrap();
        table.set(Word::from_text("bca"), 3).unwrap();

        assert_eq!(table.get(&Word::from_text("abc")), Some(&1));
        assert_eq!(table.get(&Word::from_text("cab")), Some(&2));
        assert_eq!(table.get(&Word::from_text("bca")), Some(&3));
    }

    #[test]
    fn test_growth_preserves_entries() {
        let mut table = WordTable::new().unwrap();
        for n in 0..1000 {
            table.set(Word::from_integer(n), n * 2).unwrap();
            assert!(table.len() < table.load_limit());
        }
        assert!(table.capacity() >= 2048);
        for n in 0..1000 {
            assert_eq!(table.get(&Word::from_integer(n)), Some(&(n * 2)));
        }
    }

    #[test]
    fn test_small_table_rehashes_at_limit() {
        let mut table = WordTable::with_capacity(4).unwrap();
        assert_eq!(table.load_limit(), 3);
        for n in 0..3 {
            table.set(Word::from_integer(n), ()).unwrap();
        }
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.load_limit(), 6);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_increment() {
        let mut table = WordTable::new().unwrap();
        let word = Word::from_text("repeat");
        assert_eq!(table.increment(&word).unwrap(), 1);
        assert_eq!(table.increment(&Word::from_text("Repeat")).unwrap(), 2);
        assert_eq!(table.get(&word), Some(&2));
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let mut table = WordTable::new().unwrap();
        for text in ["a", "b", "c"] {
            table.set(Word::from_text(text), text.len()).unwrap();
        }
        let mut keys: Vec<String> = table.iter().map(|(k, _)| k.to_text()).collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nan_key_round_trips() {
        let mut table = WordTable::new().unwrap();
        assert_eq!(table.set(Word::from_float(f64::NAN), 1).unwrap(), None);
        assert_eq!(table.set(Word::from_float(f64::NAN), 2).unwrap(), Some(1));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&Word::from_float(f64::NAN)), Some(&2));
    }

    #[test]
    fn test_rehash_keeps_every_distinct_key() {
        let mut table = WordTable::with_capacity(2).unwrap();
        let words: Vec<Word> = (0..500i64)
            .map(Word::from_integer)
            .chain([Word::from_float(f64::NAN), Word::from_float(-0.0)])
            .collect();
        for (i, word) in words.iter().enumerate() {
            table.set(word.clone(), i).unwrap();
        }
        assert_eq!(table.len(), words.len());
        for (i, word) in words.iter().enumerate() {
            assert_eq!(table.get(word), Some(&i));
        }
    }
}
