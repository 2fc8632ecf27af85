//! Symbol frequency counting.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::io::{self, Read};

use crate::symbol::Symbol;

/// A mapping from symbols to their number of occurrences.
///
/// Iteration always happens in symbol order, which makes tree construction
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, usize>,
}

impl FrequencyTable {
    /// Create an empty frequency table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count all bytes of `source` and add one end-of-stream symbol.
    pub fn tally(mut source: impl Read) -> io::Result<Self> {
        let mut counts = [0_usize; 256];
        let mut buf = [0_u8; 8192];

        loop {
            let read = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            for &byte in &buf[..read] {
                counts[byte as usize] += 1;
            }
        }

        let mut table = Self::new();

        for (byte, &count) in (0..=u8::MAX).zip(counts.iter()) {
            if count > 0 {
                table.insert(Symbol::Literal(byte), count);
            }
        }

        table.insert(Symbol::EndOfStream, 1);

        Ok(table)
    }

    /// Count all bytes of `data` and add one end-of-stream symbol.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();

        for &byte in data {
            table.increment(Symbol::Literal(byte));
        }

        table.increment(Symbol::EndOfStream);

        table
    }

    /// Set the count of a symbol, returning the previous count.
    pub fn insert(&mut self, symbol: Symbol, count: usize) -> Option<usize> {
        self.counts.insert(symbol, count)
    }

    /// Increase the count of a symbol by one.
    pub fn increment(&mut self, symbol: Symbol) {
        *self.counts.entry(symbol).or_insert(0) += 1;
    }

    /// Return the count of a symbol, if it is present.
    pub fn get(&self, symbol: Symbol) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    /// Return the number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table contains no symbols.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over all symbols and their counts in symbol order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.counts.iter(),
        }
    }
}

impl FromIterator<(Symbol, usize)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (Symbol, usize)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FrequencyTable {
    type Item = (Symbol, usize);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`FrequencyTable`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Symbol, usize>,
}

impl Iterator for Iter<'_> {
    type Item = (Symbol, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(symbol, count)| (*symbol, *count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
