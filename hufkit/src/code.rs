//! Prefix codes derived from a Huffman tree.

use core::fmt;
use core::iter::{self, Chain, Map, Once};
use core::slice;

use smallvec::SmallVec;

use crate::error::{PreconditionError, Result, err};
use crate::symbol::Symbol;

/// The code of a single symbol, as the path from the root of the tree to its
/// leaf (`false` for left, `true` for right).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: SmallVec<[bool; 24]>,
}

impl Code {
    pub(crate) fn from_bits(bits: &[bool]) -> Self {
        Self {
            bits: SmallVec::from_slice(bits),
        }
    }

    /// Return the bits of the code.
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Return an iterator over the bits of the code.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Return the length of the code in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the code has no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether this code is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }

        Ok(())
    }
}

/// A mapping from symbols to their codes.
///
/// Only used for encoding; decoding walks the tree directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub(crate) fn new() -> Self {
        Self {
            codes: vec![None; Symbol::COUNT],
        }
    }

    pub(crate) fn insert(&mut self, symbol: Symbol, code: Code) {
        self.codes[symbol.index()] = Some(code);
    }

    /// Return the code of a symbol.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }

    /// Return the code of a symbol, or an error if it has none.
    #[inline]
    pub fn lookup(&self, symbol: Symbol) -> Result<&Code> {
        match self.get(symbol) {
            Some(code) => Ok(code),
            None => err!(PreconditionError::MissingCode(symbol)),
        }
    }

    /// Return the number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// Whether no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all symbols with a code, in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        (0..=u8::MAX)
            .map(Symbol::Literal)
            .chain(iter::once(Symbol::EndOfStream))
            .filter_map(|symbol| Some((symbol, self.get(symbol)?)))
    }

    /// Lazily encode `data` into a sequence of bits, terminated by the code of
    /// the end-of-stream symbol.
    pub fn encoded_bits<I>(&self, data: I) -> EncodedBits<'_, I::IntoIter>
    where
        I: IntoIterator<Item = u8>,
    {
        EncodedBits {
            table: self,
            symbols: data
                .into_iter()
                .map(Symbol::Literal as fn(u8) -> Symbol)
                .chain(iter::once(Symbol::EndOfStream)),
            pending: slice::Iter::default(),
            failed: false,
        }
    }
}

/// A lazy, single-pass iterator over the encoded bits of a byte sequence.
///
/// Created by [`CodeTable::encoded_bits`]. If a byte has no code, an error is
/// yielded and the iteration ends.
#[derive(Debug, Clone)]
pub struct EncodedBits<'a, I> {
    table: &'a CodeTable,
    symbols: Chain<Map<I, fn(u8) -> Symbol>, Once<Symbol>>,
    pending: slice::Iter<'a, bool>,
    failed: bool,
}

impl<I: Iterator<Item = u8>> Iterator for EncodedBits<'_, I> {
    type Item = Result<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&bit) = self.pending.next() {
                return Some(Ok(bit));
            }

            if self.failed {
                return None;
            }

            let symbol = self.symbols.next()?;

            match self.table.lookup(symbol) {
                Ok(code) => self.pending = code.bits().iter(),
                Err(e) => {
                    self.failed = true;

                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn table(entries: &[(Symbol, &[bool])]) -> CodeTable {
        let mut table = CodeTable::new();

        for (symbol, bits) in entries {
            table.insert(*symbol, Code::from_bits(bits));
        }

        table
    }

    #[test]
    fn code_display() {
        assert_eq!(Code::from_bits(&[true, false, true]).to_string(), "101");
        assert_eq!(Code::default().to_string(), "");
    }

    #[test]
    fn prefix() {
        let a = Code::from_bits(&[false, true]);
        let b = Code::from_bits(&[false, true, true]);

        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(a.is_prefix_of(&a));
    }

    #[test]
    fn encoded_bits_appends_end_of_stream() {
        let table = table(&[
            (Symbol::Literal(b'a'), &[true]),
            (Symbol::Literal(b'b'), &[false, false]),
            (Symbol::EndOfStream, &[false, true]),
        ]);

        let bits = table
            .encoded_bits(*b"aaab")
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(bits, [true, true, true, false, false, false, true]);
    }

    #[test]
    fn encoded_bits_missing_code() {
        let table = table(&[
            (Symbol::Literal(b'a'), &[false]),
            (Symbol::EndOfStream, &[true]),
        ]);

        let mut bits = table.encoded_bits(*b"ab");
        assert!(matches!(bits.next(), Some(Ok(false))));
        assert!(matches!(
            bits.next(),
            Some(Err(Error::Precondition(PreconditionError::MissingCode(
                Symbol::Literal(b'b')
            ))))
        ));
        assert!(bits.next().is_none());
    }

    #[test]
    fn iter_in_symbol_order() {
        let table = table(&[
            (Symbol::EndOfStream, &[true]),
            (Symbol::Literal(b'x'), &[false]),
        ]);

        let symbols: Vec<_> = table.iter().map(|(symbol, _)| symbol).collect();
        assert_eq!(symbols, [Symbol::Literal(b'x'), Symbol::EndOfStream]);
        assert_eq!(table.len(), 2);
    }
}
