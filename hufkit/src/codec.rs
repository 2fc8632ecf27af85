//! Encoding and decoding of the compressed stream body.
//!
//! The body is the concatenation of the codes of all bytes of the original data,
//! terminated by the code of the end-of-stream symbol. It carries no length, so
//! decoding stops exactly at the end-of-stream leaf.

use core::iter::FusedIterator;
use std::io::{self, Read, Write};

use crate::bit::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::error::{Error, Result};
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, Node};

/// Size of the chunks in which data is pulled from readers and pushed to writers.
const CHUNK_SIZE: usize = 8192;

/// Encode `data` followed by the end-of-stream symbol.
pub fn encode<W: Write>(
    data: impl IntoIterator<Item = u8>,
    codes: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<()> {
    for bit in codes.encoded_bits(data) {
        writer.write_bit(bit?)?;
    }

    Ok(())
}

/// Encode all bytes of `source` followed by the end-of-stream symbol.
///
/// Returns the number of bytes that were encoded.
pub fn encode_reader<R: Read, W: Write>(
    mut source: R,
    codes: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<u64> {
    let mut buf = [0_u8; CHUNK_SIZE];
    let mut total = 0_u64;

    loop {
        let read = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        for &byte in &buf[..read] {
            writer.write_bits(codes.lookup(Symbol::Literal(byte))?.iter())?;
        }

        total += read as u64;
    }

    writer.write_bits(codes.lookup(Symbol::EndOfStream)?.iter())?;

    ltrace!("encoded {} bytes into {} bits", total, writer.bits_written());

    Ok(total)
}

/// Return an iterator over the bytes decoded from `reader` using `tree`.
pub fn symbols<'a, R: Read>(
    reader: &'a mut BitReader<R>,
    tree: &'a HuffmanTree,
) -> Symbols<'a, R> {
    Symbols {
        reader,
        tree,
        state: State::Walking,
    }
}

/// Decode all bytes from `reader` into `sink`, up to the end-of-stream symbol.
///
/// Returns the number of bytes that were written. Bits after the end-of-stream
/// symbol are never read.
pub fn decode<R: Read, W: Write>(
    reader: &mut BitReader<R>,
    tree: &HuffmanTree,
    mut sink: W,
) -> Result<u64> {
    let mut buf = Vec::with_capacity(CHUNK_SIZE);
    let mut total = 0_u64;

    for byte in symbols(reader, tree) {
        buf.push(byte?);

        if buf.len() == CHUNK_SIZE {
            sink.write_all(&buf)?;
            total += buf.len() as u64;
            buf.clear();
        }
    }

    sink.write_all(&buf)?;
    total += buf.len() as u64;

    ltrace!("decoded {} bytes from {} bits", total, reader.bits_read());

    Ok(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Walking,
    EndOfStream,
    Failed,
}

/// An iterator over decoded bytes.
///
/// Created by [`symbols`]. The iterator ends after the end-of-stream symbol was
/// reached. If the input ends before that, a single
/// [`FormatError::UnexpectedEof`](crate::FormatError::UnexpectedEof) is yielded
/// instead.
#[derive(Debug)]
pub struct Symbols<'a, R> {
    reader: &'a mut BitReader<R>,
    tree: &'a HuffmanTree,
    state: State,
}

impl<R> Symbols<'_, R> {
    /// Whether the end-of-stream symbol was reached.
    pub fn is_finished(&self) -> bool {
        self.state == State::EndOfStream
    }
}

impl<R: Read> Iterator for Symbols<'_, R> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Walking {
            return None;
        }

        let mut node = self.tree.root();

        loop {
            match self.tree.node(node) {
                Node::Leaf(Symbol::Literal(byte)) => return Some(Ok(byte)),
                Node::Leaf(Symbol::EndOfStream) => {
                    self.state = State::EndOfStream;

                    return None;
                }
                Node::Internal { left, right } => match self.reader.read_bit() {
                    Ok(bit) => node = if bit { right } else { left },
                    Err(e) => {
                        self.state = State::Failed;

                        return Some(Err(Error::from_read(e)));
                    }
                },
            }
        }
    }
}

impl<R: Read> FusedIterator for Symbols<'_, R> {}
