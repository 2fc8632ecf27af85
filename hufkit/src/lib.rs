/*!
A static Huffman compressor and decompressor.

`hufkit` reads its input once to count byte frequencies, builds a Huffman tree
from them and encodes the input bit by bit. The tree is embedded in front of
the encoded data, so a compressed file can be decompressed without any other
information.

The compressed format consists of
- the serialized tree (see [`tree`]),
- the codes of all input bytes, followed by the code of an end-of-stream symbol,
- zero bits up to the next byte boundary.

There is no header, length or checksum. Decompression of foreign or truncated
data fails with a [`FormatError`] instead of producing garbage of unbounded
length.

# Example
```rust
let data = b"abracadabra";

let compressed = hufkit::compress(data).unwrap();
let decompressed = hufkit::decompress(&compressed).unwrap();

assert_eq!(decompressed, data);
```

The building blocks ([`bit`], [`tree`], [`code`] and [`codec`]) are public for
callers that need finer control, for example to reuse a tree for several
streams.

# Cargo features
- `logging`: Emit diagnostics through the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

#[macro_use]
mod log;

pub mod bit;
pub mod code;
pub mod codec;
mod error;
pub mod frequency;
mod symbol;
pub mod tree;

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use crate::bit::{BitReader, BitWriter};
use crate::tree::HuffmanTree;

pub use error::{Error, FormatError, PreconditionError, Result};
pub use frequency::FrequencyTable;
pub use symbol::Symbol;

/// Byte counts of a compression or decompression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// The number of bytes consumed from the source.
    pub input_bytes: u64,
    /// The number of bytes written to the sink.
    pub output_bytes: u64,
}

impl Summary {
    /// The size of the output relative to the input, or `None` for empty input.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes as f64 / self.input_bytes as f64)
    }
}

/// Compress `data`.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress_stream(Cursor::new(data), &mut out)?;

    Ok(out)
}

/// Decompress `data`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress_stream(data, &mut out)?;

    Ok(out)
}

/// Compress everything from the current position of `source` to its end.
///
/// The source is read twice: once to count byte frequencies and once to encode
/// it. The sink is flushed before returning.
pub fn compress_stream<R: Read + Seek, W: Write>(mut source: R, sink: W) -> Result<Summary> {
    let start = source.stream_position()?;
    let table = FrequencyTable::tally(&mut source)?;
    source.seek(SeekFrom::Start(start))?;

    let tree = HuffmanTree::build(&table)?;
    let codes = tree.codes();

    let mut writer = BitWriter::new(sink);
    tree.write(&mut writer)?;
    let tree_bits = writer.bits_written();

    let input_bytes = codec::encode_reader(&mut source, &codes, &mut writer)?;
    writer.align()?;

    let summary = Summary {
        input_bytes,
        output_bytes: writer.bits_written() / 8,
    };

    writer.finish()?;

    ldebug!(
        "compressed {} bytes into {} bytes ({} bits of tree)",
        summary.input_bytes,
        summary.output_bytes,
        tree_bits
    );

    Ok(summary)
}

/// Decompress a stream from `source` into `sink`.
///
/// Reading stops right after the end-of-stream symbol, so trailing data in
/// `source` is left untouched. The sink is flushed before returning.
pub fn decompress_stream<R: Read, W: Write>(source: R, mut sink: W) -> Result<Summary> {
    let mut reader = BitReader::new(source);

    let output_bytes = match HuffmanTree::read(&mut reader)
        .and_then(|tree| codec::decode(&mut reader, &tree, &mut sink))
    {
        Ok(output_bytes) => output_bytes,
        Err(e) => {
            lwarn!(
                "rejected compressed stream after {} bits: {}",
                reader.bits_read(),
                e
            );

            return Err(e);
        }
    };

    sink.flush()?;

    let summary = Summary {
        input_bytes: reader.bits_read().div_ceil(8),
        output_bytes,
    };

    ldebug!(
        "decompressed {} bytes into {} bytes",
        summary.input_bytes,
        summary.output_bytes
    );

    Ok(summary)
}
