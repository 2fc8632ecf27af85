//! A bit reader and writer over byte streams.
//!
//! Bits are addressed most-significant-first within each byte. Single bits and
//! whole units (bytes) can be mixed freely: a unit that does not start on a byte
//! boundary straddles two bytes of the underlying stream.

use std::io::{self, Read, Write};

/// Number of bits in one unit of the underlying stream.
const UNIT_BITS: u8 = 8;

/// A bit reader over an [`io::Read`] source.
///
/// The reader pulls exactly one byte from the source whenever its buffer runs
/// empty, so wrapping unbuffered sources in an [`io::BufReader`] is recommended.
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    /// The buffered unit. Unconsumed bits are kept left-aligned.
    unit: u8,
    /// Number of unconsumed bits in `unit` (0-7).
    remaining: u8,
    /// Number of bits returned so far.
    bits_read: u64,
    good: bool,
}

impl<R: Read> BitReader<R> {
    /// Create a new bit reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            unit: 0,
            remaining: 0,
            bits_read: 0,
            good: true,
        }
    }

    /// Read a single bit.
    ///
    /// Returns an error of kind [`io::ErrorKind::UnexpectedEof`] if the source
    /// is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.remaining == 0 {
            self.unit = self.fetch()?;
            self.remaining = UNIT_BITS;
        }

        let bit = self.unit >> 7 == 1;
        self.unit <<= 1;
        self.remaining -= 1;
        self.bits_read += 1;

        Ok(bit)
    }

    /// Read the next eight bits as one unit.
    ///
    /// If the reader is not byte-aligned, the unit is spliced together from the
    /// tail of the current byte and the head of the next one. In case the next
    /// byte cannot be read, no bits are consumed.
    pub fn read_unit(&mut self) -> io::Result<u8> {
        let value = match self.remaining {
            0 => self.fetch()?,
            remaining => {
                let next = self.fetch()?;
                let value = self.unit | (next >> remaining);
                self.unit = next << (UNIT_BITS - remaining);

                value
            }
        };

        self.bits_read += UNIT_BITS as u64;

        Ok(value)
    }

    /// Skip to the next byte boundary.
    ///
    /// Does nothing if the reader is already on a byte boundary.
    pub fn align(&mut self) {
        match self.remaining {
            // The buffer is only refilled on demand, so an empty buffer means that
            // the next bit starts a new byte.
            0 => {}
            remaining => {
                self.bits_read += remaining as u64;
                self.remaining = 0;
            }
        }
    }

    /// Whether all reads so far have succeeded.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.good
    }

    /// Return the number of bits consumed so far, including skipped ones.
    #[inline]
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Return the underlying source. Buffered bits are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fetch(&mut self) -> io::Result<u8> {
        let mut buf = [0_u8; 1];

        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(buf[0]),
            Err(e) => {
                self.good = false;

                Err(e)
            }
        }
    }
}

/// A bit writer over an [`io::Write`] sink.
///
/// Every completed byte is written to the sink immediately, so wrapping
/// unbuffered sinks in an [`io::BufWriter`] is recommended.
///
/// Call [`BitWriter::finish`] to pad the last byte and get the sink back. If the
/// writer is dropped instead, the pending bits are still padded and written, but
/// errors are ignored.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    /// Accumulated bits, right-aligned.
    unit: u8,
    /// Number of bits currently in `unit` (0-7).
    filled: u8,
    /// Number of bits written so far.
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new bit writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            unit: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.unit = (self.unit << 1) | bit as u8;
        self.filled += 1;
        self.bits_written += 1;

        if self.filled == UNIT_BITS {
            self.emit()?;
        }

        Ok(())
    }

    /// Write multiple bits at once.
    pub fn write_bits(&mut self, bits: impl IntoIterator<Item = bool>) -> io::Result<()> {
        for bit in bits {
            self.write_bit(bit)?;
        }

        Ok(())
    }

    /// Write eight bits as one unit.
    ///
    /// If the writer is not byte-aligned, the high bits of `value` complete the
    /// current byte and the low bits start the next one.
    pub fn write_unit(&mut self, value: u8) -> io::Result<()> {
        self.bits_written += UNIT_BITS as u64;

        match self.filled {
            0 => self.put(value),
            filled => {
                let free = UNIT_BITS - filled;
                self.unit = (self.unit << free) | (value >> filled);
                self.emit()?;
                self.unit = value & low_mask(filled);
                self.filled = filled;

                Ok(())
            }
        }
    }

    /// Pad the current byte with zero bits and write it out.
    ///
    /// Does nothing if the writer is already byte-aligned.
    pub fn align(&mut self) -> io::Result<()> {
        match self.filled {
            0 => Ok(()),
            filled => {
                let padding = UNIT_BITS - filled;
                self.unit <<= padding;
                self.bits_written += padding as u64;

                self.emit()
            }
        }
    }

    /// Return the number of bits written so far, including padding.
    #[inline]
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Align the writer, flush the sink and return it.
    pub fn finish(mut self) -> io::Result<W> {
        self.align()?;

        let mut inner = self.inner.take().ok_or(io::ErrorKind::BrokenPipe)?;
        inner.flush()?;

        Ok(inner)
    }

    fn emit(&mut self) -> io::Result<()> {
        let unit = self.unit;
        self.unit = 0;
        self.filled = 0;

        self.put(unit)
    }

    fn put(&mut self, unit: u8) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.write_all(&[unit]),
            None => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.align();

            if let Some(inner) = self.inner.as_mut() {
                let _ = inner.flush();
            }
        }
    }
}

/// Get the mask for the lowest `bits` bits of a byte.
#[inline]
fn low_mask(bits: u8) -> u8 {
    ((1_u16 << bits) - 1) as u8
}
