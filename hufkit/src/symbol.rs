use core::fmt;

/// A symbol of the coding alphabet.
///
/// The alphabet consists of all 256 byte values plus a single end-of-stream
/// symbol that terminates every encoded stream. The end-of-stream symbol only
/// ever appears as a tree leaf, never as a byte of the original data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A byte of the original data.
    Literal(u8),
    /// The end of the encoded stream.
    EndOfStream,
}

impl Symbol {
    /// The number of symbols in the alphabet.
    pub const COUNT: usize = 257;

    /// A dense index in `0..Self::COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Literal(b) => b as usize,
            Self::EndOfStream => 256,
        }
    }

    /// Whether this is the end-of-stream symbol.
    #[inline]
    pub fn is_end_of_stream(self) -> bool {
        self == Self::EndOfStream
    }
}

impl From<u8> for Symbol {
    #[inline]
    fn from(byte: u8) -> Self {
        Self::Literal(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(b) if b.is_ascii_graphic() || *b == b' ' => {
                write!(f, "'{}'", *b as char)
            }
            Self::Literal(b) => write!(f, "0x{b:02x}"),
            Self::EndOfStream => f.write_str("end-of-stream"),
        }
    }
}
