//! Low-level parcel reader/writer primitives.

use crate::model::error::DataError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ParcelResult<T> = Result<T, ParcelError>;

/// Decode failure for parcel payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelError {
    /// Class tag differs from the one expected at this position.
    UnexpectedTag { expected: String, found: String },
    /// Payload ended before a value could be read.
    Truncated { needed: usize, remaining: usize },
    /// String bytes are not valid UTF-8.
    InvalidUtf8,
    /// A category's owner differs from the enclosing user.
    OwnerMismatch { user: String, owner: String },
    /// Bytes remain after the top-level object.
    TrailingBytes(usize),
    /// Decoded values break a domain rule.
    Data(DataError),
}

impl Display for ParcelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, found } => {
                write!(f, "unexpected parcel tag `{found}`, expected `{expected}`")
            }
            Self::Truncated { needed, remaining } => write!(
                f,
                "parcel truncated: needed {needed} byte(s), {remaining} remaining"
            ),
            Self::InvalidUtf8 => write!(f, "parcel string is not valid UTF-8"),
            Self::OwnerMismatch { user, owner } => write!(
                f,
                "parcel category owner `{owner}` does not match user `{user}`"
            ),
            Self::TrailingBytes(count) => write!(f, "parcel has {count} trailing byte(s)"),
            Self::Data(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParcelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Data(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DataError> for ParcelError {
    fn from(value: DataError) -> Self {
        Self::Data(value)
    }
}

/// Append-only parcel encoder.
#[derive(Debug, Default)]
pub struct ParcelWriter {
    buf: BytesMut,
}

impl ParcelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    /// Writes a collection or string length.
    ///
    /// The format caps lengths at `u32::MAX`. Larger values are written as
    /// `u32::MAX`, so the resulting parcel no longer decodes.
    pub fn write_len(&mut self, len: usize) {
        self.write_u32(u32::try_from(len).unwrap_or(u32::MAX));
    }

    /// Writes a length-prefixed UTF-8 string.
    ///
    /// Strings must stay within `u32::MAX` bytes; see [`Self::write_len`].
    pub fn write_string(&mut self, value: &str) {
        self.write_len(value.len());
        self.buf.put_slice(value.as_bytes());
    }

    /// Writes the class-tag marker that prefixes every object.
    pub fn write_tag(&mut self, tag: &str) {
        self.write_string(tag);
    }

    /// Writes a counted array of objects.
    pub fn write_array<'a, T, I>(&mut self, items: I)
    where
        T: Parcelable + 'a,
        I: ExactSizeIterator<Item = &'a T>,
    {
        self.write_len(items.len());
        for item in items {
            item.write_to_parcel(self);
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Cursor-based parcel decoder over a borrowed byte slice.
#[derive(Debug)]
pub struct ParcelReader<'a> {
    buf: &'a [u8],
}

impl<'a> ParcelReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn read_u32(&mut self) -> ParcelResult<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_len(&mut self) -> ParcelResult<usize> {
        let len = self.read_u32()?;
        usize::try_from(len).map_err(|_| ParcelError::Truncated {
            needed: usize::MAX,
            remaining: self.remaining(),
        })
    }

    pub fn read_string(&mut self) -> ParcelResult<String> {
        let len = self.read_len()?;
        self.ensure(len)?;
        let buf: &'a [u8] = self.buf;
        let (head, tail) = buf.split_at(len);
        let value = std::str::from_utf8(head)
            .map_err(|_| ParcelError::InvalidUtf8)?
            .to_string();
        self.buf = tail;
        Ok(value)
    }

    /// Reads a class tag and checks it against `expected`.
    pub fn expect_tag(&mut self, expected: &str) -> ParcelResult<()> {
        let found = self.read_string()?;
        if found != expected {
            return Err(ParcelError::UnexpectedTag {
                expected: expected.to_string(),
                found,
            });
        }
        Ok(())
    }

    /// Reads a counted array of objects.
    pub fn read_array<T: Parcelable>(&mut self) -> ParcelResult<Vec<T>> {
        let count = self.read_len()?;
        // Every element needs at least its tag length prefix.
        let mut items = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            items.push(T::read_from_parcel(self)?);
        }
        Ok(items)
    }

    fn ensure(&self, needed: usize) -> ParcelResult<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(ParcelError::Truncated { needed, remaining });
        }
        Ok(())
    }
}

/// Types that can be written to and rebuilt from a parcel.
pub trait Parcelable: Sized {
    fn write_to_parcel(&self, dest: &mut ParcelWriter);

    fn read_from_parcel(src: &mut ParcelReader<'_>) -> ParcelResult<Self>;

    /// Encodes one top-level object.
    ///
    /// Every string and collection must fit a `u32` length prefix.
    fn to_parcel_bytes(&self) -> Bytes {
        let mut writer = ParcelWriter::new();
        self.write_to_parcel(&mut writer);
        writer.into_bytes()
    }

    /// Decodes one top-level object, rejecting trailing bytes.
    fn from_parcel_bytes(bytes: &[u8]) -> ParcelResult<Self> {
        let mut reader = ParcelReader::new(bytes);
        let value = Self::read_from_parcel(&mut reader)?;
        match reader.remaining() {
            0 => Ok(value),
            extra => Err(ParcelError::TrailingBytes(extra)),
        }
    }
}
