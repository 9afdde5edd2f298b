//! App message dictionary encoding
//!
//! A dictionary is a tuple count followed by that many tuples:
//!
//! ```text
//! +-------+-----------------------------------------------+-----
//! | count | key (u32 LE) | type (u8) | len (u16 LE) | value | ...
//! +-------+-----------------------------------------------+-----
//! ```
//!
//! Integers are 1, 2 or 4 bytes little-endian. C strings carry their NUL
//! terminator inside `len`.
//!
//! `len` frames every tuple, so a value that cannot be decoded only spoils its
//! own tuple. A dictionary whose framing is broken is rejected whole.

use heapless::Vec;

use crate::error::Error;

/// Most tuples accepted in one inbound message
pub const MAX_TUPLES: usize = 8;

const TUPLE_HEADER_LEN: usize = 7;

/// Tuple type tags
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TupleType {
    ByteArray = 0,
    CString = 1,
    UInt = 2,
    Int = 3,
}

impl TryFrom<u8> for TupleType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::ByteArray),
            1 => Ok(Self::CString),
            2 => Ok(Self::UInt),
            3 => Ok(Self::Int),
            _ => Err(Error::UnknownType(tag)),
        }
    }
}

/// Decoded tuple payload
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Bytes(&'a [u8]),
    CString(&'a str),
    UInt(u32),
    Int(i32),
    /// Well framed payload that does not decode as its type
    Invalid(Error),
}

impl Value<'_> {
    /// Integer view of the payload.
    ///
    /// Strings count when they hold a decimal number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::UInt(value) => Some(*value as i64),
            Self::Int(value) => Some(*value as i64),
            Self::CString(text) => text.trim().parse().ok(),
            Self::Bytes(_) | Self::Invalid(_) => None,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    pub key: u32,
    pub value: Value<'a>,
}

/// An inbound dictionary with valid framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary<'a> {
    tuples: Vec<Tuple<'a>, MAX_TUPLES>,
}

impl<'a> Dictionary<'a> {
    /// Decode every tuple of `bytes`.
    ///
    /// Truncation, trailing bytes or too many tuples reject the whole
    /// dictionary. A bad value turns into [`Value::Invalid`] for that tuple
    /// alone.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, Error> {
        let (&count, mut rest) = bytes.split_first().ok_or(Error::Truncated)?;
        let mut tuples = Vec::new();

        for _ in 0..count {
            let (tuple, tail) = read_tuple(rest)?;
            tuples.push(tuple).map_err(|_| Error::TooManyTuples)?;
            rest = tail;
        }

        if !rest.is_empty() {
            return Err(Error::TrailingBytes);
        }

        Ok(Self { tuples })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple<'a>> {
        self.tuples.iter()
    }
}

fn read_tuple(bytes: &[u8]) -> Result<(Tuple<'_>, &[u8]), Error> {
    if bytes.len() < TUPLE_HEADER_LEN {
        return Err(Error::Truncated);
    }
    let (header, rest) = bytes.split_at(TUPLE_HEADER_LEN);

    let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u16::from_le_bytes([header[5], header[6]]);

    if rest.len() < len as usize {
        return Err(Error::Truncated);
    }
    let (raw, rest) = rest.split_at(len as usize);

    let value = TupleType::try_from(header[4])
        .and_then(|kind| read_value(kind, raw))
        .unwrap_or_else(Value::Invalid);

    Ok((Tuple { key, value }, rest))
}

fn read_value(kind: TupleType, raw: &[u8]) -> Result<Value<'_>, Error> {
    let width = || Error::BadIntegerWidth(raw.len() as u16);
    Ok(match kind {
        TupleType::ByteArray => Value::Bytes(raw),
        TupleType::CString => Value::CString(read_cstr(raw)?),
        TupleType::UInt => Value::UInt(match *raw {
            [b0] => b0 as u32,
            [b0, b1] => u16::from_le_bytes([b0, b1]) as u32,
            [b0, b1, b2, b3] => u32::from_le_bytes([b0, b1, b2, b3]),
            _ => return Err(width()),
        }),
        TupleType::Int => Value::Int(match *raw {
            [b0] => b0 as i8 as i32,
            [b0, b1] => i16::from_le_bytes([b0, b1]) as i32,
            [b0, b1, b2, b3] => i32::from_le_bytes([b0, b1, b2, b3]),
            _ => return Err(width()),
        }),
    })
}

fn read_cstr(raw: &[u8]) -> Result<&str, Error> {
    let end = raw.iter().position(|&b| b == 0).ok_or(Error::BadString)?;
    core::str::from_utf8(&raw[..end]).map_err(|_| Error::BadString)
}

/// Builds an outbound dictionary in a caller-provided buffer
pub struct Writer<'b> {
    buf: &'b mut [u8],
    len: usize,
    count: u8,
}

impl<'b> Writer<'b> {
    pub fn new(buf: &'b mut [u8]) -> Result<Self, Error> {
        let first = buf.first_mut().ok_or(Error::BufferFull)?;
        *first = 0;
        Ok(Self { buf, len: 1, count: 0 })
    }

    pub fn write_u8(&mut self, key: u32, value: u8) -> Result<(), Error> {
        self.push(key, TupleType::UInt, &[value])
    }

    /// The encoded dictionary.
    pub fn finish(self) -> &'b [u8] {
        let buf: &'b [u8] = self.buf;
        &buf[..self.len]
    }

    fn push(&mut self, key: u32, kind: TupleType, payload: &[u8]) -> Result<(), Error> {
        let start = self.reserve(key, kind, payload.len())?;
        self.buf[start..start + payload.len()].copy_from_slice(payload);
        Ok(())
    }

    /// Write the tuple header and return where its value starts.
    fn reserve(&mut self, key: u32, kind: TupleType, len: usize) -> Result<usize, Error> {
        let value_len = u16::try_from(len).map_err(|_| Error::BufferFull)?;
        let count = self.count.checked_add(1).ok_or(Error::TooManyTuples)?;
        let end = self.len + TUPLE_HEADER_LEN + len;
        if end > self.buf.len() {
            return Err(Error::BufferFull);
        }

        let header = &mut self.buf[self.len..self.len + TUPLE_HEADER_LEN];
        header[..4].copy_from_slice(&key.to_le_bytes());
        header[4] = kind as u8;
        header[5..].copy_from_slice(&value_len.to_le_bytes());

        let start = self.len + TUPLE_HEADER_LEN;
        self.len = end;
        self.count = count;
        self.buf[0] = count;
        Ok(start)
    }
}
