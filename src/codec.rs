use std::{
    fmt::Debug,
    io::{self, Write},
    marker::PhantomData,
    mem::size_of,
    ops::{Deref, DerefMut},
};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use paste::paste;
use thiserror::Error;

pub use jdwp_macros::{JdwpReadable, JdwpWritable};

use crate::spec::ErrorCode;

/// Failure to decode a value from an incoming packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read ran past the end of the packet.
    #[error("read of {needed} bytes at offset {position} overruns the packet end at {end}")]
    OutOfBounds {
        position: usize,
        needed: usize,
        end: usize,
    },
    /// A discriminator, count or flag set had a value that is not allowed
    /// there.
    #[error("invalid {what} value: {value}")]
    InvalidValue { what: &'static str, value: i64 },
    #[error("string is neither UTF-8 nor modified UTF-8")]
    InvalidString,
}

impl DecodeError {
    /// The error code to reply with, or `None` if the error is a framing
    /// violation that ends the session.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            DecodeError::OutOfBounds { .. } => None,
            DecodeError::InvalidValue {
                what: "EventKind", ..
            } => Some(ErrorCode::InvalidEventType),
            DecodeError::InvalidValue { .. } => Some(ErrorCode::IllegalArgument),
            DecodeError::InvalidString => Some(ErrorCode::InvalidString),
        }
    }
}

#[derive(Debug)]
pub struct JdwpWriter<W: Write> {
    write: W,
}

impl<W: Write> JdwpWriter<W> {
    pub fn new(write: W) -> Self {
        Self { write }
    }

    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<W: Write> Deref for JdwpWriter<W> {
    type Target = W;

    fn deref(&self) -> &Self::Target {
        &self.write
    }
}

impl<W: Write> DerefMut for JdwpWriter<W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.write
    }
}

/// A cursor over `[start, end)` of a packet buffer.
///
/// The cursor only moves forward, and a read that would cross `end` fails
/// without consuming anything.
#[derive(Debug, Clone)]
pub struct JdwpReader<'a> {
    buf: &'a [u8],
    position: usize,
    end: usize,
}

impl<'a> JdwpReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::bounded(buf, 0, buf.len())
    }

    /// `end` is clamped to the buffer length.
    pub fn bounded(buf: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(buf.len());
        Self {
            buf,
            position: start.min(end),
            end,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.end - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, needed: usize) -> Result<&'a [u8], DecodeError> {
        if needed > self.remaining() {
            return Err(DecodeError::OutOfBounds {
                position: self.position,
                needed,
                end: self.end,
            });
        }
        let bytes = &self.buf[self.position..self.position + needed];
        self.position += needed;
        Ok(bytes)
    }

    /// Reads an `int` count prefix, rejecting negative values.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize, DecodeError> {
        let count = i32::read(self)?;
        usize::try_from(count).map_err(|_| DecodeError::InvalidValue {
            what,
            value: count.into(),
        })
    }
}

pub trait JdwpReadable: Sized {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError>;
}

pub trait JdwpWritable {
    /// Exact number of bytes [JdwpWritable::write] produces.
    fn length(&self) -> usize;

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()>;
}

impl JdwpReadable for () {
    #[inline]
    fn read(_: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        Ok(())
    }
}

impl JdwpWritable for () {
    #[inline]
    fn length(&self) -> usize {
        0
    }

    #[inline]
    fn write<W: Write>(&self, _: &mut JdwpWriter<W>) -> io::Result<()> {
        Ok(())
    }
}

impl<T> JdwpReadable for PhantomData<T> {
    #[inline]
    fn read(_: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        Ok(PhantomData)
    }
}

impl<T> JdwpWritable for PhantomData<T> {
    #[inline]
    fn length(&self) -> usize {
        0
    }

    #[inline]
    fn write<W: Write>(&self, _: &mut JdwpWriter<W>) -> io::Result<()> {
        Ok(())
    }
}

impl JdwpReadable for bool {
    #[inline]
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        u8::read(read).map(|n| n != 0)
    }
}

impl JdwpWritable for bool {
    #[inline]
    fn length(&self) -> usize {
        1
    }

    #[inline]
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write.write_u8(u8::from(*self))
    }
}

// single bytes have no endianness, so they don't fit the macro below

impl JdwpReadable for i8 {
    #[inline]
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        u8::read(read).map(|b| b as i8)
    }
}

impl JdwpWritable for i8 {
    #[inline]
    fn length(&self) -> usize {
        1
    }

    #[inline]
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write.write_i8(*self)
    }
}

impl JdwpReadable for u8 {
    #[inline]
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        read.read_bytes(1).map(|b| b[0])
    }
}

impl JdwpWritable for u8 {
    #[inline]
    fn length(&self) -> usize {
        1
    }

    #[inline]
    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        write.write_u8(*self)
    }
}

macro_rules! int_io {
    ($($types:ident),* $(,)?) => {
        $(
            impl JdwpReadable for $types {
                #[inline]
                fn read(reader: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
                    let bytes = reader.read_bytes(size_of::<$types>())?;
                    paste! {
                        Ok(BigEndian::[<read_ $types>](bytes))
                    }
                }
            }

            impl JdwpWritable for $types {
                #[inline]
                fn length(&self) -> usize {
                    size_of::<$types>()
                }

                #[inline]
                fn write<W: Write>(&self, writer: &mut JdwpWriter<W>) -> io::Result<()> {
                    paste! {
                        writer.[<write_ $types>]::<BigEndian>(*self)
                    }
                }
            }
        )*
    };
}

int_io![i16, u16, i32, u32, i64, u64, f32, f64];

impl JdwpReadable for String {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        let len = read.read_count("string length")?;
        let bytes = read.read_bytes(len)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            // some front-ends send Java's modified UTF-8 verbatim
            Err(_) => cesu8::from_java_cesu8(bytes)
                .map(|s| s.into_owned())
                .map_err(|_| DecodeError::InvalidString),
        }
    }
}

impl JdwpWritable for String {
    fn length(&self) -> usize {
        4 + self.len()
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        (self.len() as u32).write(write)?;
        write.write_all(self.as_bytes())
    }
}

impl<T: JdwpReadable> JdwpReadable for Vec<T> {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        let len = read.read_count("list length")?;
        // every element takes at least a byte, so this caps the allocation
        let mut res = Vec::with_capacity(len.min(read.remaining()));
        for _ in 0..len {
            res.push(T::read(read)?);
        }
        Ok(res)
    }
}

impl<T: JdwpWritable> JdwpWritable for Vec<T> {
    fn length(&self) -> usize {
        self.as_slice().length()
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        self.as_slice().write(write)
    }
}

impl<T: JdwpWritable> JdwpWritable for [T] {
    fn length(&self) -> usize {
        4 + self.iter().map(JdwpWritable::length).sum::<usize>()
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        (self.len() as u32).write(write)?;
        for item in self {
            item.write(write)?;
        }
        Ok(())
    }
}

// fixed-size arrays carry no count prefix
impl<const N: usize> JdwpReadable for [bool; N] {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        let mut flags = [false; N];
        for flag in &mut flags {
            *flag = bool::read(read)?;
        }
        Ok(flags)
    }
}

impl<const N: usize> JdwpWritable for [bool; N] {
    fn length(&self) -> usize {
        N
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        for flag in self {
            flag.write(write)?;
        }
        Ok(())
    }
}

impl<A: JdwpReadable, B: JdwpReadable> JdwpReadable for (A, B) {
    fn read(read: &mut JdwpReader<'_>) -> Result<Self, DecodeError> {
        Ok((A::read(read)?, B::read(read)?))
    }
}

impl<A: JdwpWritable, B: JdwpWritable> JdwpWritable for (A, B) {
    fn length(&self) -> usize {
        self.0.length() + self.1.length()
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        self.0.write(write)?;
        self.1.write(write)
    }
}

impl<T: JdwpWritable + ?Sized> JdwpWritable for &T {
    fn length(&self) -> usize {
        (**self).length()
    }

    fn write<W: Write>(&self, write: &mut JdwpWriter<W>) -> io::Result<()> {
        (**self).write(write)
    }
}

/// Encodes a value into a fresh buffer, checking it against its reported
/// length.
pub fn encode<T: JdwpWritable + ?Sized>(value: &T) -> io::Result<Vec<u8>> {
    let expected = value.length();
    let mut writer = JdwpWriter::new(Vec::with_capacity(expected));
    value.write(&mut writer)?;
    let bytes = writer.into_inner();
    if bytes.len() != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("reported length {expected} but wrote {} bytes", bytes.len()),
        ));
    }
    Ok(bytes)
}
