//! Byte-level transcoding of primitives.
//!
//! Every multi-byte value is written in the order chosen by the writer and
//! read back according to the order recorded in the stream, so files move
//! freely between little- and big-endian hosts.

use super::error::{Result, SerializeError};
use bytemuck::Zeroable;
use std::io::{self, Read, Write};
use std::mem::size_of;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order of the running machine, probed once at runtime.
    pub fn native() -> Self {
        static NATIVE: OnceLock<Endianness> = OnceLock::new();
        *NATIVE.get_or_init(|| {
            if u32::from_ne_bytes([1, 2, 3, 4]) == 0x0102_0304 {
                Endianness::Big
            } else {
                Endianness::Little
            }
        })
    }

    pub fn flag(self) -> u8 {
        match self {
            Endianness::Big => 1,
            Endianness::Little => 0,
        }
    }

    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Endianness::Big => "big-endian",
            Endianness::Little => "little-endian",
        }
    }
}

/// A scalar value with a fixed wire encoding.
pub trait Primitive: Sized {
    fn encode(&self, out: &mut dyn Write, order: Endianness) -> Result<()>;
    fn decode(input: &mut dyn Read, order: Endianness) -> Result<Self>;
}

/// A primitive that may travel as one contiguous block inside a vector.
pub trait BulkPrimitive: bytemuck::Pod {
    fn reverse_bytes(self) -> Self;
}

pub(crate) fn write_bytes(out: &mut dyn Write, bytes: &[u8]) -> Result<()> {
    out.write_all(bytes).map_err(SerializeError::Write)
}

pub(crate) fn read_bytes(input: &mut dyn Read, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    Read::take(&mut *input, len as u64).read_to_end(&mut buf).map_err(SerializeError::Read)?;
    if buf.len() != len {
        return Err(SerializeError::Read(io::Error::from(io::ErrorKind::UnexpectedEof)));
    }
    Ok(buf)
}

pub(crate) fn encode_len(out: &mut dyn Write, len: usize, order: Endianness) -> Result<()> {
    let len = i32::try_from(len).map_err(|_| SerializeError::TooLong(len))?;
    len.encode(out, order)
}

pub(crate) fn decode_len(input: &mut dyn Read, order: Endianness) -> Result<usize> {
    let len = i32::decode(input, order)?;
    usize::try_from(len).map_err(|_| SerializeError::InvalidLength(len))
}

macro_rules! numeric_primitive {
    ($($ty:ty),* $(,)?) => {$(
        impl Primitive for $ty {
            fn encode(&self, out: &mut dyn Write, order: Endianness) -> Result<()> {
                let bytes = match order {
                    Endianness::Big => self.to_be_bytes(),
                    Endianness::Little => self.to_le_bytes(),
                };
                write_bytes(out, &bytes)
            }

            fn decode(input: &mut dyn Read, order: Endianness) -> Result<Self> {
                let mut bytes = [0u8; size_of::<$ty>()];
                input.read_exact(&mut bytes).map_err(SerializeError::Read)?;
                Ok(match order {
                    Endianness::Big => <$ty>::from_be_bytes(bytes),
                    Endianness::Little => <$ty>::from_le_bytes(bytes),
                })
            }
        }
    )*};
}

numeric_primitive!(i8, u8, i32, u32, u64, f32, f64);

impl Primitive for bool {
    fn encode(&self, out: &mut dyn Write, _order: Endianness) -> Result<()> {
        write_bytes(out, &[u8::from(*self)])
    }

    fn decode(input: &mut dyn Read, order: Endianness) -> Result<Self> {
        Ok(u8::decode(input, order)? != 0)
    }
}

impl Primitive for String {
    fn encode(&self, out: &mut dyn Write, order: Endianness) -> Result<()> {
        encode_len(out, self.len(), order)?;
        write_bytes(out, self.as_bytes())
    }

    fn decode(input: &mut dyn Read, order: Endianness) -> Result<Self> {
        let len = decode_len(input, order)?;
        let bytes = read_bytes(input, len)?;
        String::from_utf8(bytes).map_err(|_| SerializeError::InvalidString)
    }
}

impl BulkPrimitive for u8 {
    fn reverse_bytes(self) -> Self {
        self
    }
}

impl BulkPrimitive for i32 {
    fn reverse_bytes(self) -> Self {
        self.swap_bytes()
    }
}

impl BulkPrimitive for u32 {
    fn reverse_bytes(self) -> Self {
        self.swap_bytes()
    }
}

impl BulkPrimitive for u64 {
    fn reverse_bytes(self) -> Self {
        self.swap_bytes()
    }
}

impl BulkPrimitive for f32 {
    fn reverse_bytes(self) -> Self {
        f32::from_bits(self.to_bits().swap_bytes())
    }
}

pub(crate) fn encode_bulk<T: BulkPrimitive>(out: &mut dyn Write, values: &[T], order: Endianness) -> Result<()> {
    encode_len(out, values.len(), order)?;
    if order == Endianness::native() {
        write_bytes(out, bytemuck::cast_slice(values))
    } else {
        let swapped: Vec<T> = values.iter().map(|value| value.reverse_bytes()).collect();
        write_bytes(out, bytemuck::cast_slice(&swapped))
    }
}

pub(crate) fn decode_bulk<T: BulkPrimitive>(input: &mut dyn Read, order: Endianness) -> Result<Vec<T>> {
    let len = decode_len(input, order)?;
    let byte_len = len.checked_mul(size_of::<T>()).ok_or(SerializeError::TooLong(len))?;
    let bytes = read_bytes(input, byte_len)?;
    let mut values = vec![T::zeroed(); len];
    bytemuck::cast_slice_mut::<T, u8>(&mut values).copy_from_slice(&bytes);
    if order != Endianness::native() {
        for value in &mut values {
            *value = value.reverse_bytes();
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_probe_matches_target() {
        let expected = if cfg!(target_endian = "big") { Endianness::Big } else { Endianness::Little };
        assert_eq!(Endianness::native(), expected);
        assert_eq!(Endianness::from_flag(Endianness::Big.flag()), Endianness::Big);
        assert_eq!(Endianness::from_flag(Endianness::Little.flag()), Endianness::Little);
    }

    #[test]
    fn bulk_floats_reverse_within_each_element() {
        let values = [1.5f32, -2.25, 1024.0];
        let mut out = Vec::new();
        encode_bulk(&mut out, &values, Endianness::Big).expect("encode");

        let mut expected = 3i32.to_be_bytes().to_vec();
        for value in values {
            expected.extend_from_slice(&value.to_be_bytes());
        }
        assert_eq!(out, expected);

        let decoded: Vec<f32> = decode_bulk(&mut out.as_slice(), Endianness::Big).expect("decode");
        assert_eq!(decoded, values);
    }

    #[test]
    fn bulk_u64_uses_eight_byte_width() {
        let values = [0x0102_0304_0506_0708u64, 9];
        let mut out = Vec::new();
        encode_bulk(&mut out, &values, Endianness::Little).expect("encode");
        assert_eq!(&out[4..12], &0x0102_0304_0506_0708u64.to_le_bytes());
        let decoded: Vec<u64> = decode_bulk(&mut out.as_slice(), Endianness::Little).expect("decode");
        assert_eq!(decoded, values);
    }

    #[test]
    fn negative_length_is_rejected() {
        let mut bytes = (-3i32).to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let err = String::decode(&mut bytes.as_slice(), Endianness::Little).unwrap_err();
        assert!(matches!(err, SerializeError::InvalidLength(-3)));
    }

    #[test]
    fn truncated_string_fails_without_partial_value() {
        let mut bytes = 10i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let err = String::decode(&mut bytes.as_slice(), Endianness::Little).unwrap_err();
        assert!(matches!(err, SerializeError::Read(_)));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut bytes = 2i32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let err = String::decode(&mut bytes.as_slice(), Endianness::Big).unwrap_err();
        assert!(matches!(err, SerializeError::InvalidString));
    }

    #[test]
    fn bool_is_one_byte() {
        let mut out = Vec::new();
        true.encode(&mut out, Endianness::Big).expect("encode");
        false.encode(&mut out, Endianness::Big).expect("encode");
        assert_eq!(out, vec![1, 0]);
    }
}
