// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Data types that connect the Parquet physical types with their Rust-specific
//! representations, and the PLAIN codec for each of them.

use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;

use crate::basic::Type;
use crate::errors::Result;
use crate::util::bit_util::{BitReader, BitWriter};

/// Number of seconds in a day.
const SECONDS_PER_DAY: i64 = 86_400;
/// Number of julian days from the start of the julian calendar to the Unix
/// epoch.
const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;

// ----------------------------------------------------------------------
// Scalar wrappers

/// Rust representation for the deprecated INT96 physical type: the first two
/// little endian words hold the nanoseconds within the day, the third the
/// julian day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Int96 {
    value: [u32; 3],
}

impl Int96 {
    /// Creates new INT96 type struct with the given words.
    pub fn new(elem0: u32, elem1: u32, elem2: u32) -> Self {
        Self {
            value: [elem0, elem1, elem2],
        }
    }

    /// Returns underlying data as slice of [`u32`].
    pub fn data(&self) -> &[u32] {
        &self.value
    }

    /// Converts this INT96 into an i64 representing the number of nanoseconds
    /// since the Unix epoch.
    pub fn to_nanos(&self) -> i64 {
        let day = self.value[2] as i64;
        let nanos_of_day = (self.value[1] as i64) << 32 | self.value[0] as i64;
        (day - JULIAN_DAY_OF_EPOCH) * SECONDS_PER_DAY * 1_000_000_000 + nanos_of_day
    }

    /// Builds an INT96 from nanoseconds since the Unix epoch.
    pub fn from_nanos(nanos: i64) -> Self {
        let nanos_per_day = SECONDS_PER_DAY * 1_000_000_000;
        let day = nanos.div_euclid(nanos_per_day) + JULIAN_DAY_OF_EPOCH;
        let nanos_of_day = nanos.rem_euclid(nanos_per_day) as u64;
        Self::new(
            (nanos_of_day & 0xFFFF_FFFF) as u32,
            (nanos_of_day >> 32) as u32,
            day as u32,
        )
    }
}

/// Rust representation for BYTE_ARRAY and the backing storage for
/// FIXED_LEN_BYTE_ARRAY.
#[derive(Clone, Default)]
pub struct ByteArray {
    data: Bytes,
}

impl ByteArray {
    /// Creates new byte array from the given byte buffer.
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Gets length of the underlying byte buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns slice of data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the underlying data interpreted as a UTF-8 string.
    pub fn as_utf8(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.data)?)
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(buf: Vec<u8>) -> ByteArray {
        ByteArray { data: buf.into() }
    }
}

impl From<&str> for ByteArray {
    fn from(s: &str) -> ByteArray {
        ByteArray {
            data: Bytes::copy_from_slice(s.as_bytes()),
        }
    }
}

impl From<String> for ByteArray {
    fn from(s: String) -> ByteArray {
        ByteArray { data: s.into() }
    }
}

impl From<Bytes> for ByteArray {
    fn from(data: Bytes) -> ByteArray {
        ByteArray { data }
    }
}

impl PartialEq for ByteArray {
    fn eq(&self, other: &ByteArray) -> bool {
        self.data == other.data
    }
}

impl Eq for ByteArray {}

impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ByteArray")
            .field("data", &self.data)
            .finish()
    }
}

/// Wrapper type for FIXED_LEN_BYTE_ARRAY.
///
/// The length is not stored per value; it comes from the column descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedLenByteArray(ByteArray);

impl FixedLenByteArray {
    pub fn new(data: ByteArray) -> Self {
        Self(data)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        self.0.data()
    }
}

impl From<Vec<u8>> for FixedLenByteArray {
    fn from(buf: Vec<u8>) -> FixedLenByteArray {
        FixedLenByteArray(buf.into())
    }
}

impl From<ByteArray> for FixedLenByteArray {
    fn from(data: ByteArray) -> FixedLenByteArray {
        FixedLenByteArray(data)
    }
}

// ----------------------------------------------------------------------
// AsBytes

/// Converts an instance of a data type to a slice of bytes.
pub trait AsBytes {
    /// Returns the contents of this instance as a slice of bytes.
    fn as_bytes(&self) -> &[u8];
}

macro_rules! gen_as_bytes {
    ($source_ty:ident) => {
        impl AsBytes for $source_ty {
            #[allow(clippy::size_of_in_element_count)]
            fn as_bytes(&self) -> &[u8] {
                unsafe {
                    std::slice::from_raw_parts(
                        self as *const $source_ty as *const u8,
                        std::mem::size_of::<$source_ty>(),
                    )
                }
            }
        }
    };
}

gen_as_bytes!(bool);
gen_as_bytes!(i32);
gen_as_bytes!(i64);
gen_as_bytes!(f32);
gen_as_bytes!(f64);

impl AsBytes for Int96 {
    fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.value.as_ptr() as *const u8, 12) }
    }
}

impl AsBytes for ByteArray {
    fn as_bytes(&self) -> &[u8] {
        self.data()
    }
}

impl AsBytes for FixedLenByteArray {
    fn as_bytes(&self) -> &[u8] {
        self.data()
    }
}

// ----------------------------------------------------------------------
// ParquetValueType

/// A physical type handler: the PLAIN codec for one of the eight physical
/// types plus the metadata statistics and dictionaries need.
///
/// `type_length` is only meaningful for FIXED_LEN_BYTE_ARRAY and is ignored
/// by the other implementations.
pub trait ParquetValueType:
    PartialEq + Clone + Default + fmt::Debug + Send + AsBytes + 'static
{
    const PHYSICAL_TYPE: Type;

    /// PLAIN-encodes `values` onto the end of `buffer`.
    fn encode_plain(values: &[Self], buffer: &mut Vec<u8>, type_length: usize) -> Result<()>;

    /// PLAIN-decodes exactly `num_values` values from the front of `data`.
    fn decode_plain(data: &[u8], num_values: usize, type_length: usize) -> Result<Vec<Self>>;

    /// Bytes this value contributes to a PLAIN-encoded dictionary page.
    fn dict_encoded_size(&self, type_length: usize) -> usize;

    /// Ordering used for min/max statistics, or `None` when the type carries
    /// no defined order (INT96, fixed-length binaries holding signed
    /// decimals).
    fn compare(a: &Self, b: &Self) -> Option<Ordering>;
}

impl ParquetValueType for bool {
    const PHYSICAL_TYPE: Type = Type::BOOLEAN;

    fn encode_plain(values: &[Self], buffer: &mut Vec<u8>, _type_length: usize) -> Result<()> {
        let mut writer = BitWriter::new_from_buf(std::mem::take(buffer));
        for value in values {
            writer.put_value(*value as u64, 1);
        }
        *buffer = writer.consume();
        Ok(())
    }

    fn decode_plain(data: &[u8], num_values: usize, _type_length: usize) -> Result<Vec<Self>> {
        let mut reader = BitReader::new(data);
        let mut values = Vec::with_capacity(num_values);
        for _ in 0..num_values {
            let bit = reader
                .get_value(1)
                .ok_or_else(|| eof_err!("not enough bits for {} booleans", num_values))?;
            values.push(bit != 0);
        }
        Ok(values)
    }

    fn dict_encoded_size(&self, _type_length: usize) -> usize {
        1
    }

    fn compare(a: &Self, b: &Self) -> Option<Ordering> {
        Some(a.cmp(b))
    }
}

macro_rules! impl_fixed_width_value_type {
    ($source_ty:ident, $physical_ty:expr, $num_bytes:expr) => {
        impl ParquetValueType for $source_ty {
            const PHYSICAL_TYPE: Type = $physical_ty;

            fn encode_plain(
                values: &[Self],
                buffer: &mut Vec<u8>,
                _type_length: usize,
            ) -> Result<()> {
                buffer.reserve(values.len() * $num_bytes);
                for value in values {
                    buffer.extend_from_slice(&value.to_le_bytes());
                }
                Ok(())
            }

            fn decode_plain(
                data: &[u8],
                num_values: usize,
                _type_length: usize,
            ) -> Result<Vec<Self>> {
                if data.len() < num_values * $num_bytes {
                    return Err(eof_err!(
                        "expected {} bytes of {} data, got {}",
                        num_values * $num_bytes,
                        stringify!($source_ty),
                        data.len()
                    ));
                }
                Ok(data[..num_values * $num_bytes]
                    .chunks_exact($num_bytes)
                    .map(|chunk| Self::from_le_bytes(chunk.try_into().unwrap()))
                    .collect())
            }

            fn dict_encoded_size(&self, _type_length: usize) -> usize {
                $num_bytes
            }

            fn compare(a: &Self, b: &Self) -> Option<Ordering> {
                a.partial_cmp(b)
            }
        }
    };
}

impl_fixed_width_value_type!(i32, Type::INT32, 4);
impl_fixed_width_value_type!(i64, Type::INT64, 8);
impl_fixed_width_value_type!(f32, Type::FLOAT, 4);
impl_fixed_width_value_type!(f64, Type::DOUBLE, 8);

impl ParquetValueType for Int96 {
    const PHYSICAL_TYPE: Type = Type::INT96;

    fn encode_plain(values: &[Self], buffer: &mut Vec<u8>, _type_length: usize) -> Result<()> {
        buffer.reserve(values.len() * 12);
        for value in values {
            for word in value.data() {
                buffer.extend_from_slice(&word.to_le_bytes());
            }
        }
        Ok(())
    }

    fn decode_plain(data: &[u8], num_values: usize, _type_length: usize) -> Result<Vec<Self>> {
        if data.len() < num_values * 12 {
            return Err(eof_err!(
                "expected {} bytes of INT96 data, got {}",
                num_values * 12,
                data.len()
            ));
        }
        Ok(data[..num_values * 12]
            .chunks_exact(12)
            .map(|chunk| {
                Int96::new(
                    u32::from_le_bytes(chunk[0..4].try_into().unwrap()),
                    u32::from_le_bytes(chunk[4..8].try_into().unwrap()),
                    u32::from_le_bytes(chunk[8..12].try_into().unwrap()),
                )
            })
            .collect())
    }

    fn dict_encoded_size(&self, _type_length: usize) -> usize {
        12
    }

    fn compare(_a: &Self, _b: &Self) -> Option<Ordering> {
        // INT96 has no defined sort order
        None
    }
}

impl ParquetValueType for ByteArray {
    const PHYSICAL_TYPE: Type = Type::BYTE_ARRAY;

    fn encode_plain(values: &[Self], buffer: &mut Vec<u8>, _type_length: usize) -> Result<()> {
        for value in values {
            buffer.extend_from_slice(&(value.len() as u32).to_le_bytes());
            buffer.extend_from_slice(value.data());
        }
        Ok(())
    }

    fn decode_plain(data: &[u8], num_values: usize, _type_length: usize) -> Result<Vec<Self>> {
        let mut values = Vec::with_capacity(num_values);
        let mut offset = 0usize;
        for _ in 0..num_values {
            let len_bytes: [u8; 4] = data
                .get(offset..offset + 4)
                .ok_or_else(|| eof_err!("missing byte array length prefix"))?
                .try_into()
                .unwrap();
            let len = u32::from_le_bytes(len_bytes) as usize;
            offset += 4;
            let bytes = data
                .get(offset..offset + len)
                .ok_or_else(|| eof_err!("byte array of {} bytes overruns page", len))?;
            offset += len;
            values.push(ByteArray::from(bytes.to_vec()));
        }
        Ok(values)
    }

    fn dict_encoded_size(&self, _type_length: usize) -> usize {
        4 + self.len()
    }

    fn compare(a: &Self, b: &Self) -> Option<Ordering> {
        // unsigned lexicographic, matching the UTF8 sort order
        Some(a.data().cmp(b.data()))
    }
}

impl ParquetValueType for FixedLenByteArray {
    const PHYSICAL_TYPE: Type = Type::FIXED_LEN_BYTE_ARRAY;

    fn encode_plain(values: &[Self], buffer: &mut Vec<u8>, type_length: usize) -> Result<()> {
        for value in values {
            if value.len() != type_length {
                return Err(invalid_err!(
                    "fixed length byte array of {} bytes does not match type length {}",
                    value.len(),
                    type_length
                ));
            }
            buffer.extend_from_slice(value.data());
        }
        Ok(())
    }

    fn decode_plain(data: &[u8], num_values: usize, type_length: usize) -> Result<Vec<Self>> {
        if data.len() < num_values * type_length {
            return Err(eof_err!(
                "expected {} bytes of fixed length data, got {}",
                num_values * type_length,
                data.len()
            ));
        }
        Ok(data[..num_values * type_length]
            .chunks_exact(type_length.max(1))
            .take(num_values)
            .map(|chunk| FixedLenByteArray::from(chunk.to_vec()))
            .collect())
    }

    fn dict_encoded_size(&self, type_length: usize) -> usize {
        type_length
    }

    fn compare(_a: &Self, _b: &Self) -> Option<Ordering> {
        // fixed length binaries usually hold big-endian two's-complement
        // decimals whose order is not the byte order
        None
    }
}

// ----------------------------------------------------------------------
// Decimal helpers

/// Byte length of the two's-complement big-endian representation able to hold
/// any unscaled decimal of the given precision.
pub fn decimal_length_from_precision(precision: i32) -> usize {
    let max_unscaled = 10u128.pow(precision as u32) - 1;
    let mut length = 1;
    while max_unscaled > (1u128 << (8 * length - 1)) - 1 {
        length += 1;
    }
    length
}

/// Encodes an unscaled decimal as a two's-complement big-endian byte string
/// of exactly `length` bytes.
pub fn decimal_to_bytes(unscaled: i128, length: usize) -> Vec<u8> {
    let bytes = unscaled.to_be_bytes();
    bytes[16 - length..].to_vec()
}

/// Decodes a two's-complement big-endian byte string into an unscaled
/// decimal, sign-extending to 128 bits.
pub fn decimal_from_bytes(bytes: &[u8]) -> i128 {
    // wider storage than i128 keeps only the low 16 bytes
    let bytes = &bytes[bytes.len().saturating_sub(16)..];
    let mut buf = if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        [0xFFu8; 16]
    } else {
        [0u8; 16]
    };
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    i128::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int96_nanos_roundtrip() {
        for nanos in [0i64, 1, -1, 86_400_000_000_000, 1_234_567_890_123_456_789] {
            assert_eq!(Int96::from_nanos(nanos).to_nanos(), nanos);
        }
    }

    #[test]
    fn test_int96_epoch() {
        // midnight at the epoch is julian day 2440588 with zero nanos
        let v = Int96::from_nanos(0);
        assert_eq!(v.data(), &[0, 0, 2_440_588]);
    }

    #[test]
    fn test_bool_plain_roundtrip() {
        let values: Vec<bool> = (0..13).map(|i| i % 3 == 0).collect();
        let mut buffer = Vec::new();
        bool::encode_plain(&values, &mut buffer, 0).unwrap();
        assert_eq!(buffer.len(), 2);
        let decoded = bool::decode_plain(&buffer, values.len(), 0).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_i32_plain_roundtrip() {
        let values = vec![1i32, -2, 3, i32::MIN, i32::MAX];
        let mut buffer = Vec::new();
        i32::encode_plain(&values, &mut buffer, 0).unwrap();
        assert_eq!(buffer.len(), 20);
        assert_eq!(i32::decode_plain(&buffer, 5, 0).unwrap(), values);
    }

    #[test]
    fn test_byte_array_plain_roundtrip() {
        let values: Vec<ByteArray> = vec!["".into(), "a".into(), "hello".into()];
        let mut buffer = Vec::new();
        ByteArray::encode_plain(&values, &mut buffer, 0).unwrap();
        let decoded = ByteArray::decode_plain(&buffer, 3, 0).unwrap();
        assert_eq!(decoded, values);
        assert_eq!(decoded[2].as_utf8().unwrap(), "hello");
    }

    #[test]
    fn test_byte_array_truncated() {
        let values: Vec<ByteArray> = vec!["hello".into()];
        let mut buffer = Vec::new();
        ByteArray::encode_plain(&values, &mut buffer, 0).unwrap();
        buffer.truncate(buffer.len() - 1);
        assert!(ByteArray::decode_plain(&buffer, 1, 0).is_err());
    }

    #[test]
    fn test_fixed_len_byte_array_plain_roundtrip() {
        let values: Vec<FixedLenByteArray> =
            vec![vec![1u8, 2, 3].into(), vec![4u8, 5, 6].into()];
        let mut buffer = Vec::new();
        FixedLenByteArray::encode_plain(&values, &mut buffer, 3).unwrap();
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(FixedLenByteArray::decode_plain(&buffer, 2, 3).unwrap(), values);
    }

    #[test]
    fn test_fixed_len_byte_array_wrong_length() {
        let values: Vec<FixedLenByteArray> = vec![vec![1u8, 2].into()];
        let mut buffer = Vec::new();
        assert!(FixedLenByteArray::encode_plain(&values, &mut buffer, 3).is_err());
    }

    #[test]
    fn test_decimal_length_from_precision() {
        assert_eq!(decimal_length_from_precision(1), 1);
        assert_eq!(decimal_length_from_precision(2), 1);
        assert_eq!(decimal_length_from_precision(3), 2);
        assert_eq!(decimal_length_from_precision(9), 4);
        assert_eq!(decimal_length_from_precision(18), 8);
        assert_eq!(decimal_length_from_precision(38), 16);
    }

    #[test]
    fn test_decimal_bytes_roundtrip() {
        for unscaled in [0i128, 1, -1, 127, -128, 10_000, -10_000, i64::MAX as i128] {
            let length = 9;
            let bytes = decimal_to_bytes(unscaled, length);
            assert_eq!(bytes.len(), length);
            assert_eq!(decimal_from_bytes(&bytes), unscaled);
        }
    }
}
