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

//! Value encoders for the write path: PLAIN and dictionary.

use bytes::Bytes;

use crate::basic::Encoding;
use crate::data_type::ParquetValueType;
use crate::encodings::rle::RleEncoder;
use crate::errors::Result;
use crate::util::bit_util::num_required_bits;
use crate::util::interner::Interner;

// ----------------------------------------------------------------------
// Encoder trait

/// An encoder for the values of one physical type.
pub trait Encoder<T: ParquetValueType> {
    /// Encodes values from `values`.
    fn put(&mut self, values: &[T]) -> Result<()>;

    /// Returns the encoding in the data pages produced by this encoder.
    fn encoding(&self) -> Encoding;

    /// Flushes the underlying byte buffer that has been built so far.
    fn flush_buffer(&mut self) -> Result<Bytes>;
}

// ----------------------------------------------------------------------
// PLAIN encoding

/// The plain encoding: values back to back.
///
/// - booleans are bit-packed, one bit per value, LSB first
/// - fixed width values are little endian
/// - BYTE_ARRAY values carry a `u32` little endian length prefix
/// - FIXED_LEN_BYTE_ARRAY values are raw bytes of the schema's type length
pub struct PlainEncoder<T: ParquetValueType> {
    buffer: Vec<u8>,
    type_length: usize,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: ParquetValueType> PlainEncoder<T> {
    /// Creates a new plain encoder. `type_length` is only used by
    /// FIXED_LEN_BYTE_ARRAY.
    pub fn new(type_length: usize) -> Self {
        Self {
            buffer: Vec::new(),
            type_length,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: ParquetValueType> Encoder<T> for PlainEncoder<T> {
    fn put(&mut self, values: &[T]) -> Result<()> {
        T::encode_plain(values, &mut self.buffer, self.type_length)
    }

    fn encoding(&self) -> Encoding {
        Encoding::PLAIN
    }

    fn flush_buffer(&mut self) -> Result<Bytes> {
        Ok(std::mem::take(&mut self.buffer).into())
    }
}

// ----------------------------------------------------------------------
// Dictionary encoding

/// Dictionary encoder.
///
/// The dictionary encoding builds a dictionary of values encountered in a
/// given column. The dictionary page is written first, before the data pages
/// of the column chunk.
///
/// Dictionary page format: the entries in the dictionary - in dictionary
/// order - using the plain encoding.
///
/// Data page format: the bit width used to encode the entry ids stored as 1
/// byte (max bit width = 32), followed by the values encoded using RLE/Bit
/// packed (with the given bit width).
pub struct DictEncoder<T: ParquetValueType> {
    interner: Interner<T>,

    /// The buffered indices
    indices: Vec<u64>,

    /// Size of the distinct values in the dictionary, in bytes.
    dict_encoded_size: usize,

    type_length: usize,
}

impl<T: ParquetValueType> DictEncoder<T> {
    /// Creates new dictionary encoder.
    pub fn new(type_length: usize) -> Self {
        Self {
            interner: Interner::new(),
            indices: vec![],
            dict_encoded_size: 0,
            type_length,
        }
    }

    /// Returns number of unique values (keys) in the dictionary.
    pub fn num_entries(&self) -> usize {
        self.interner.values().len()
    }

    /// Returns size of unique values (keys) in the dictionary, in bytes.
    pub fn dict_encoded_size(&self) -> usize {
        self.dict_encoded_size
    }

    /// Writes out the dictionary values with PLAIN encoding in a byte buffer,
    /// and returns the result.
    pub fn write_dict(&self) -> Result<Bytes> {
        let mut buffer = Vec::with_capacity(self.dict_encoded_size);
        T::encode_plain(self.interner.values(), &mut buffer, self.type_length)?;
        Ok(buffer.into())
    }

    /// Writes out a prefix byte with the index bit width followed by the
    /// buffered indices with RLE encoding, and returns the result.
    ///
    /// Indices in a data page intentionally carry no `u32` length prefix.
    pub fn write_indices(&mut self, range: std::ops::Range<usize>) -> Result<Bytes> {
        let bit_width = self.bit_width();
        let indices = &self.indices[range];
        let mut buffer =
            Vec::with_capacity(1 + RleEncoder::max_buffer_size(bit_width, indices.len()));
        buffer.push(bit_width);
        let mut encoder = RleEncoder::new_from_buf(bit_width, buffer);
        for index in indices {
            encoder.put(*index);
        }
        Ok(encoder.consume().into())
    }

    #[inline]
    fn bit_width(&self) -> u8 {
        num_required_bits(self.num_entries().saturating_sub(1) as u64)
    }
}

impl<T: ParquetValueType> Encoder<T> for DictEncoder<T> {
    fn put(&mut self, values: &[T]) -> Result<()> {
        self.indices.reserve(values.len());
        for value in values {
            let before = self.num_entries();
            let key = self.interner.intern(value);
            if self.num_entries() > before {
                self.dict_encoded_size += value.dict_encoded_size(self.type_length);
            }
            self.indices.push(key);
        }
        Ok(())
    }

    fn encoding(&self) -> Encoding {
        Encoding::PLAIN_DICTIONARY
    }

    fn flush_buffer(&mut self) -> Result<Bytes> {
        let buffer = self.write_indices(0..self.indices.len())?;
        self.indices.clear();
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::ByteArray;
    use crate::encodings::decoding::DictDecoder;

    #[test]
    fn test_plain_encoder_i32() {
        let mut encoder = PlainEncoder::<i32>::new(0);
        encoder.put(&[1, 2]).unwrap();
        encoder.put(&[3]).unwrap();
        let buffer = encoder.flush_buffer().unwrap();
        assert_eq!(
            buffer.as_ref(),
            &[1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0][..]
        );
    }

    #[test]
    fn test_dict_encoder_dedupes() {
        let mut encoder = DictEncoder::<i32>::new(0);
        encoder.put(&[10, 20, 10, 10, 30, 20]).unwrap();
        assert_eq!(encoder.num_entries(), 3);
        assert_eq!(encoder.dict_encoded_size(), 12);
    }

    #[test]
    fn test_dict_encoder_roundtrip() {
        let values: Vec<ByteArray> = vec![
            "london".into(),
            "paris".into(),
            "london".into(),
            "berlin".into(),
        ];
        let mut encoder = DictEncoder::<ByteArray>::new(0);
        encoder.put(&values).unwrap();

        let dict_bytes = encoder.write_dict().unwrap();
        let indices = encoder.flush_buffer().unwrap();

        let dict = ByteArray::decode_plain(&dict_bytes, encoder.num_entries(), 0).unwrap();
        let decoder = DictDecoder::new(dict);
        let decoded = decoder.decode(&indices, values.len()).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_dict_encoder_single_value_zero_bit_width() {
        let mut encoder = DictEncoder::<i64>::new(0);
        encoder.put(&[42, 42, 42]).unwrap();
        assert_eq!(encoder.num_entries(), 1);
        let indices = encoder.flush_buffer().unwrap();
        // bit width byte of zero
        assert_eq!(indices[0], 0);

        let decoder = DictDecoder::new(vec![42i64]);
        assert_eq!(decoder.decode(&indices, 3).unwrap(), vec![42, 42, 42]);
    }
}
