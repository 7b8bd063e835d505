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

//! Value decoders for the read path: PLAIN and dictionary.

use crate::data_type::ParquetValueType;
use crate::encodings::rle::RleDecoder;
use crate::errors::Result;

/// PLAIN-decodes `num_values` values from `data`.
///
/// Trailing bytes beyond the decoded values are ignored; in a data page the
/// values always run to the end of the page.
pub fn decode_plain<T: ParquetValueType>(
    data: &[u8],
    num_values: usize,
    type_length: usize,
) -> Result<Vec<T>> {
    T::decode_plain(data, num_values, type_length)
}

/// Decodes dictionary-encoded data pages against a dictionary decoded from
/// the chunk's dictionary page.
pub struct DictDecoder<T: ParquetValueType> {
    dict: Vec<T>,
}

impl<T: ParquetValueType> DictDecoder<T> {
    /// Creates a decoder over the given dictionary values.
    pub fn new(dict: Vec<T>) -> Self {
        Self { dict }
    }

    /// Decodes `num_values` values from a data page's value region: one byte
    /// of index bit width followed by RLE/bit-packed indices (without a
    /// length prefix).
    pub fn decode(&self, data: &[u8], num_values: usize) -> Result<Vec<T>> {
        if num_values == 0 {
            return Ok(Vec::new());
        }
        let bit_width = *data
            .first()
            .ok_or_else(|| corrupt_err!("dictionary-encoded page missing bit width byte"))?;
        if bit_width > 32 {
            return Err(corrupt_err!(
                "dictionary index bit width {} out of range",
                bit_width
            ));
        }
        let mut decoder = RleDecoder::new(bit_width, &data[1..]);
        let mut values = Vec::with_capacity(num_values);
        for _ in 0..num_values {
            let index = decoder
                .get()?
                .ok_or_else(|| corrupt_err!("dictionary index stream ended prematurely"))?;
            let value = self.dict.get(index as usize).ok_or_else(|| {
                corrupt_err!(
                    "dictionary index {} out of range for dictionary of {} entries",
                    index,
                    self.dict.len()
                )
            })?;
            values.push(value.clone());
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::ByteArray;

    #[test]
    fn test_decode_plain_ignores_trailing_bytes() {
        let mut data = Vec::new();
        i64::encode_plain(&[7, 8], &mut data, 0).unwrap();
        data.extend_from_slice(&[0xFF; 3]);
        assert_eq!(decode_plain::<i64>(&data, 2, 0).unwrap(), vec![7, 8]);
    }

    #[test]
    fn test_dict_decoder_bad_index() {
        // bit width 2, one bit-packed group starting with index 3
        let data = [2u8, 0b0000_0011, 0b0000_0011, 0];
        let decoder = DictDecoder::new(vec![ByteArray::from("only")]);
        let err = decoder.decode(&data, 1).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_dict_decoder_empty_page() {
        let decoder = DictDecoder::<i32>::new(vec![]);
        assert_eq!(decoder.decode(&[], 0).unwrap(), Vec::<i32>::new());
    }
}
