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

//! Encoder and decoder for repetition and definition levels.
//!
//! Levels in a v1 data page are RLE/bit-packed hybrid encoded and prefixed
//! with their byte length as a 32-bit little endian integer.

use super::rle::{RleDecoder, RleEncoder};
use crate::errors::Result;
use crate::util::bit_util::num_required_bits;

/// Encodes `levels` with the RLE hybrid, prefixed with a `u32` length.
///
/// The bit width is derived from `max_level`; a `max_level` of zero would
/// mean the column has no levels of this kind and must not be encoded at all.
pub fn encode_rle_levels(levels: &[i16], max_level: i16) -> Vec<u8> {
    debug_assert!(max_level > 0);
    let bit_width = num_required_bits(max_level as u64);
    let mut buffer =
        Vec::with_capacity(RleEncoder::max_buffer_size(bit_width, levels.len()) + 4);
    // placeholder for the length prefix, patched below
    buffer.extend_from_slice(&[0u8; 4]);

    let mut encoder = RleEncoder::new_from_buf(bit_width, buffer);
    for level in levels {
        encoder.put(*level as u64);
    }
    let mut encoded = encoder.consume();

    let encoded_len = (encoded.len() - 4) as u32;
    encoded[0..4].copy_from_slice(&encoded_len.to_le_bytes());
    encoded
}

/// Decodes `num_values` levels from the length-prefixed RLE stream at the
/// front of `data`, returning the levels and the total bytes consumed
/// (including the prefix).
///
/// Every decoded level is validated against `max_level`.
pub fn decode_rle_levels(data: &[u8], num_values: usize, max_level: i16) -> Result<(Vec<i16>, usize)> {
    debug_assert!(max_level > 0);
    let len_bytes: [u8; 4] = data
        .get(..4)
        .ok_or_else(|| corrupt_err!("level stream missing its length prefix"))?
        .try_into()
        .unwrap();
    let byte_len = u32::from_le_bytes(len_bytes) as usize;
    let stream = data
        .get(4..4 + byte_len)
        .ok_or_else(|| corrupt_err!("level stream of {} bytes overruns page", byte_len))?;

    let bit_width = num_required_bits(max_level as u64);
    let mut decoder = RleDecoder::new(bit_width, stream);
    let mut levels = Vec::with_capacity(num_values);
    for _ in 0..num_values {
        let level = decoder
            .get()?
            .ok_or_else(|| corrupt_err!("level stream holds fewer than {} values", num_values))?;
        if level > max_level as u64 {
            return Err(corrupt_err!(
                "level {} out of range for max level {}",
                level,
                max_level
            ));
        }
        levels.push(level as i16);
    }
    Ok((levels, 4 + byte_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_roundtrip() {
        let levels = vec![0i16, 1, 1, 0, 2, 2, 1, 0, 0, 2];
        let encoded = encode_rle_levels(&levels, 2);
        let (decoded, consumed) = decode_rle_levels(&encoded, levels.len(), 2).unwrap();
        assert_eq!(decoded, levels);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn test_levels_length_prefix() {
        let levels = vec![1i16; 100];
        let encoded = encode_rle_levels(&levels, 1);
        let byte_len = u32::from_le_bytes(encoded[0..4].try_into().unwrap()) as usize;
        assert_eq!(byte_len + 4, encoded.len());
    }

    #[test]
    fn test_levels_trailing_data_ignored() {
        let levels = vec![0i16, 1, 0, 1];
        let mut encoded = encode_rle_levels(&levels, 1);
        let expected_consumed = encoded.len();
        // values bytes follow the level stream in a real page
        encoded.extend_from_slice(&[0xAB; 16]);
        let (decoded, consumed) = decode_rle_levels(&encoded, levels.len(), 1).unwrap();
        assert_eq!(decoded, levels);
        assert_eq!(consumed, expected_consumed);
    }

    #[test]
    fn test_levels_out_of_range() {
        let levels = vec![0i16, 3, 1];
        let encoded = encode_rle_levels(&levels, 3);
        // max level 2 has the same bit width but a smaller legal range
        let err = decode_rle_levels(&encoded, levels.len(), 2).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_levels_truncated() {
        let levels = vec![0i16, 1, 0, 1];
        let encoded = encode_rle_levels(&levels, 1);
        assert!(decode_rle_levels(&encoded[..2], levels.len(), 1).is_err());
    }
}
