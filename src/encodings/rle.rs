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

//! RLE/Bit-Packing hybrid encoding, used for repetition and definition
//! levels and for dictionary indices.
//!
//! The grammar for this encoding is:
//!
//! ```text
//! rle-bit-packed-hybrid: <runs>
//! runs := <run>*
//! run := <bit-packed-run> | <rle-run>
//! bit-packed-run := <bit-packed-header> <bit-packed-values>
//! bit-packed-header := varint-encode(<bit-pack-count> / 8 << 1 | 1)
//! bit-packed-values := bit packed, 8 values at a time, LSB first
//! rle-run := <rle-header> <repeated-value>
//! rle-header := varint-encode(rle-run-len << 1)
//! repeated-value := value stored in ceil(bit-width / 8) bytes
//! ```

use crate::errors::Result;
use crate::util::bit_util::{ceil, BitReader, BitWriter};

/// Keep the bit-packed header to a single varint byte, limiting a bit-packed
/// run to 63 groups of 8 values.
const MAX_GROUPS_PER_BIT_PACKED_RUN: usize = (1 << 6) - 1;

/// RLE/bit-packed hybrid encoder.
///
/// Values are buffered in groups of 8; once a value repeats 8 or more times
/// the run switches to RLE, otherwise groups are appended to an open
/// bit-packed run whose single header byte is patched when the run closes.
pub struct RleEncoder {
    bit_width: u8,
    bit_writer: BitWriter,

    /// Buffered values not yet committed to a run, at most 8.
    buffered_values: [u64; 8],
    num_buffered_values: usize,

    /// The current (possibly repeating) value and its repeat count.
    current_value: u64,
    repeat_count: usize,

    /// Number of values committed to the open bit-packed run, a multiple
    /// of 8.
    bit_packed_count: usize,
    /// Position of the open bit-packed run's header byte, if any.
    indicator_byte_pos: Option<usize>,
}

impl RleEncoder {
    pub fn new(bit_width: u8, buffer_len: usize) -> Self {
        Self::new_from_buf(bit_width, Vec::with_capacity(buffer_len))
    }

    /// Creates an encoder appending to an existing buffer (e.g. one that
    /// already holds a placeholder length prefix or a bit width byte).
    pub fn new_from_buf(bit_width: u8, buffer: Vec<u8>) -> Self {
        Self {
            bit_width,
            bit_writer: BitWriter::new_from_buf(buffer),
            buffered_values: [0; 8],
            num_buffered_values: 0,
            current_value: 0,
            repeat_count: 0,
            bit_packed_count: 0,
            indicator_byte_pos: None,
        }
    }

    /// Upper bound on the encoded size of `num_values` values of the given
    /// bit width, assuming the worst case of all-literal runs.
    pub fn max_buffer_size(bit_width: u8, num_values: usize) -> usize {
        let num_groups = ceil(num_values, 8);
        // one header byte per group plus 8 packed values
        num_groups + num_groups * bit_width as usize + ceil(bit_width as usize, 8) + 1
    }

    /// Encodes `value`. `value` must fit in `bit_width` bits.
    pub fn put(&mut self, value: u64) {
        if self.repeat_count > 0 && value == self.current_value {
            self.repeat_count += 1;
            if self.repeat_count > 8 {
                // Already part of a committed RLE run; the buffered values
                // were dropped when the run reached 8.
                return;
            }
        } else {
            if self.repeat_count >= 8 {
                debug_assert_eq!(self.bit_packed_count, 0);
                self.flush_rle_run();
            }
            self.repeat_count = 1;
            self.current_value = value;
        }

        self.buffered_values[self.num_buffered_values] = value;
        self.num_buffered_values += 1;
        if self.num_buffered_values == 8 {
            debug_assert_eq!(self.bit_packed_count % 8, 0);
            self.flush_buffered_values();
        }
    }

    /// Flushes any pending run and returns the underlying buffer.
    pub fn consume(mut self) -> Vec<u8> {
        self.flush();
        self.bit_writer.consume()
    }

    /// Flushes any pending run to the underlying writer.
    pub fn flush(&mut self) {
        if self.bit_packed_count > 0 || self.repeat_count > 0 || self.num_buffered_values > 0 {
            let all_repeat = self.bit_packed_count == 0
                && (self.repeat_count == self.num_buffered_values || self.num_buffered_values == 0);
            if self.repeat_count > 0 && all_repeat {
                self.flush_rle_run();
            } else {
                // Pad the last group out to 8 values with zeros.
                while self.num_buffered_values > 0 && self.num_buffered_values < 8 {
                    self.buffered_values[self.num_buffered_values] = 0;
                    self.num_buffered_values += 1;
                }
                self.bit_packed_count += self.num_buffered_values;
                self.flush_bit_packed_run(true);
                self.repeat_count = 0;
            }
        }
    }

    fn flush_rle_run(&mut self) {
        debug_assert!(self.repeat_count > 0);
        self.bit_writer.put_vlq_int((self.repeat_count as u64) << 1);
        self.bit_writer
            .put_aligned(self.current_value, ceil(self.bit_width as usize, 8));
        self.num_buffered_values = 0;
        self.repeat_count = 0;
    }

    fn flush_buffered_values(&mut self) {
        if self.repeat_count >= 8 {
            // The 8 buffered values all belong to an RLE run in progress;
            // drop them, they are accounted for in `repeat_count`.
            self.num_buffered_values = 0;
            if self.bit_packed_count > 0 {
                self.flush_bit_packed_run(true);
            }
            return;
        }

        self.bit_packed_count += self.num_buffered_values;
        let num_groups = self.bit_packed_count / 8;
        if num_groups >= MAX_GROUPS_PER_BIT_PACKED_RUN {
            self.flush_bit_packed_run(true);
        } else {
            self.flush_bit_packed_run(false);
        }
        self.repeat_count = 0;
    }

    fn flush_bit_packed_run(&mut self, close_run: bool) {
        if self.indicator_byte_pos.is_none() {
            self.indicator_byte_pos = Some(self.bit_writer.skip(1));
        }

        for i in 0..self.num_buffered_values {
            self.bit_writer
                .put_value(self.buffered_values[i], self.bit_width as usize);
        }
        self.num_buffered_values = 0;

        if close_run {
            let num_groups = self.bit_packed_count / 8;
            let indicator_byte = ((num_groups << 1) | 1) as u8;
            self.bit_writer
                .put_aligned_offset(indicator_byte, self.indicator_byte_pos.take().unwrap());
            self.bit_packed_count = 0;
        }
    }
}

/// RLE/bit-packed hybrid decoder.
pub struct RleDecoder<'a> {
    bit_width: u8,
    bit_reader: BitReader<'a>,

    /// Values remaining in the current run.
    current_count: usize,
    /// The repeated value when the current run is RLE.
    rle_value: u64,
    /// Whether the current run is bit-packed.
    bit_packed: bool,
}

impl<'a> RleDecoder<'a> {
    pub fn new(bit_width: u8, data: &'a [u8]) -> Self {
        Self {
            bit_width,
            bit_reader: BitReader::new(data),
            current_count: 0,
            rle_value: 0,
            bit_packed: false,
        }
    }

    /// Returns the next decoded value, or `None` when the stream is
    /// exhausted.
    pub fn get(&mut self) -> Result<Option<u64>> {
        while self.current_count == 0 {
            if !self.reload()? {
                return Ok(None);
            }
        }
        self.current_count -= 1;
        if self.bit_packed {
            match self.bit_reader.get_value(self.bit_width as usize) {
                Some(value) => Ok(Some(value)),
                None => Err(eof_err!("bit-packed run ended prematurely")),
            }
        } else {
            Ok(Some(self.rle_value))
        }
    }

    /// Decodes up to `buffer.len()` values, returning how many were decoded.
    pub fn get_batch(&mut self, buffer: &mut [u64]) -> Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            match self.get()? {
                Some(value) => {
                    buffer[filled] = value;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(filled)
    }

    fn reload(&mut self) -> Result<bool> {
        let header = match self.bit_reader.get_vlq_int() {
            Some(header) => header,
            None => return Ok(false),
        };
        if header & 1 == 1 {
            self.bit_packed = true;
            self.current_count = (header >> 1) as usize * 8;
        } else {
            self.bit_packed = false;
            self.current_count = (header >> 1) as usize;
            self.rle_value = self
                .bit_reader
                .get_aligned(ceil(self.bit_width as usize, 8))
                .ok_or_else(|| eof_err!("RLE run missing repeated value"))?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    fn roundtrip(values: &[u64], bit_width: u8) {
        let mut encoder = RleEncoder::new(bit_width, 64);
        for v in values {
            encoder.put(*v);
        }
        let buffer = encoder.consume();

        let mut decoder = RleDecoder::new(bit_width, &buffer);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(decoder.get().unwrap(), Some(*v), "value {i}");
        }
    }

    #[test]
    fn test_rle_long_repeats() {
        let mut values = vec![5u64; 100];
        values.extend(std::iter::repeat(3u64).take(100));
        roundtrip(&values, 3);
    }

    #[test]
    fn test_rle_literal_runs() {
        let values: Vec<u64> = (0..100).map(|i| i % 7).collect();
        roundtrip(&values, 3);
    }

    #[test]
    fn test_rle_mixed_runs() {
        let mut values: Vec<u64> = (0..40).map(|i| i % 5).collect();
        values.extend(std::iter::repeat(2u64).take(60));
        values.extend((0..13).map(|i| i % 3));
        roundtrip(&values, 3);
    }

    #[test]
    fn test_rle_partial_final_group() {
        // 5 distinct values: one bit-packed group padded with zeros
        roundtrip(&[1, 0, 1, 1, 0], 1);
    }

    #[test]
    fn test_rle_single_value() {
        roundtrip(&[7], 3);
    }

    #[test]
    fn test_rle_zero_bit_width() {
        // all values zero: an RLE run with an empty payload value
        let mut encoder = RleEncoder::new(0, 8);
        for _ in 0..10 {
            encoder.put(0);
        }
        let buffer = encoder.consume();
        let mut decoder = RleDecoder::new(0, &buffer);
        for _ in 0..10 {
            assert_eq!(decoder.get().unwrap(), Some(0));
        }
    }

    #[test]
    fn test_rle_exceeds_max_groups() {
        // more than 63 groups of distinct values forces multiple bit-packed
        // runs
        let values: Vec<u64> = (0..1000).map(|i| i % 2).collect();
        roundtrip(&values, 1);
    }

    #[test]
    fn test_rle_random_roundtrip() {
        let mut rng = thread_rng();
        for bit_width in [1u8, 2, 5, 8, 11, 16, 20] {
            let max = (1u64 << bit_width) - 1;
            let values: Vec<u64> = (0..2011)
                .map(|_| {
                    if rng.gen_bool(0.5) {
                        // runs of a single value
                        max / 2
                    } else {
                        rng.gen_range(0..=max)
                    }
                })
                .collect();
            roundtrip(&values, bit_width);
        }
    }

    #[test]
    fn test_decoder_stops_at_end() {
        let mut encoder = RleEncoder::new(2, 8);
        encoder.put(1);
        encoder.put(1);
        encoder.put(1);
        let buffer = encoder.consume();
        let mut decoder = RleDecoder::new(2, &buffer);
        assert_eq!(decoder.get().unwrap(), Some(1));
        assert_eq!(decoder.get().unwrap(), Some(1));
        assert_eq!(decoder.get().unwrap(), Some(1));
        assert_eq!(decoder.get().unwrap(), None);
    }
}
