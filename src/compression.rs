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

//! Contains codec interface and supported codec implementations.
//!
//! The page engine treats compression as `compress(bytes) -> bytes` and its
//! inverse, keyed by codec id; everything else lives behind the [`Codec`]
//! trait.

use std::io::{Read, Write};

use crate::basic::Compression;
use crate::errors::{ParquetError, Result};

/// Parquet compression codec interface.
pub trait Codec: Send {
    /// Compresses data stored in slice `input_buf` and appends the compressed
    /// result to `output_buf`.
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()>;

    /// Decompresses data stored in slice `input_buf` and appends output to
    /// `output_buf`, returning the number of bytes appended.
    ///
    /// `uncompress_size` is the expected size of the decompressed payload,
    /// taken from the page header; codecs whose format does not embed the
    /// length rely on it.
    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        uncompress_size: Option<usize>,
    ) -> Result<usize>;
}

/// Given the compression type `codec`, returns a codec used to compress and
/// decompress bytes for the compression type.
///
/// This returns `None` if the codec type is `UNCOMPRESSED`.
pub fn create_codec(codec: Compression) -> Result<Option<Box<dyn Codec>>> {
    match codec {
        Compression::UNCOMPRESSED => Ok(None),
        Compression::SNAPPY => Ok(Some(Box::new(SnappyCodec::new()))),
        Compression::GZIP => Ok(Some(Box::new(GZipCodec::new()))),
        Compression::BROTLI => Ok(Some(Box::new(BrotliCodec::new()))),
        Compression::LZ4 => Ok(Some(Box::new(LZ4Codec::new()))),
        Compression::ZSTD => Ok(Some(Box::new(ZSTDCodec::new()))),
        Compression::LZ4_RAW => Ok(Some(Box::new(LZ4RawCodec::new()))),
    }
}

/// Codec for Snappy compression format.
pub struct SnappyCodec {
    decoder: snap::raw::Decoder,
    encoder: snap::raw::Encoder,
}

impl SnappyCodec {
    fn new() -> Self {
        Self {
            decoder: snap::raw::Decoder::new(),
            encoder: snap::raw::Encoder::new(),
        }
    }
}

impl Codec for SnappyCodec {
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
        let output_buf_len = output_buf.len();
        let required_len = snap::raw::max_compress_len(input_buf.len());
        output_buf.resize(output_buf_len + required_len, 0);
        let n = self
            .encoder
            .compress(input_buf, &mut output_buf[output_buf_len..])?;
        output_buf.truncate(output_buf_len + n);
        Ok(())
    }

    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        uncompress_size: Option<usize>,
    ) -> Result<usize> {
        let len = match uncompress_size {
            Some(size) => size,
            None => snap::raw::decompress_len(input_buf)?,
        };
        let offset = output_buf.len();
        output_buf.resize(offset + len, 0);
        let n = self
            .decoder
            .decompress(input_buf, &mut output_buf[offset..])?;
        output_buf.truncate(offset + n);
        Ok(n)
    }
}

/// Codec for GZIP compression algorithm.
pub struct GZipCodec {}

impl GZipCodec {
    fn new() -> Self {
        Self {}
    }
}

impl Codec for GZipCodec {
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
        let mut encoder = flate2::write::GzEncoder::new(output_buf, flate2::Compression::default());
        encoder.write_all(input_buf)?;
        encoder.try_finish()?;
        Ok(())
    }

    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        _uncompress_size: Option<usize>,
    ) -> Result<usize> {
        let mut decoder = flate2::read::GzDecoder::new(input_buf);
        Ok(decoder.read_to_end(output_buf)?)
    }
}

const BROTLI_DEFAULT_BUFFER_SIZE: usize = 4096;
const BROTLI_DEFAULT_COMPRESSION_QUALITY: u32 = 1;
const BROTLI_DEFAULT_LG_WINDOW_SIZE: u32 = 22; // recommended between 20-22

/// Codec for Brotli compression algorithm.
pub struct BrotliCodec {}

impl BrotliCodec {
    fn new() -> Self {
        Self {}
    }
}

impl Codec for BrotliCodec {
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
        let mut encoder = brotli::CompressorWriter::new(
            output_buf,
            BROTLI_DEFAULT_BUFFER_SIZE,
            BROTLI_DEFAULT_COMPRESSION_QUALITY,
            BROTLI_DEFAULT_LG_WINDOW_SIZE,
        );
        encoder.write_all(input_buf)?;
        encoder.flush()?;
        Ok(())
    }

    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        _uncompress_size: Option<usize>,
    ) -> Result<usize> {
        let mut decoder = brotli::Decompressor::new(input_buf, BROTLI_DEFAULT_BUFFER_SIZE);
        Ok(decoder.read_to_end(output_buf)?)
    }
}

/// Codec for LZ4 frame compression format.
pub struct LZ4Codec {}

impl LZ4Codec {
    fn new() -> Self {
        Self {}
    }
}

impl Codec for LZ4Codec {
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
        let mut encoder = lz4_flex::frame::FrameEncoder::new(output_buf);
        encoder.write_all(input_buf)?;
        encoder
            .finish()
            .map_err(|e| ParquetError::External(Box::new(e)))?;
        Ok(())
    }

    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        _uncompress_size: Option<usize>,
    ) -> Result<usize> {
        let mut decoder = lz4_flex::frame::FrameDecoder::new(input_buf);
        Ok(decoder.read_to_end(output_buf)?)
    }
}

/// Codec for LZ4 raw (block) compression format.
pub struct LZ4RawCodec {}

impl LZ4RawCodec {
    fn new() -> Self {
        Self {}
    }
}

impl Codec for LZ4RawCodec {
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
        output_buf.extend_from_slice(&lz4_flex::block::compress(input_buf));
        Ok(())
    }

    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        uncompress_size: Option<usize>,
    ) -> Result<usize> {
        let size = uncompress_size.ok_or_else(|| {
            corrupt_err!("LZ4_RAW page missing uncompressed size in its header")
        })?;
        let decompressed = lz4_flex::block::decompress(input_buf, size)
            .map_err(|e| ParquetError::External(Box::new(e)))?;
        output_buf.extend_from_slice(&decompressed);
        Ok(decompressed.len())
    }
}

/// Codec for Zstandard compression algorithm.
pub struct ZSTDCodec {}

impl ZSTDCodec {
    fn new() -> Self {
        Self {}
    }
}

const ZSTD_COMPRESSION_LEVEL: i32 = 1;

impl Codec for ZSTDCodec {
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
        let mut encoder = zstd::Encoder::new(output_buf, ZSTD_COMPRESSION_LEVEL)?;
        encoder.write_all(input_buf)?;
        match encoder.finish() {
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn decompress(
        &mut self,
        input_buf: &[u8],
        output_buf: &mut Vec<u8>,
        _uncompress_size: Option<usize>,
    ) -> Result<usize> {
        let mut decoder = zstd::Decoder::new(input_buf)?;
        Ok(decoder.read_to_end(output_buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    fn test_roundtrip(c: Compression, data: &[u8]) {
        let mut codec = create_codec(c).unwrap().unwrap();

        // compress with c
        let mut compressed = Vec::new();
        codec.compress(data, &mut compressed).unwrap();

        // decompress with c
        let mut decompressed = Vec::new();
        let decompressed_size = codec
            .decompress(&compressed, &mut decompressed, Some(data.len()))
            .unwrap();
        assert_eq!(data.len(), decompressed_size);
        assert_eq!(data, decompressed.as_slice());

        // decompressing appends to the buffer
        let prefix_len = decompressed.len();
        let decompressed_size = codec
            .decompress(&compressed, &mut decompressed, Some(data.len()))
            .unwrap();
        assert_eq!(data.len(), decompressed_size);
        assert_eq!(data, &decompressed[prefix_len..]);
    }

    fn test_codec(c: Compression) {
        let sizes = vec![0, 10_000, 100_000];
        for size in sizes {
            let mut data = vec![0u8; size];
            thread_rng().fill(data.as_mut_slice());
            test_roundtrip(c, &data);
        }
    }

    #[test]
    fn test_codec_snappy() {
        test_codec(Compression::SNAPPY);
    }

    #[test]
    fn test_codec_gzip() {
        test_codec(Compression::GZIP);
    }

    #[test]
    fn test_codec_brotli() {
        test_codec(Compression::BROTLI);
    }

    #[test]
    fn test_codec_lz4() {
        test_codec(Compression::LZ4);
    }

    #[test]
    fn test_codec_zstd() {
        test_codec(Compression::ZSTD);
    }

    #[test]
    fn test_codec_lz4_raw() {
        test_codec(Compression::LZ4_RAW);
    }

    #[test]
    fn test_uncompressed_has_no_codec() {
        assert!(create_codec(Compression::UNCOMPRESSED).unwrap().is_none());
    }
}
