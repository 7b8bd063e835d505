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

//! Contains Rust mappings for the Thrift enums. Thrift structs are handled in
//! [`crate::format`]; the types here are the closed, validated enums exposed
//! on the public API.

use std::fmt;

use crate::errors::{ParquetError, Result};
use crate::format;

// ----------------------------------------------------------------------
// Mirrors thrift enum `format::Type`

/// Physical types supported by Parquet.
///
/// These physical types are intended to be used in combination with the
/// encodings to control the on disk storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Type {
    BOOLEAN,
    INT32,
    INT64,
    /// Deprecated 96-bit timestamp, kept for legacy writers.
    INT96,
    FLOAT,
    DOUBLE,
    BYTE_ARRAY,
    FIXED_LEN_BYTE_ARRAY,
}

impl TryFrom<format::Type> for Type {
    type Error = ParquetError;

    fn try_from(value: format::Type) -> Result<Self> {
        Ok(match value {
            format::Type::BOOLEAN => Type::BOOLEAN,
            format::Type::INT32 => Type::INT32,
            format::Type::INT64 => Type::INT64,
            format::Type::INT96 => Type::INT96,
            format::Type::FLOAT => Type::FLOAT,
            format::Type::DOUBLE => Type::DOUBLE,
            format::Type::BYTE_ARRAY => Type::BYTE_ARRAY,
            format::Type::FIXED_LEN_BYTE_ARRAY => Type::FIXED_LEN_BYTE_ARRAY,
            _ => return Err(corrupt_err!("unexpected physical type {}", value.0)),
        })
    }
}

impl From<Type> for format::Type {
    fn from(value: Type) -> Self {
        match value {
            Type::BOOLEAN => format::Type::BOOLEAN,
            Type::INT32 => format::Type::INT32,
            Type::INT64 => format::Type::INT64,
            Type::INT96 => format::Type::INT96,
            Type::FLOAT => format::Type::FLOAT,
            Type::DOUBLE => format::Type::DOUBLE,
            Type::BYTE_ARRAY => format::Type::BYTE_ARRAY,
            Type::FIXED_LEN_BYTE_ARRAY => format::Type::FIXED_LEN_BYTE_ARRAY,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `format::ConvertedType`
//
// Carries an added `NONE` so schema elements without an annotation do not
// need an `Option` at every use site.

/// Common types (converted types) used by frameworks when using Parquet.
///
/// This helps map between types in those frameworks to the base types in
/// Parquet. This is only metadata and not needed to read or write the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum ConvertedType {
    /// No type conversion.
    NONE,
    /// A BYTE_ARRAY actually contains UTF8 encoded chars.
    UTF8,
    /// A map is converted as an optional field containing a repeated
    /// key/value pair.
    MAP,
    /// A key/value pair is converted into a group of two fields.
    MAP_KEY_VALUE,
    /// A list is converted into an optional field containing a repeated
    /// field for its values.
    LIST,
    /// An enum is converted into a binary field.
    ENUM,
    /// A decimal value. Annotates INT32, INT64, BYTE_ARRAY or
    /// FIXED_LEN_BYTE_ARRAY; the schema element carries precision and scale.
    DECIMAL,
    /// A date stored as days since Unix epoch, encoded as INT32.
    DATE,
    /// Milliseconds since midnight, stored as INT32.
    TIME_MILLIS,
    /// Microseconds since midnight, stored as INT64.
    TIME_MICROS,
    /// Milliseconds since the Unix epoch, stored as INT64.
    TIMESTAMP_MILLIS,
    /// Microseconds since the Unix epoch, stored as INT64.
    TIMESTAMP_MICROS,
    /// An unsigned 8 bit integer stored as INT32.
    UINT_8,
    /// An unsigned 16 bit integer stored as INT32.
    UINT_16,
    /// An unsigned 32 bit integer stored as INT32.
    UINT_32,
    /// An unsigned 64 bit integer stored as INT64.
    UINT_64,
    /// A signed 8 bit integer stored as INT32.
    INT_8,
    /// A signed 16 bit integer stored as INT32.
    INT_16,
    /// A signed 32 bit integer stored as INT32.
    INT_32,
    /// A signed 64 bit integer stored as INT64.
    INT_64,
    /// A JSON document embedded within a single UTF8 column.
    JSON,
    /// A BSON document embedded within a single BINARY column.
    BSON,
    /// An interval of time, stored as a FIXED_LEN_BYTE_ARRAY of length 12:
    /// three little endian unsigned integers for months, days and
    /// milliseconds.
    INTERVAL,
}

impl TryFrom<Option<format::ConvertedType>> for ConvertedType {
    type Error = ParquetError;

    fn try_from(option: Option<format::ConvertedType>) -> Result<Self> {
        Ok(match option {
            None => ConvertedType::NONE,
            Some(value) => match value {
                format::ConvertedType::UTF8 => ConvertedType::UTF8,
                format::ConvertedType::MAP => ConvertedType::MAP,
                format::ConvertedType::MAP_KEY_VALUE => ConvertedType::MAP_KEY_VALUE,
                format::ConvertedType::LIST => ConvertedType::LIST,
                format::ConvertedType::ENUM => ConvertedType::ENUM,
                format::ConvertedType::DECIMAL => ConvertedType::DECIMAL,
                format::ConvertedType::DATE => ConvertedType::DATE,
                format::ConvertedType::TIME_MILLIS => ConvertedType::TIME_MILLIS,
                format::ConvertedType::TIME_MICROS => ConvertedType::TIME_MICROS,
                format::ConvertedType::TIMESTAMP_MILLIS => ConvertedType::TIMESTAMP_MILLIS,
                format::ConvertedType::TIMESTAMP_MICROS => ConvertedType::TIMESTAMP_MICROS,
                format::ConvertedType::UINT_8 => ConvertedType::UINT_8,
                format::ConvertedType::UINT_16 => ConvertedType::UINT_16,
                format::ConvertedType::UINT_32 => ConvertedType::UINT_32,
                format::ConvertedType::UINT_64 => ConvertedType::UINT_64,
                format::ConvertedType::INT_8 => ConvertedType::INT_8,
                format::ConvertedType::INT_16 => ConvertedType::INT_16,
                format::ConvertedType::INT_32 => ConvertedType::INT_32,
                format::ConvertedType::INT_64 => ConvertedType::INT_64,
                format::ConvertedType::JSON => ConvertedType::JSON,
                format::ConvertedType::BSON => ConvertedType::BSON,
                format::ConvertedType::INTERVAL => ConvertedType::INTERVAL,
                _ => return Err(corrupt_err!("unexpected converted type {}", value.0)),
            },
        })
    }
}

impl From<ConvertedType> for Option<format::ConvertedType> {
    fn from(value: ConvertedType) -> Self {
        match value {
            ConvertedType::NONE => None,
            ConvertedType::UTF8 => Some(format::ConvertedType::UTF8),
            ConvertedType::MAP => Some(format::ConvertedType::MAP),
            ConvertedType::MAP_KEY_VALUE => Some(format::ConvertedType::MAP_KEY_VALUE),
            ConvertedType::LIST => Some(format::ConvertedType::LIST),
            ConvertedType::ENUM => Some(format::ConvertedType::ENUM),
            ConvertedType::DECIMAL => Some(format::ConvertedType::DECIMAL),
            ConvertedType::DATE => Some(format::ConvertedType::DATE),
            ConvertedType::TIME_MILLIS => Some(format::ConvertedType::TIME_MILLIS),
            ConvertedType::TIME_MICROS => Some(format::ConvertedType::TIME_MICROS),
            ConvertedType::TIMESTAMP_MILLIS => Some(format::ConvertedType::TIMESTAMP_MILLIS),
            ConvertedType::TIMESTAMP_MICROS => Some(format::ConvertedType::TIMESTAMP_MICROS),
            ConvertedType::UINT_8 => Some(format::ConvertedType::UINT_8),
            ConvertedType::UINT_16 => Some(format::ConvertedType::UINT_16),
            ConvertedType::UINT_32 => Some(format::ConvertedType::UINT_32),
            ConvertedType::UINT_64 => Some(format::ConvertedType::UINT_64),
            ConvertedType::INT_8 => Some(format::ConvertedType::INT_8),
            ConvertedType::INT_16 => Some(format::ConvertedType::INT_16),
            ConvertedType::INT_32 => Some(format::ConvertedType::INT_32),
            ConvertedType::INT_64 => Some(format::ConvertedType::INT_64),
            ConvertedType::JSON => Some(format::ConvertedType::JSON),
            ConvertedType::BSON => Some(format::ConvertedType::BSON),
            ConvertedType::INTERVAL => Some(format::ConvertedType::INTERVAL),
        }
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `format::FieldRepetitionType`

/// Representation of field types in schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Repetition {
    /// Field is required (can not be null) and each record has exactly 1 value.
    REQUIRED,
    /// Field is optional (can be null) and each record has 0 or 1 values.
    OPTIONAL,
    /// Field is repeated and can contain 0 or more values.
    REPEATED,
}

impl TryFrom<format::FieldRepetitionType> for Repetition {
    type Error = ParquetError;

    fn try_from(value: format::FieldRepetitionType) -> Result<Self> {
        Ok(match value {
            format::FieldRepetitionType::REQUIRED => Repetition::REQUIRED,
            format::FieldRepetitionType::OPTIONAL => Repetition::OPTIONAL,
            format::FieldRepetitionType::REPEATED => Repetition::REPEATED,
            _ => return Err(corrupt_err!("unexpected repetition {}", value.0)),
        })
    }
}

impl From<Repetition> for format::FieldRepetitionType {
    fn from(value: Repetition) -> Self {
        match value {
            Repetition::REQUIRED => format::FieldRepetitionType::REQUIRED,
            Repetition::OPTIONAL => format::FieldRepetitionType::OPTIONAL,
            Repetition::REPEATED => format::FieldRepetitionType::REPEATED,
        }
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `format::Encoding`

/// Encodings supported by Parquet.
///
/// Not all encodings are valid for all types. Only the subset this crate
/// reads and writes is represented; other values fail with *Unsupported*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum Encoding {
    /// The default encoding: values back to back, bit-packed for booleans,
    /// length-prefixed for byte arrays.
    PLAIN,
    /// The dictionary encoding used by v1 writers: a PLAIN dictionary page
    /// followed by data pages of RLE-encoded indices.
    PLAIN_DICTIONARY,
    /// Group packed run length encoding, used for repetition/definition
    /// levels and dictionary indices.
    RLE,
    /// The v2 spelling of the dictionary data page encoding.
    RLE_DICTIONARY,
}

impl TryFrom<format::Encoding> for Encoding {
    type Error = ParquetError;

    fn try_from(value: format::Encoding) -> Result<Self> {
        Ok(match value {
            format::Encoding::PLAIN => Encoding::PLAIN,
            format::Encoding::PLAIN_DICTIONARY => Encoding::PLAIN_DICTIONARY,
            format::Encoding::RLE => Encoding::RLE,
            format::Encoding::RLE_DICTIONARY => Encoding::RLE_DICTIONARY,
            _ => return Err(unsupported_err!("encoding {} has no handler", value.0)),
        })
    }
}

impl From<Encoding> for format::Encoding {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::PLAIN => format::Encoding::PLAIN,
            Encoding::PLAIN_DICTIONARY => format::Encoding::PLAIN_DICTIONARY,
            Encoding::RLE => format::Encoding::RLE,
            Encoding::RLE_DICTIONARY => format::Encoding::RLE_DICTIONARY,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `format::CompressionCodec`

/// Supported block compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Compression {
    UNCOMPRESSED,
    SNAPPY,
    GZIP,
    BROTLI,
    /// LZ4 frame format.
    LZ4,
    ZSTD,
    /// Raw LZ4 block format, without any framing.
    LZ4_RAW,
}

impl TryFrom<format::CompressionCodec> for Compression {
    type Error = ParquetError;

    fn try_from(value: format::CompressionCodec) -> Result<Self> {
        Ok(match value {
            format::CompressionCodec::UNCOMPRESSED => Compression::UNCOMPRESSED,
            format::CompressionCodec::SNAPPY => Compression::SNAPPY,
            format::CompressionCodec::GZIP => Compression::GZIP,
            format::CompressionCodec::BROTLI => Compression::BROTLI,
            format::CompressionCodec::LZ4 => Compression::LZ4,
            format::CompressionCodec::ZSTD => Compression::ZSTD,
            format::CompressionCodec::LZ4_RAW => Compression::LZ4_RAW,
            _ => {
                return Err(unsupported_err!(
                    "compression codec {} has no handler",
                    value.0
                ))
            }
        })
    }
}

impl From<Compression> for format::CompressionCodec {
    fn from(value: Compression) -> Self {
        match value {
            Compression::UNCOMPRESSED => format::CompressionCodec::UNCOMPRESSED,
            Compression::SNAPPY => format::CompressionCodec::SNAPPY,
            Compression::GZIP => format::CompressionCodec::GZIP,
            Compression::BROTLI => format::CompressionCodec::BROTLI,
            Compression::LZ4 => format::CompressionCodec::LZ4,
            Compression::ZSTD => format::CompressionCodec::ZSTD,
            Compression::LZ4_RAW => format::CompressionCodec::LZ4_RAW,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

// ----------------------------------------------------------------------
// Mirrors thrift enum `format::PageType`

/// Types of pages found in a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum PageType {
    DATA_PAGE,
    INDEX_PAGE,
    DICTIONARY_PAGE,
    DATA_PAGE_V2,
}

impl TryFrom<format::PageType> for PageType {
    type Error = ParquetError;

    fn try_from(value: format::PageType) -> Result<Self> {
        Ok(match value {
            format::PageType::DATA_PAGE => PageType::DATA_PAGE,
            format::PageType::INDEX_PAGE => PageType::INDEX_PAGE,
            format::PageType::DICTIONARY_PAGE => PageType::DICTIONARY_PAGE,
            format::PageType::DATA_PAGE_V2 => PageType::DATA_PAGE_V2,
            _ => return Err(corrupt_err!("unexpected page type {}", value.0)),
        })
    }
}

impl From<PageType> for format::PageType {
    fn from(value: PageType) -> Self {
        match value {
            PageType::DATA_PAGE => format::PageType::DATA_PAGE,
            PageType::INDEX_PAGE => format::PageType::INDEX_PAGE,
            PageType::DICTIONARY_PAGE => format::PageType::DICTIONARY_PAGE,
            PageType::DATA_PAGE_V2 => format::PageType::DATA_PAGE_V2,
        }
    }
}
