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

//! Rust mirrors of the `parquet.thrift` structures this crate reads and
//! writes: the file footer, schema elements and page headers.
//!
//! Field ids and wire shapes follow
//! [`parquet.thrift`](https://github.com/apache/parquet-format/blob/master/src/main/thrift/parquet.thrift).
//! Unknown fields are skipped on read, so footers written by other
//! implementations (logical types, column orders, page indexes, ...) still
//! parse.

use thrift::protocol::{
    field_id, verify_required_field_exists, TFieldIdentifier, TInputProtocol, TListIdentifier,
    TOutputProtocol, TStructIdentifier, TType,
};

use crate::thrift::TSerializable;

// ----------------------------------------------------------------------
// Enums
//
// Represented as open `i32` newtypes so that values written by future format
// versions survive a read/rewrite cycle.

macro_rules! thrift_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        #[allow(non_camel_case_types)]
        pub struct $name(pub i32);

        impl $name {
            $(
                $(#[$vmeta])*
                pub const $variant: $name = $name($value);
            )*
        }

        impl TSerializable for $name {
            fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<$name> {
                Ok($name(i_prot.read_i32()?))
            }
            fn write_to_out_protocol<T: TOutputProtocol>(
                &self,
                o_prot: &mut T,
            ) -> thrift::Result<()> {
                o_prot.write_i32(self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                $name(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

thrift_enum!(
/// Physical types supported by Parquet.
Type {
    BOOLEAN = 0;
    INT32 = 1;
    INT64 = 2;
    /// Deprecated, only used by legacy implementations.
    INT96 = 3;
    FLOAT = 4;
    DOUBLE = 5;
    BYTE_ARRAY = 6;
    FIXED_LEN_BYTE_ARRAY = 7;
}
);

thrift_enum!(
/// Common (converted) types used by frameworks on top of the physical types.
ConvertedType {
    UTF8 = 0;
    MAP = 1;
    MAP_KEY_VALUE = 2;
    LIST = 3;
    ENUM = 4;
    DECIMAL = 5;
    DATE = 6;
    TIME_MILLIS = 7;
    TIME_MICROS = 8;
    TIMESTAMP_MILLIS = 9;
    TIMESTAMP_MICROS = 10;
    UINT_8 = 11;
    UINT_16 = 12;
    UINT_32 = 13;
    UINT_64 = 14;
    INT_8 = 15;
    INT_16 = 16;
    INT_32 = 17;
    INT_64 = 18;
    JSON = 19;
    BSON = 20;
    INTERVAL = 21;
}
);

thrift_enum!(
/// Representation of field repetitions.
FieldRepetitionType {
    REQUIRED = 0;
    OPTIONAL = 1;
    REPEATED = 2;
}
);

thrift_enum!(
/// Encodings supported by Parquet.
Encoding {
    PLAIN = 0;
    PLAIN_DICTIONARY = 2;
    RLE = 3;
    BIT_PACKED = 4;
    DELTA_BINARY_PACKED = 5;
    DELTA_LENGTH_BYTE_ARRAY = 6;
    DELTA_BYTE_ARRAY = 7;
    RLE_DICTIONARY = 8;
    BYTE_STREAM_SPLIT = 9;
}
);

thrift_enum!(
/// Supported block compression algorithms.
CompressionCodec {
    UNCOMPRESSED = 0;
    SNAPPY = 1;
    GZIP = 2;
    LZO = 3;
    BROTLI = 4;
    LZ4 = 5;
    ZSTD = 6;
    LZ4_RAW = 7;
}
);

thrift_enum!(
/// Types of pages found in a column chunk.
PageType {
    DATA_PAGE = 0;
    INDEX_PAGE = 1;
    DICTIONARY_PAGE = 2;
    DATA_PAGE_V2 = 3;
}
);

// ----------------------------------------------------------------------
// List helpers

fn read_struct_list<P: TInputProtocol, T: TSerializable>(i_prot: &mut P) -> thrift::Result<Vec<T>> {
    let ident = i_prot.read_list_begin()?;
    let mut val = Vec::with_capacity(ident.size.max(0) as usize);
    for _ in 0..ident.size {
        val.push(T::read_from_in_protocol(i_prot)?);
    }
    i_prot.read_list_end()?;
    Ok(val)
}

fn write_struct_list<P: TOutputProtocol, T: TSerializable>(
    o_prot: &mut P,
    element_type: TType,
    items: &[T],
) -> thrift::Result<()> {
    o_prot.write_list_begin(&TListIdentifier::new(element_type, items.len() as i32))?;
    for item in items {
        item.write_to_out_protocol(o_prot)?;
    }
    o_prot.write_list_end()
}

fn read_string_list<P: TInputProtocol>(i_prot: &mut P) -> thrift::Result<Vec<String>> {
    let ident = i_prot.read_list_begin()?;
    let mut val = Vec::with_capacity(ident.size.max(0) as usize);
    for _ in 0..ident.size {
        val.push(i_prot.read_string()?);
    }
    i_prot.read_list_end()?;
    Ok(val)
}

fn write_string_list<P: TOutputProtocol>(o_prot: &mut P, items: &[String]) -> thrift::Result<()> {
    o_prot.write_list_begin(&TListIdentifier::new(TType::String, items.len() as i32))?;
    for item in items {
        o_prot.write_string(item)?;
    }
    o_prot.write_list_end()
}

// ----------------------------------------------------------------------
// Statistics

/// Statistics per row group and per page.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    /// Deprecated max/min with surprising sort order semantics; still what
    /// most readers look at for v1 files.
    pub max: Option<Vec<u8>>,
    pub min: Option<Vec<u8>>,
    /// Count of null values in the column.
    pub null_count: Option<i64>,
    /// Count of distinct values occurring.
    pub distinct_count: Option<i64>,
    pub max_value: Option<Vec<u8>>,
    pub min_value: Option<Vec<u8>>,
}

impl TSerializable for Statistics {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Statistics> {
        i_prot.read_struct_begin()?;
        let mut val = Statistics::default();
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => val.max = Some(i_prot.read_bytes()?),
                2 => val.min = Some(i_prot.read_bytes()?),
                3 => val.null_count = Some(i_prot.read_i64()?),
                4 => val.distinct_count = Some(i_prot.read_i64()?),
                5 => val.max_value = Some(i_prot.read_bytes()?),
                6 => val.min_value = Some(i_prot.read_bytes()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(val)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("Statistics"))?;
        if let Some(v) = &self.max {
            o_prot.write_field_begin(&TFieldIdentifier::new("max", TType::String, 1))?;
            o_prot.write_bytes(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.min {
            o_prot.write_field_begin(&TFieldIdentifier::new("min", TType::String, 2))?;
            o_prot.write_bytes(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.null_count {
            o_prot.write_field_begin(&TFieldIdentifier::new("null_count", TType::I64, 3))?;
            o_prot.write_i64(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.distinct_count {
            o_prot.write_field_begin(&TFieldIdentifier::new("distinct_count", TType::I64, 4))?;
            o_prot.write_i64(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.max_value {
            o_prot.write_field_begin(&TFieldIdentifier::new("max_value", TType::String, 5))?;
            o_prot.write_bytes(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.min_value {
            o_prot.write_field_begin(&TFieldIdentifier::new("min_value", TType::String, 6))?;
            o_prot.write_bytes(v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// SchemaElement

/// Represents an element inside a schema definition.
///
/// - if it is a group (inner node) then `type_` is undefined and
///   `num_children` is defined
/// - if it is a primitive type (leaf) then `type_` is defined and
///   `num_children` is undefined
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SchemaElement {
    pub type_: Option<Type>,
    /// Byte length for FIXED_LEN_BYTE_ARRAY leaves.
    pub type_length: Option<i32>,
    /// Not set for the root of the schema.
    pub repetition_type: Option<FieldRepetitionType>,
    pub name: String,
    pub num_children: Option<i32>,
    pub converted_type: Option<ConvertedType>,
    /// DECIMAL scale; must be present for DECIMAL converted type.
    pub scale: Option<i32>,
    /// DECIMAL precision; must be present for DECIMAL converted type.
    pub precision: Option<i32>,
    pub field_id: Option<i32>,
}

impl TSerializable for SchemaElement {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<SchemaElement> {
        i_prot.read_struct_begin()?;
        let mut val = SchemaElement::default();
        let mut name: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => val.type_ = Some(Type::read_from_in_protocol(i_prot)?),
                2 => val.type_length = Some(i_prot.read_i32()?),
                3 => {
                    val.repetition_type =
                        Some(FieldRepetitionType::read_from_in_protocol(i_prot)?)
                }
                4 => name = Some(i_prot.read_string()?),
                5 => val.num_children = Some(i_prot.read_i32()?),
                6 => val.converted_type = Some(ConvertedType::read_from_in_protocol(i_prot)?),
                7 => val.scale = Some(i_prot.read_i32()?),
                8 => val.precision = Some(i_prot.read_i32()?),
                9 => val.field_id = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("SchemaElement.name", &name)?;
        val.name = name.expect("presence of required field checked above");
        Ok(val)
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("SchemaElement"))?;
        if let Some(v) = self.type_ {
            o_prot.write_field_begin(&TFieldIdentifier::new("type", TType::I32, 1))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.type_length {
            o_prot.write_field_begin(&TFieldIdentifier::new("type_length", TType::I32, 2))?;
            o_prot.write_i32(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.repetition_type {
            o_prot.write_field_begin(&TFieldIdentifier::new("repetition_type", TType::I32, 3))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_begin(&TFieldIdentifier::new("name", TType::String, 4))?;
        o_prot.write_string(&self.name)?;
        o_prot.write_field_end()?;
        if let Some(v) = self.num_children {
            o_prot.write_field_begin(&TFieldIdentifier::new("num_children", TType::I32, 5))?;
            o_prot.write_i32(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.converted_type {
            o_prot.write_field_begin(&TFieldIdentifier::new("converted_type", TType::I32, 6))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.scale {
            o_prot.write_field_begin(&TFieldIdentifier::new("scale", TType::I32, 7))?;
            o_prot.write_i32(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.precision {
            o_prot.write_field_begin(&TFieldIdentifier::new("precision", TType::I32, 8))?;
            o_prot.write_i32(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.field_id {
            o_prot.write_field_begin(&TFieldIdentifier::new("field_id", TType::I32, 9))?;
            o_prot.write_i32(v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// Page headers

/// Data page header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataPageHeader {
    /// Number of values, including NULLs, in this data page.
    pub num_values: i32,
    pub encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub repetition_level_encoding: Encoding,
    pub statistics: Option<Statistics>,
}

impl TSerializable for DataPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<DataPageHeader> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i32> = None;
        let mut f_2: Option<Encoding> = None;
        let mut f_3: Option<Encoding> = None;
        let mut f_4: Option<Encoding> = None;
        let mut f_5: Option<Statistics> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(Encoding::read_from_in_protocol(i_prot)?),
                3 => f_3 = Some(Encoding::read_from_in_protocol(i_prot)?),
                4 => f_4 = Some(Encoding::read_from_in_protocol(i_prot)?),
                5 => f_5 = Some(Statistics::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeader.num_values", &f_1)?;
        verify_required_field_exists("DataPageHeader.encoding", &f_2)?;
        verify_required_field_exists("DataPageHeader.definition_level_encoding", &f_3)?;
        verify_required_field_exists("DataPageHeader.repetition_level_encoding", &f_4)?;
        Ok(DataPageHeader {
            num_values: f_1.unwrap(),
            encoding: f_2.unwrap(),
            definition_level_encoding: f_3.unwrap(),
            repetition_level_encoding: f_4.unwrap(),
            statistics: f_5,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DataPageHeader"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I32, 1))?;
        o_prot.write_i32(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encoding", TType::I32, 2))?;
        self.encoding.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "definition_level_encoding",
            TType::I32,
            3,
        ))?;
        self.definition_level_encoding.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "repetition_level_encoding",
            TType::I32,
            4,
        ))?;
        self.repetition_level_encoding.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        if let Some(v) = &self.statistics {
            o_prot.write_field_begin(&TFieldIdentifier::new("statistics", TType::Struct, 5))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Index page header; the page index is not produced by this crate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexPageHeader {}

impl TSerializable for IndexPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<IndexPageHeader> {
        i_prot.read_struct_begin()?;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            i_prot.skip(field_ident.field_type)?;
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        Ok(IndexPageHeader {})
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("IndexPageHeader"))?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Dictionary page header.
///
/// The dictionary page, if present, must be placed at the first position of
/// the column chunk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictionaryPageHeader {
    /// Number of values in the dictionary.
    pub num_values: i32,
    pub encoding: Encoding,
    /// If true, the entries are sorted in ascending order.
    pub is_sorted: Option<bool>,
}

impl TSerializable for DictionaryPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(
        i_prot: &mut T,
    ) -> thrift::Result<DictionaryPageHeader> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i32> = None;
        let mut f_2: Option<Encoding> = None;
        let mut f_3: Option<bool> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(Encoding::read_from_in_protocol(i_prot)?),
                3 => f_3 = Some(i_prot.read_bool()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DictionaryPageHeader.num_values", &f_1)?;
        verify_required_field_exists("DictionaryPageHeader.encoding", &f_2)?;
        Ok(DictionaryPageHeader {
            num_values: f_1.unwrap(),
            encoding: f_2.unwrap(),
            is_sorted: f_3,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DictionaryPageHeader"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I32, 1))?;
        o_prot.write_i32(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encoding", TType::I32, 2))?;
        self.encoding.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        if let Some(v) = self.is_sorted {
            o_prot.write_field_begin(&TFieldIdentifier::new("is_sorted", TType::Bool, 3))?;
            o_prot.write_bool(v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Header preceding every page in a column chunk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageHeader {
    pub type_: PageType,
    /// Uncompressed page size in bytes (not including this header).
    pub uncompressed_page_size: i32,
    /// Compressed (and potentially encrypted) page size in bytes.
    pub compressed_page_size: i32,
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
    pub index_page_header: Option<IndexPageHeader>,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
}

impl TSerializable for PageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<PageHeader> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<PageType> = None;
        let mut f_2: Option<i32> = None;
        let mut f_3: Option<i32> = None;
        let mut f_4: Option<i32> = None;
        let mut f_5: Option<DataPageHeader> = None;
        let mut f_6: Option<IndexPageHeader> = None;
        let mut f_7: Option<DictionaryPageHeader> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(PageType::read_from_in_protocol(i_prot)?),
                2 => f_2 = Some(i_prot.read_i32()?),
                3 => f_3 = Some(i_prot.read_i32()?),
                4 => f_4 = Some(i_prot.read_i32()?),
                5 => f_5 = Some(DataPageHeader::read_from_in_protocol(i_prot)?),
                6 => f_6 = Some(IndexPageHeader::read_from_in_protocol(i_prot)?),
                7 => f_7 = Some(DictionaryPageHeader::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageHeader.type", &f_1)?;
        verify_required_field_exists("PageHeader.uncompressed_page_size", &f_2)?;
        verify_required_field_exists("PageHeader.compressed_page_size", &f_3)?;
        Ok(PageHeader {
            type_: f_1.unwrap(),
            uncompressed_page_size: f_2.unwrap(),
            compressed_page_size: f_3.unwrap(),
            crc: f_4,
            data_page_header: f_5,
            index_page_header: f_6,
            dictionary_page_header: f_7,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("PageHeader"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("type", TType::I32, 1))?;
        self.type_.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "uncompressed_page_size",
            TType::I32,
            2,
        ))?;
        o_prot.write_i32(self.uncompressed_page_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "compressed_page_size",
            TType::I32,
            3,
        ))?;
        o_prot.write_i32(self.compressed_page_size)?;
        o_prot.write_field_end()?;
        if let Some(v) = self.crc {
            o_prot.write_field_begin(&TFieldIdentifier::new("crc", TType::I32, 4))?;
            o_prot.write_i32(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.data_page_header {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "data_page_header",
                TType::Struct,
                5,
            ))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.index_page_header {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "index_page_header",
                TType::Struct,
                6,
            ))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.dictionary_page_header {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "dictionary_page_header",
                TType::Struct,
                7,
            ))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// KeyValue

/// Wrapper struct to store key values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<String>,
}

impl TSerializable for KeyValue {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<KeyValue> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<String> = None;
        let mut f_2: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(i_prot.read_string()?),
                2 => f_2 = Some(i_prot.read_string()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("KeyValue.key", &f_1)?;
        Ok(KeyValue {
            key: f_1.unwrap(),
            value: f_2,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("KeyValue"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("key", TType::String, 1))?;
        o_prot.write_string(&self.key)?;
        o_prot.write_field_end()?;
        if let Some(v) = &self.value {
            o_prot.write_field_begin(&TFieldIdentifier::new("value", TType::String, 2))?;
            o_prot.write_string(v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// Column metadata

/// Description for column metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMetaData {
    pub type_: Type,
    /// Set of all encodings used for this column.
    pub encodings: Vec<Encoding>,
    /// Path in schema.
    pub path_in_schema: Vec<String>,
    pub codec: CompressionCodec,
    /// Number of values, including NULLs, in this column chunk.
    pub num_values: i64,
    pub total_uncompressed_size: i64,
    pub total_compressed_size: i64,
    pub key_value_metadata: Option<Vec<KeyValue>>,
    /// Byte offset from beginning of file to first data page.
    pub data_page_offset: i64,
    pub index_page_offset: Option<i64>,
    /// Byte offset from the beginning of file to first (only) dictionary page.
    pub dictionary_page_offset: Option<i64>,
    pub statistics: Option<Statistics>,
}

impl TSerializable for ColumnMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<ColumnMetaData> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<Type> = None;
        let mut f_2: Option<Vec<Encoding>> = None;
        let mut f_3: Option<Vec<String>> = None;
        let mut f_4: Option<CompressionCodec> = None;
        let mut f_5: Option<i64> = None;
        let mut f_6: Option<i64> = None;
        let mut f_7: Option<i64> = None;
        let mut f_8: Option<Vec<KeyValue>> = None;
        let mut f_9: Option<i64> = None;
        let mut f_10: Option<i64> = None;
        let mut f_11: Option<i64> = None;
        let mut f_12: Option<Statistics> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(Type::read_from_in_protocol(i_prot)?),
                2 => f_2 = Some(read_struct_list(i_prot)?),
                3 => f_3 = Some(read_string_list(i_prot)?),
                4 => f_4 = Some(CompressionCodec::read_from_in_protocol(i_prot)?),
                5 => f_5 = Some(i_prot.read_i64()?),
                6 => f_6 = Some(i_prot.read_i64()?),
                7 => f_7 = Some(i_prot.read_i64()?),
                8 => f_8 = Some(read_struct_list(i_prot)?),
                9 => f_9 = Some(i_prot.read_i64()?),
                10 => f_10 = Some(i_prot.read_i64()?),
                11 => f_11 = Some(i_prot.read_i64()?),
                12 => f_12 = Some(Statistics::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnMetaData.type", &f_1)?;
        verify_required_field_exists("ColumnMetaData.encodings", &f_2)?;
        verify_required_field_exists("ColumnMetaData.path_in_schema", &f_3)?;
        verify_required_field_exists("ColumnMetaData.codec", &f_4)?;
        verify_required_field_exists("ColumnMetaData.num_values", &f_5)?;
        verify_required_field_exists("ColumnMetaData.total_uncompressed_size", &f_6)?;
        verify_required_field_exists("ColumnMetaData.total_compressed_size", &f_7)?;
        verify_required_field_exists("ColumnMetaData.data_page_offset", &f_9)?;
        Ok(ColumnMetaData {
            type_: f_1.unwrap(),
            encodings: f_2.unwrap(),
            path_in_schema: f_3.unwrap(),
            codec: f_4.unwrap(),
            num_values: f_5.unwrap(),
            total_uncompressed_size: f_6.unwrap(),
            total_compressed_size: f_7.unwrap(),
            key_value_metadata: f_8,
            data_page_offset: f_9.unwrap(),
            index_page_offset: f_10,
            dictionary_page_offset: f_11,
            statistics: f_12,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnMetaData"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("type", TType::I32, 1))?;
        self.type_.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encodings", TType::List, 2))?;
        write_struct_list(o_prot, TType::I32, &self.encodings)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("path_in_schema", TType::List, 3))?;
        write_string_list(o_prot, &self.path_in_schema)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("codec", TType::I32, 4))?;
        self.codec.write_to_out_protocol(o_prot)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I64, 5))?;
        o_prot.write_i64(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "total_uncompressed_size",
            TType::I64,
            6,
        ))?;
        o_prot.write_i64(self.total_uncompressed_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "total_compressed_size",
            TType::I64,
            7,
        ))?;
        o_prot.write_i64(self.total_compressed_size)?;
        o_prot.write_field_end()?;
        if let Some(v) = &self.key_value_metadata {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "key_value_metadata",
                TType::List,
                8,
            ))?;
            write_struct_list(o_prot, TType::Struct, v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_begin(&TFieldIdentifier::new("data_page_offset", TType::I64, 9))?;
        o_prot.write_i64(self.data_page_offset)?;
        o_prot.write_field_end()?;
        if let Some(v) = self.index_page_offset {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "index_page_offset",
                TType::I64,
                10,
            ))?;
            o_prot.write_i64(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = self.dictionary_page_offset {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "dictionary_page_offset",
                TType::I64,
                11,
            ))?;
            o_prot.write_i64(v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.statistics {
            o_prot.write_field_begin(&TFieldIdentifier::new("statistics", TType::Struct, 12))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

// ----------------------------------------------------------------------
// ColumnChunk / RowGroup / FileMetaData

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnChunk {
    /// File where column data is stored; set only when the data does not
    /// live in the same file as the metadata.
    pub file_path: Option<String>,
    /// Deprecated: byte offset in file_path to the ColumnMetaData.
    pub file_offset: i64,
    pub meta_data: Option<ColumnMetaData>,
}

impl TSerializable for ColumnChunk {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<ColumnChunk> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<String> = None;
        let mut f_2: Option<i64> = None;
        let mut f_3: Option<ColumnMetaData> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(i_prot.read_string()?),
                2 => f_2 = Some(i_prot.read_i64()?),
                3 => f_3 = Some(ColumnMetaData::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("ColumnChunk.file_offset", &f_2)?;
        Ok(ColumnChunk {
            file_path: f_1,
            file_offset: f_2.unwrap(),
            meta_data: f_3,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("ColumnChunk"))?;
        if let Some(v) = &self.file_path {
            o_prot.write_field_begin(&TFieldIdentifier::new("file_path", TType::String, 1))?;
            o_prot.write_string(v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_begin(&TFieldIdentifier::new("file_offset", TType::I64, 2))?;
        o_prot.write_i64(self.file_offset)?;
        o_prot.write_field_end()?;
        if let Some(v) = &self.meta_data {
            o_prot.write_field_begin(&TFieldIdentifier::new("meta_data", TType::Struct, 3))?;
            v.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowGroup {
    /// Metadata for each column chunk in this row group, in the same order as
    /// the schema.
    pub columns: Vec<ColumnChunk>,
    /// Total byte size of all the uncompressed column data in this row group.
    pub total_byte_size: i64,
    pub num_rows: i64,
}

impl TSerializable for RowGroup {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<RowGroup> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<Vec<ColumnChunk>> = None;
        let mut f_2: Option<i64> = None;
        let mut f_3: Option<i64> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(read_struct_list(i_prot)?),
                2 => f_2 = Some(i_prot.read_i64()?),
                3 => f_3 = Some(i_prot.read_i64()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("RowGroup.columns", &f_1)?;
        verify_required_field_exists("RowGroup.total_byte_size", &f_2)?;
        verify_required_field_exists("RowGroup.num_rows", &f_3)?;
        Ok(RowGroup {
            columns: f_1.unwrap(),
            total_byte_size: f_2.unwrap(),
            num_rows: f_3.unwrap(),
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("RowGroup"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("columns", TType::List, 1))?;
        write_struct_list(o_prot, TType::Struct, &self.columns)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("total_byte_size", TType::I64, 2))?;
        o_prot.write_i64(self.total_byte_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_rows", TType::I64, 3))?;
        o_prot.write_i64(self.num_rows)?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

/// Description for file metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileMetaData {
    /// Version of this file.
    pub version: i32,
    /// Parquet schema for this file. This schema contains metadata for all
    /// the columns. The schema is represented as a tree with a single root.
    /// The nodes of the tree are flattened to a list by doing a depth-first
    /// traversal. The first element is the root.
    pub schema: Vec<SchemaElement>,
    /// Number of rows in this file.
    pub num_rows: i64,
    /// Row groups in this file.
    pub row_groups: Vec<RowGroup>,
    /// Optional key/value metadata.
    pub key_value_metadata: Option<Vec<KeyValue>>,
    /// String for application that wrote this file.
    pub created_by: Option<String>,
}

impl TSerializable for FileMetaData {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<FileMetaData> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i32> = None;
        let mut f_2: Option<Vec<SchemaElement>> = None;
        let mut f_3: Option<i64> = None;
        let mut f_4: Option<Vec<RowGroup>> = None;
        let mut f_5: Option<Vec<KeyValue>> = None;
        let mut f_6: Option<String> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(read_struct_list(i_prot)?),
                3 => f_3 = Some(i_prot.read_i64()?),
                4 => f_4 = Some(read_struct_list(i_prot)?),
                5 => f_5 = Some(read_struct_list(i_prot)?),
                6 => f_6 = Some(i_prot.read_string()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("FileMetaData.version", &f_1)?;
        verify_required_field_exists("FileMetaData.schema", &f_2)?;
        verify_required_field_exists("FileMetaData.num_rows", &f_3)?;
        verify_required_field_exists("FileMetaData.row_groups", &f_4)?;
        Ok(FileMetaData {
            version: f_1.unwrap(),
            schema: f_2.unwrap(),
            num_rows: f_3.unwrap(),
            row_groups: f_4.unwrap(),
            key_value_metadata: f_5,
            created_by: f_6,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("FileMetaData"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("version", TType::I32, 1))?;
        o_prot.write_i32(self.version)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("schema", TType::List, 2))?;
        write_struct_list(o_prot, TType::Struct, &self.schema)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_rows", TType::I64, 3))?;
        o_prot.write_i64(self.num_rows)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("row_groups", TType::List, 4))?;
        write_struct_list(o_prot, TType::Struct, &self.row_groups)?;
        o_prot.write_field_end()?;
        if let Some(v) = &self.key_value_metadata {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "key_value_metadata",
                TType::List,
                5,
            ))?;
            write_struct_list(o_prot, TType::Struct, v)?;
            o_prot.write_field_end()?;
        }
        if let Some(v) = &self.created_by {
            o_prot.write_field_begin(&TFieldIdentifier::new("created_by", TType::String, 6))?;
            o_prot.write_string(v)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}
