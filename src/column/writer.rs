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

//! Assembles a column chunk: an optional dictionary page followed by data
//! pages carrying RLE level streams and encoded values, with the whole page
//! payload compressed as one blob.

use std::ops::Range;

use bytes::Bytes;

use crate::basic::{Encoding, Type as PhysicalType};
use crate::column::page::{CompressedPage, Page, PageWriter};
use crate::column::{DataColumn, ValueBuffer};
use crate::compression::{create_codec, Codec};
use crate::data_type::ParquetValueType;
use crate::encodings::encoding::{DictEncoder, Encoder, PlainEncoder};
use crate::encodings::levels::encode_rle_levels;
use crate::errors::Result;
use crate::file::properties::WriterProperties;
use crate::format;
use crate::schema::types::ColumnDescriptor;

/// A column uses a dictionary only while the distinct share stays below this
/// ratio of the total value count.
const DICTIONARY_DISTINCT_RATIO: f64 = 0.8;
/// Hard cap on dictionary entries.
const DICTIONARY_MAX_ENTRIES: usize = 1 << 20;

/// The outcome of writing one column chunk.
#[derive(Debug)]
pub(crate) struct ColumnChunkResult {
    pub chunk: format::ColumnChunk,
    /// Records covered by the chunk.
    pub num_rows: u64,
    /// Uncompressed payload bytes, for the row group's `total_byte_size`.
    pub total_uncompressed_size: i64,
}

/// Writes `column` as one column chunk through `page_writer`.
pub(crate) fn write_column_chunk<P: PageWriter>(
    page_writer: &mut P,
    descr: &ColumnDescriptor,
    props: &WriterProperties,
    column: &DataColumn,
) -> Result<ColumnChunkResult> {
    if column.data_type() != descr.data_type() {
        return Err(invalid_err!(
            "column {} holds {:?} values but the schema defines {:?}",
            column.path(),
            column.data_type(),
            descr.data_type()
        ));
    }
    column.validate(descr.max_def_level(), descr.max_rep_level())?;

    match column.values() {
        ValueBuffer::Bool(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::Int32(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::Int64(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::Int96(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::Float(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::Double(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::ByteArray(v) => write_typed(page_writer, descr, props, column, v),
        ValueBuffer::FixedLenByteArray(v) => write_typed(page_writer, descr, props, column, v),
    }
}

fn write_typed<T: ParquetValueType, P: PageWriter>(
    page_writer: &mut P,
    descr: &ColumnDescriptor,
    props: &WriterProperties,
    column: &DataColumn,
    values: &[T],
) -> Result<ColumnChunkResult> {
    let token = props.cancellation_token();
    let max_def = descr.max_def_level();
    let max_rep = descr.max_rep_level();
    let num_slots = column.num_slots();

    let mut dict_encoder = select_dictionary(props, descr, values)?;
    let mut compressor = create_codec(props.compression())?;

    let mut encodings = vec![Encoding::PLAIN, Encoding::RLE];
    let mut dictionary_page_offset: Option<i64> = None;
    let mut data_page_offset: Option<i64> = None;
    let mut total_compressed_size: i64 = 0;
    let mut total_uncompressed_size: i64 = 0;

    if let Some(encoder) = &dict_encoder {
        token.check()?;
        let dict_buf = encoder.write_dict()?;
        let uncompressed_size = dict_buf.len();
        let buf = compress_payload(&mut compressor, &dict_buf)?;
        let page = CompressedPage::new(
            Page::DictionaryPage {
                buf,
                num_values: encoder.num_entries() as u32,
                encoding: Encoding::PLAIN_DICTIONARY,
                is_sorted: false,
            },
            uncompressed_size,
        );
        let spec = page_writer.write_page(page)?;
        dictionary_page_offset = Some(spec.offset as i64);
        total_compressed_size += spec.compressed_size as i64;
        total_uncompressed_size += spec.uncompressed_size as i64;
        encodings.push(Encoding::PLAIN_DICTIONARY);
    }

    for range in split_pages(column, max_def, props.data_page_row_count_limit()) {
        token.check()?;

        let mut payload = Vec::new();
        if max_rep > 0 {
            let levels = &column.rep_levels().unwrap()[range.slots.clone()];
            payload.extend_from_slice(&encode_rle_levels(levels, max_rep));
        }
        if max_def > 0 {
            let levels = &column.def_levels().unwrap()[range.slots.clone()];
            payload.extend_from_slice(&encode_rle_levels(levels, max_def));
        }
        let encoding = match &mut dict_encoder {
            Some(encoder) => {
                payload.extend_from_slice(&encoder.write_indices(range.values.clone())?);
                encoder.encoding()
            }
            None => {
                let mut encoder = PlainEncoder::new(descr.type_length());
                encoder.put(&values[range.values.clone()])?;
                payload.extend_from_slice(&encoder.flush_buffer()?);
                encoder.encoding()
            }
        };

        let uncompressed_size = payload.len();
        let buf = compress_payload(&mut compressor, &payload)?;
        drop(payload);
        let page = CompressedPage::new(
            Page::DataPage {
                buf,
                num_values: range.slots.len() as u32,
                encoding,
                def_level_encoding: Encoding::RLE,
                rep_level_encoding: Encoding::RLE,
            },
            uncompressed_size,
        );
        let spec = page_writer.write_page(page)?;
        if data_page_offset.is_none() {
            data_page_offset = Some(spec.offset as i64);
        }
        total_compressed_size += spec.compressed_size as i64;
        total_uncompressed_size += spec.uncompressed_size as i64;
    }

    let statistics = if props.statistics_enabled() {
        build_statistics(
            values,
            num_slots,
            dict_encoder.as_ref().map(|e| e.num_entries()),
            descr.type_length(),
        )?
    } else {
        None
    };

    let meta_data = format::ColumnMetaData {
        type_: descr.physical_type().into(),
        encodings: encodings.into_iter().map(Into::into).collect(),
        path_in_schema: descr.path().parts().to_vec(),
        codec: props.compression().into(),
        num_values: num_slots as i64,
        total_uncompressed_size,
        total_compressed_size,
        key_value_metadata: None,
        data_page_offset: data_page_offset.expect("at least one data page is always written"),
        index_page_offset: None,
        dictionary_page_offset,
        statistics,
    };
    let file_offset = dictionary_page_offset.unwrap_or(meta_data.data_page_offset);

    Ok(ColumnChunkResult {
        chunk: format::ColumnChunk {
            file_path: None,
            file_offset,
            meta_data: Some(meta_data),
        },
        num_rows: column.num_rows() as u64,
        total_uncompressed_size,
    })
}

/// Builds a dictionary over `values` and keeps it when the heuristic holds:
/// distinct below 0.8 of the total and within the entry cap. Booleans never
/// use a dictionary.
fn select_dictionary<T: ParquetValueType>(
    props: &WriterProperties,
    descr: &ColumnDescriptor,
    values: &[T],
) -> Result<Option<DictEncoder<T>>> {
    if !props.dictionary_enabled() || T::PHYSICAL_TYPE == PhysicalType::BOOLEAN || values.is_empty()
    {
        return Ok(None);
    }
    let mut encoder = DictEncoder::new(descr.type_length());
    encoder.put(values)?;
    let distinct = encoder.num_entries();
    if distinct <= DICTIONARY_MAX_ENTRIES
        && (distinct as f64) < DICTIONARY_DISTINCT_RATIO * values.len() as f64
    {
        Ok(Some(encoder))
    } else {
        Ok(None)
    }
}

fn compress_payload(compressor: &mut Option<Box<dyn Codec>>, input: &[u8]) -> Result<Bytes> {
    match compressor {
        Some(codec) => {
            let mut output = Vec::new();
            codec.compress(input, &mut output)?;
            Ok(output.into())
        }
        None => Ok(Bytes::copy_from_slice(input)),
    }
}

/// Slot and value ranges of one data page.
struct PageRange {
    slots: Range<usize>,
    values: Range<usize>,
}

/// Splits a chunk into data pages of at most `rows_per_page` records, cutting
/// only at record boundaries. A column with no slots still yields one empty
/// page.
fn split_pages(column: &DataColumn, max_def: i16, rows_per_page: usize) -> Vec<PageRange> {
    let num_slots = column.num_slots();
    if num_slots == 0 {
        return vec![PageRange {
            slots: 0..0,
            values: 0..0,
        }];
    }

    let rep_levels = column.rep_levels();
    let def_levels = column.def_levels();
    let mut pages = Vec::new();
    let mut page_start_slot = 0;
    let mut page_start_value = 0;
    let mut value_cursor = 0;
    let mut rows_in_page = 0;

    for slot in 0..num_slots {
        let starts_record = rep_levels.map_or(true, |levels| levels[slot] == 0);
        if starts_record && rows_in_page == rows_per_page {
            pages.push(PageRange {
                slots: page_start_slot..slot,
                values: page_start_value..value_cursor,
            });
            page_start_slot = slot;
            page_start_value = value_cursor;
            rows_in_page = 0;
        }
        if starts_record {
            rows_in_page += 1;
        }
        if def_levels.map_or(true, |levels| levels[slot] == max_def) {
            value_cursor += 1;
        }
    }
    pages.push(PageRange {
        slots: page_start_slot..num_slots,
        values: page_start_value..value_cursor,
    });
    pages
}

/// Min/max over comparable values, plus null and distinct counts.
///
/// Values without a defined order (INT96, fixed length binaries, NaN floats)
/// are skipped; a chunk with no comparable values carries counts only.
fn build_statistics<T: ParquetValueType>(
    values: &[T],
    num_slots: usize,
    distinct: Option<usize>,
    type_length: usize,
) -> Result<Option<format::Statistics>> {
    let mut min: Option<&T> = None;
    let mut max: Option<&T> = None;
    for value in values {
        if T::compare(value, value).is_none() {
            continue;
        }
        min = Some(match min {
            Some(current) if T::compare(current, value) != Some(std::cmp::Ordering::Greater) => {
                current
            }
            _ => value,
        });
        max = Some(match max {
            Some(current) if T::compare(current, value) != Some(std::cmp::Ordering::Less) => {
                current
            }
            _ => value,
        });
    }

    let encode_one = |value: &T| -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        T::encode_plain(std::slice::from_ref(value), &mut buffer, type_length)?;
        Ok(buffer)
    };
    let min_bytes = min.map(&encode_one).transpose()?;
    let max_bytes = max.map(&encode_one).transpose()?;

    Ok(Some(format::Statistics {
        max: max_bytes.clone(),
        min: min_bytes.clone(),
        null_count: Some((num_slots - values.len()) as i64),
        distinct_count: distinct.map(|d| d as i64),
        max_value: max_bytes,
        min_value: min_bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ColumnPath, DataType};

    fn column(values: Vec<i32>, def: Option<Vec<i16>>, rep: Option<Vec<i16>>) -> DataColumn {
        let max_def = def.is_some() as i16;
        let max_rep = rep.is_some() as i16;
        DataColumn::new(
            ColumnPath::from("c"),
            DataType::Int32,
            ValueBuffer::Int32(values),
            def,
            rep,
            max_def,
            max_rep,
        )
    }

    #[test]
    fn test_split_pages_flat() {
        let column = column((0..10).collect(), None, None);
        let pages = split_pages(&column, 0, 4);
        let slots: Vec<_> = pages.iter().map(|p| p.slots.clone()).collect();
        assert_eq!(slots, vec![0..4, 4..8, 8..10]);
        let values: Vec<_> = pages.iter().map(|p| p.values.clone()).collect();
        assert_eq!(values, vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn test_split_pages_respects_record_boundaries() {
        // two records of three slots each
        let column = column(
            vec![1, 2, 3, 4, 5, 6],
            Some(vec![1, 1, 1, 1, 1, 1]),
            Some(vec![0, 1, 1, 0, 1, 1]),
        );
        let pages = split_pages(&column, 1, 1);
        let slots: Vec<_> = pages.iter().map(|p| p.slots.clone()).collect();
        assert_eq!(slots, vec![0..3, 3..6]);
    }

    #[test]
    fn test_split_pages_empty_column() {
        let column = column(vec![], Some(vec![]), None);
        let pages = split_pages(&column, 1, 100);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].slots, 0..0);
    }

    #[test]
    fn test_split_pages_nulls_consume_no_values() {
        let column = column(vec![7], Some(vec![0, 1, 0]), None);
        let pages = split_pages(&column, 1, 2);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].slots, 0..2);
        assert_eq!(pages[0].values, 0..1);
        assert_eq!(pages[1].slots, 2..3);
        assert_eq!(pages[1].values, 1..1);
    }

    #[test]
    fn test_statistics_min_max() {
        let stats = build_statistics::<i32>(&[3, -1, 7], 4, None, 0)
            .unwrap()
            .unwrap();
        assert_eq!(stats.min_value, Some((-1i32).to_le_bytes().to_vec()));
        assert_eq!(stats.max_value, Some(7i32.to_le_bytes().to_vec()));
        assert_eq!(stats.null_count, Some(1));
    }

    #[test]
    fn test_statistics_skip_nan() {
        let stats = build_statistics::<f64>(&[f64::NAN, 2.0, 1.0], 3, None, 0)
            .unwrap()
            .unwrap();
        assert_eq!(stats.min_value, Some(1.0f64.to_le_bytes().to_vec()));
        assert_eq!(stats.max_value, Some(2.0f64.to_le_bytes().to_vec()));
    }

    #[test]
    fn test_statistics_unordered_type() {
        use crate::data_type::Int96;
        let stats = build_statistics::<Int96>(&[Int96::from_nanos(1)], 1, None, 0)
            .unwrap()
            .unwrap();
        assert!(stats.min_value.is_none());
        assert!(stats.max_value.is_none());
        assert_eq!(stats.null_count, Some(0));
    }
}
