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

//! Reassembles one column chunk from its pages: decodes the optional
//! dictionary page, then drains data pages until the chunk's value count is
//! satisfied.

use crate::basic::{Encoding, Type as PhysicalType};
use crate::column::page::{Page, PageReader};
use crate::column::{DataColumn, ValueBuffer};
use crate::data_type::ParquetValueType;
use crate::encodings::decoding::{decode_plain, DictDecoder};
use crate::encodings::levels::decode_rle_levels;
use crate::errors::Result;
use crate::schema::types::ColumnDescriptor;
use crate::util::cancel::CancellationToken;

/// Reads a whole column chunk of `num_values` level slots.
pub(crate) fn read_column_chunk(
    pages: &mut dyn PageReader,
    descr: &ColumnDescriptor,
    num_values: usize,
    token: &CancellationToken,
) -> Result<DataColumn> {
    match descr.physical_type() {
        PhysicalType::BOOLEAN => read_typed::<bool>(pages, descr, num_values, token),
        PhysicalType::INT32 => read_typed::<i32>(pages, descr, num_values, token),
        PhysicalType::INT64 => read_typed::<i64>(pages, descr, num_values, token),
        PhysicalType::INT96 => {
            read_typed::<crate::data_type::Int96>(pages, descr, num_values, token)
        }
        PhysicalType::FLOAT => read_typed::<f32>(pages, descr, num_values, token),
        PhysicalType::DOUBLE => read_typed::<f64>(pages, descr, num_values, token),
        PhysicalType::BYTE_ARRAY => {
            read_typed::<crate::data_type::ByteArray>(pages, descr, num_values, token)
        }
        PhysicalType::FIXED_LEN_BYTE_ARRAY => {
            read_typed::<crate::data_type::FixedLenByteArray>(pages, descr, num_values, token)
        }
    }
}

fn read_typed<T: ParquetValueType>(
    pages: &mut dyn PageReader,
    descr: &ColumnDescriptor,
    num_values: usize,
    token: &CancellationToken,
) -> Result<DataColumn>
where
    ValueBuffer: From<Vec<T>>,
{
    let max_def = descr.max_def_level();
    let max_rep = descr.max_rep_level();

    let mut dict: Option<DictDecoder<T>> = None;
    let mut values: Vec<T> = Vec::new();
    let mut def_levels: Option<Vec<i16>> = (max_def > 0).then(Vec::new);
    let mut rep_levels: Option<Vec<i16>> = (max_rep > 0).then(Vec::new);
    let mut slots_read = 0usize;

    while slots_read < num_values {
        token.check()?;
        let page = pages.get_next_page()?.ok_or_else(|| {
            corrupt_err!(
                "column {} ended after {} of {} values",
                descr.path(),
                slots_read,
                num_values
            )
        })?;
        match page {
            Page::DictionaryPage {
                buf,
                num_values: dict_len,
                encoding,
                ..
            } => {
                if dict.is_some() {
                    return Err(corrupt_err!(
                        "column {} has more than one dictionary page",
                        descr.path()
                    ));
                }
                if !matches!(encoding, Encoding::PLAIN | Encoding::PLAIN_DICTIONARY) {
                    return Err(unsupported_err!(
                        "dictionary page encoding {} has no handler",
                        encoding
                    ));
                }
                let entries = decode_plain::<T>(&buf, dict_len as usize, descr.type_length())?;
                dict = Some(DictDecoder::new(entries));
            }
            Page::DataPage {
                buf,
                num_values: page_slots,
                encoding,
                ..
            } => {
                let page_slots = page_slots as usize;
                if slots_read + page_slots > num_values {
                    return Err(corrupt_err!(
                        "column {} holds {} values but its pages hold at least {}",
                        descr.path(),
                        num_values,
                        slots_read + page_slots
                    ));
                }

                let mut offset = 0usize;
                if let Some(out) = rep_levels.as_mut() {
                    let (levels, consumed) =
                        decode_rle_levels(&buf[offset..], page_slots, max_rep)?;
                    offset += consumed;
                    out.extend(levels);
                }
                let num_present = match def_levels.as_mut() {
                    Some(out) => {
                        let (levels, consumed) =
                            decode_rle_levels(&buf[offset..], page_slots, max_def)?;
                        offset += consumed;
                        let present = levels.iter().filter(|l| **l == max_def).count();
                        out.extend(levels);
                        present
                    }
                    None => page_slots,
                };

                let data = &buf[offset..];
                let mut page_values = match encoding {
                    Encoding::PLAIN => decode_plain::<T>(data, num_present, descr.type_length())?,
                    Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY => {
                        let dict = dict.as_ref().ok_or_else(|| {
                            corrupt_err!(
                                "column {} has a dictionary-encoded page but no dictionary",
                                descr.path()
                            )
                        })?;
                        dict.decode(data, num_present)?
                    }
                    other => {
                        return Err(unsupported_err!(
                            "data page encoding {} has no handler",
                            other
                        ))
                    }
                };
                values.append(&mut page_values);
                slots_read += page_slots;
            }
        }
    }

    if let Some(levels) = rep_levels.as_ref() {
        if levels.first().is_some_and(|r| *r != 0) {
            return Err(corrupt_err!(
                "column {} does not start at a record boundary",
                descr.path()
            ));
        }
    }

    Ok(DataColumn::new(
        descr.path().clone(),
        descr.data_type(),
        ValueBuffer::from(values),
        def_levels,
        rep_levels,
        max_def,
        max_rep,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::page::{CompressedPage, PageWriteSpec, PageWriter};
    use crate::column::writer::write_column_chunk;
    use crate::file::properties::WriterProperties;
    use crate::record::{assemble, shred, Value};
    use crate::schema::types::{DataType, Field, SchemaDescriptor};

    /// In-memory page sink/source used to exercise the chunk writer and
    /// reader without a file.
    #[derive(Default)]
    struct PageBuffer {
        pages: Vec<Page>,
        cursor: usize,
        offset: u64,
    }

    impl PageWriter for PageBuffer {
        fn write_page(&mut self, page: CompressedPage) -> Result<PageWriteSpec> {
            let mut spec = PageWriteSpec::new();
            spec.page_type = Some(page.page_type());
            spec.uncompressed_size = page.uncompressed_size();
            spec.compressed_size = page.compressed_size();
            spec.num_values = page.num_values();
            spec.offset = self.offset;
            spec.bytes_written = page.compressed_size() as u64;
            self.offset += spec.bytes_written;
            // pages round-trip uncompressed in this buffer
            self.pages.push(page.compressed_page().clone());
            Ok(spec)
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    impl PageReader for PageBuffer {
        fn get_next_page(&mut self) -> Result<Option<Page>> {
            let page = self.pages.get(self.cursor).cloned();
            self.cursor += 1;
            Ok(page)
        }
    }

    fn chunk_roundtrip(field: Field, values: Vec<Value>, props: WriterProperties) {
        let descr = SchemaDescriptor::from_fields(vec![field.clone()]).unwrap();
        let columns = shred(&field, &values).unwrap();
        let mut reassembled = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            let mut buffer = PageBuffer::default();
            // the buffer keeps payloads uncompressed, so write without a codec
            let props = WriterProperties::builder()
                .set_compression(crate::basic::Compression::UNCOMPRESSED)
                .set_dictionary_enabled(props.dictionary_enabled())
                .set_data_page_row_count_limit(props.data_page_row_count_limit())
                .build();
            write_column_chunk(&mut buffer, &descr.column(i), &props, column).unwrap();
            let back = read_column_chunk(
                &mut buffer,
                &descr.column(i),
                column.num_slots(),
                props.cancellation_token(),
            )
            .unwrap();
            assert_eq!(&back, column);
            reassembled.push(back);
        }
        assert_eq!(assemble(&field, &reassembled).unwrap(), values);
    }

    #[test]
    fn test_chunk_roundtrip_plain() {
        chunk_roundtrip(
            Field::primitive("id", DataType::Int32, false),
            (0..100).map(Value::Int32).collect(),
            WriterProperties::builder().set_dictionary_enabled(false).build(),
        );
    }

    #[test]
    fn test_chunk_roundtrip_dictionary() {
        chunk_roundtrip(
            Field::primitive("city", DataType::Utf8, true),
            (0..100)
                .map(|i| {
                    if i % 10 == 0 {
                        Value::Null
                    } else {
                        Value::Str(format!("city#{}", i % 3))
                    }
                })
                .collect(),
            WriterProperties::builder().build(),
        );
    }

    #[test]
    fn test_chunk_roundtrip_multiple_pages() {
        chunk_roundtrip(
            Field::list("xs", Field::primitive("element", DataType::Int64, false)),
            (0..50)
                .map(|i| {
                    if i % 7 == 0 {
                        Value::List(vec![])
                    } else {
                        Value::List(vec![Value::Int64(i), Value::Int64(i * 2)])
                    }
                })
                .collect(),
            WriterProperties::builder()
                .set_data_page_row_count_limit(8)
                .build(),
        );
    }

    #[test]
    fn test_chunk_roundtrip_booleans() {
        chunk_roundtrip(
            Field::primitive("flag", DataType::Boolean, true),
            (0..20)
                .map(|i| match i % 3 {
                    0 => Value::Bool(true),
                    1 => Value::Bool(false),
                    _ => Value::Null,
                })
                .collect(),
            WriterProperties::builder().build(),
        );
    }

    #[test]
    fn test_chunk_roundtrip_empty_column() {
        chunk_roundtrip(
            Field::primitive("never", DataType::Utf8, true),
            Vec::new(),
            WriterProperties::builder().build(),
        );
    }

    #[test]
    fn test_wrong_logical_type_rejected() {
        let descr = SchemaDescriptor::from_fields(vec![Field::primitive(
            "id",
            DataType::Int32,
            false,
        )])
        .unwrap();
        let field = Field::primitive("id", DataType::Date, false);
        let columns = shred(&field, &[Value::Date(1)]).unwrap();
        let mut buffer = PageBuffer::default();
        let props = WriterProperties::builder().build();
        let err = write_column_chunk(&mut buffer, &descr.column(0), &props, &columns[0])
            .unwrap_err();
        assert!(matches!(err, crate::errors::ParquetError::InvalidArgument(_)));
    }

    #[test]
    fn test_cancelled_write() {
        let descr = SchemaDescriptor::from_fields(vec![Field::primitive(
            "id",
            DataType::Int32,
            false,
        )])
        .unwrap();
        let field = Field::primitive("id", DataType::Int32, false);
        let columns = shred(&field, &[Value::Int32(1)]).unwrap();
        let token = crate::util::cancel::CancellationToken::new();
        token.cancel();
        let props = WriterProperties::builder()
            .set_cancellation_token(token)
            .build();
        let mut buffer = PageBuffer::default();
        let err = write_column_chunk(&mut buffer, &descr.column(0), &props, &columns[0])
            .unwrap_err();
        assert!(matches!(err, crate::errors::ParquetError::Cancelled));
    }
}
