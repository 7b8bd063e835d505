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

//! Contains the file reader API: verifies the magic bytes, decodes the
//! footer, and walks column chunks page by page.

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use bytes::Bytes;

use crate::basic::{Compression, PageType};
use crate::column::page::{Page, PageReader};
use crate::column::reader::read_column_chunk;
use crate::column::DataColumn;
use crate::compression::{create_codec, Codec};
use crate::errors::{ParquetError, Result};
use crate::file::metadata::ParquetMetaData;
use crate::file::properties::{ReaderProperties, ReaderPropertiesPtr};
use crate::file::{FOOTER_SIZE, PARQUET_MAGIC};
use crate::format;
use crate::record::{assemble_rows, Row};
use crate::schema::types::{ColumnPath, SchemaDescriptor};
use crate::thrift::{TCompactInputProtocol, TSerializable};

/// Reads the Thrift footer from a seekable stream, verifying both magics and
/// the footer bounds. Returns the decoded struct and the metadata byte
/// length.
pub(crate) fn read_footer<R: Read + Seek>(reader: &mut R) -> Result<(format::FileMetaData, u32)> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    if file_size < (PARQUET_MAGIC.len() + FOOTER_SIZE) as u64 {
        return Err(corrupt_err!(
            "file of {} bytes is too small to be a Parquet file",
            file_size
        ));
    }

    let mut head = [0u8; 4];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut head)?;
    if head != PARQUET_MAGIC {
        return Err(corrupt_err!("leading magic bytes are missing"));
    }

    let mut footer = [0u8; FOOTER_SIZE];
    reader.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
    reader.read_exact(&mut footer)?;
    if footer[4..] != PARQUET_MAGIC {
        return Err(corrupt_err!("trailing magic bytes are missing"));
    }

    let metadata_len = u32::from_le_bytes(footer[0..4].try_into().unwrap());
    let footer_end = file_size - FOOTER_SIZE as u64;
    if metadata_len as u64 + PARQUET_MAGIC.len() as u64 > footer_end {
        return Err(corrupt_err!(
            "footer length of {} bytes is past the stream bounds",
            metadata_len
        ));
    }

    reader.seek(SeekFrom::Start(footer_end - metadata_len as u64))?;
    let mut buf = vec![0u8; metadata_len as usize];
    reader.read_exact(&mut buf)?;

    let mut cursor = std::io::Cursor::new(buf);
    let mut protocol = TCompactInputProtocol::new(&mut cursor);
    let metadata = format::FileMetaData::read_from_in_protocol(&mut protocol)
        .map_err(|e| ParquetError::Corrupt(format!("could not parse footer: {e}")))?;
    Ok((metadata, metadata_len))
}

/// Parquet file reader API over any `Read + Seek` stream.
#[derive(Debug)]
pub struct SerializedFileReader<R: Read + Seek> {
    reader: R,
    metadata: ParquetMetaData,
    props: ReaderPropertiesPtr,
}

impl<R: Read + Seek> SerializedFileReader<R> {
    /// Opens a reader with default properties.
    pub fn new(reader: R) -> Result<Self> {
        Self::new_with_properties(reader, ReaderProperties::builder().build())
    }

    /// Opens a reader, verifying the magic bytes and decoding the footer.
    pub fn new_with_properties(mut reader: R, props: ReaderProperties) -> Result<Self> {
        let (thrift_metadata, _) = read_footer(&mut reader)?;
        let descr = Arc::new(SchemaDescriptor::new(
            thrift_metadata.schema.clone(),
            props.treat_byte_array_as_string(),
        )?);
        Ok(Self {
            reader,
            metadata: ParquetMetaData::new(thrift_metadata, descr),
            props: Arc::new(props),
        })
    }

    /// The parsed file metadata.
    pub fn metadata(&self) -> &ParquetMetaData {
        &self.metadata
    }

    /// Number of row groups in the file.
    pub fn num_row_groups(&self) -> usize {
        self.metadata.num_row_groups()
    }

    /// The custom key/value metadata from the footer.
    pub fn custom_metadata(&self) -> HashMap<String, String> {
        self.metadata.custom_metadata()
    }

    /// Opens the i-th row group.
    pub fn row_group(&mut self, i: usize) -> Result<SerializedRowGroupReader<'_, R>> {
        if i >= self.metadata.num_row_groups() {
            return Err(invalid_err!(
                "row group {} out of range, the file has {}",
                i,
                self.metadata.num_row_groups()
            ));
        }
        self.props.cancellation_token().check()?;
        Ok(SerializedRowGroupReader {
            file: self,
            index: i,
        })
    }

    /// Reads and reassembles every row of the file.
    pub fn read_rows(&mut self) -> Result<Vec<Row>> {
        let fields = self.metadata.fields().to_vec();
        let num_columns = self.metadata.schema_descr().num_columns();
        let mut rows = Vec::new();
        for i in 0..self.num_row_groups() {
            let mut row_group = self.row_group(i)?;
            let mut columns = Vec::with_capacity(num_columns);
            for c in 0..num_columns {
                columns.push(row_group.read_column_at(c)?);
            }
            rows.extend(assemble_rows(&fields, &columns)?);
        }
        Ok(rows)
    }
}

/// Reads the column chunks of one row group.
pub struct SerializedRowGroupReader<'a, R: Read + Seek> {
    file: &'a mut SerializedFileReader<R>,
    index: usize,
}

impl<'a, R: Read + Seek> SerializedRowGroupReader<'a, R> {
    /// Metadata of this row group.
    pub fn metadata(&self) -> &format::RowGroup {
        self.file.metadata.row_group(self.index)
    }

    /// Rows in this row group.
    pub fn num_rows(&self) -> i64 {
        self.metadata().num_rows
    }

    /// Number of column chunks.
    pub fn num_columns(&self) -> usize {
        self.metadata().columns.len()
    }

    /// Reads the column chunk for the i-th leaf of the schema.
    pub fn read_column_at(&mut self, i: usize) -> Result<DataColumn> {
        let descr = self.file.metadata.schema_descr_ptr().column(i);
        self.read_column(descr.path())
    }

    /// Reads the column chunk with the given path, locating the chunk by
    /// `path_in_schema`.
    pub fn read_column(&mut self, path: &ColumnPath) -> Result<DataColumn> {
        let descr = self
            .file
            .metadata
            .schema_descr()
            .column_by_path(path)
            .ok_or_else(|| invalid_err!("no column {} in the schema", path))?;

        let row_group = self.file.metadata.row_group(self.index);
        let meta = row_group
            .columns
            .iter()
            .filter_map(|c| c.meta_data.as_ref())
            .find(|m| m.path_in_schema == path.parts())
            .ok_or_else(|| {
                corrupt_err!("row group {} has no chunk for column {}", self.index, path)
            })?;

        let codec = Compression::try_from(meta.codec)?;
        let start = meta
            .dictionary_page_offset
            .unwrap_or(meta.data_page_offset);
        if start < 0 || meta.total_compressed_size < 0 {
            return Err(corrupt_err!("column {} has negative offsets", path));
        }

        self.file.reader.seek(SeekFrom::Start(start as u64))?;
        let mut pages = SerializedPageReader::new(
            &mut self.file.reader,
            codec,
            meta.total_compressed_size as usize,
        )?;
        read_column_chunk(
            &mut pages,
            &descr,
            meta.num_values as usize,
            self.file.props.cancellation_token(),
        )
    }
}

/// A serialized implementation for Parquet [`PageReader`]: consumes page
/// headers and payloads from a stream positioned at the chunk start, until
/// the chunk's byte budget is spent.
pub struct SerializedPageReader<'a, R: Read> {
    reader: &'a mut R,
    decompressor: Option<Box<dyn Codec>>,
    remaining_bytes: usize,
}

impl<'a, R: Read> SerializedPageReader<'a, R> {
    pub fn new(reader: &'a mut R, codec: Compression, chunk_size: usize) -> Result<Self> {
        Ok(Self {
            reader,
            decompressor: create_codec(codec)?,
            remaining_bytes: chunk_size,
        })
    }

    /// Reads a page header, tracking how many bytes of the chunk it used.
    fn read_page_header(&mut self) -> Result<format::PageHeader> {
        struct TrackedRead<T> {
            inner: T,
            bytes_read: usize,
        }

        impl<T: Read> Read for TrackedRead<T> {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let n = self.inner.read(buf)?;
                self.bytes_read += n;
                Ok(n)
            }
        }

        let mut tracked = TrackedRead {
            inner: &mut self.reader,
            bytes_read: 0,
        };
        let mut protocol = TCompactInputProtocol::new(&mut tracked);
        let header = format::PageHeader::read_from_in_protocol(&mut protocol)
            .map_err(|e| ParquetError::Corrupt(format!("could not parse page header: {e}")))?;
        let header_len = tracked.bytes_read;
        if header_len > self.remaining_bytes {
            return Err(corrupt_err!("page header overruns the column chunk"));
        }
        self.remaining_bytes -= header_len;
        Ok(header)
    }
}

impl<'a, R: Read> PageReader for SerializedPageReader<'a, R> {
    fn get_next_page(&mut self) -> Result<Option<Page>> {
        loop {
            if self.remaining_bytes == 0 {
                return Ok(None);
            }
            let header = self.read_page_header()?;
            if header.compressed_page_size < 0 || header.uncompressed_page_size < 0 {
                return Err(corrupt_err!("page header declares negative sizes"));
            }
            let data_len = header.compressed_page_size as usize;
            if data_len > self.remaining_bytes {
                return Err(corrupt_err!(
                    "page of {} bytes declares more bytes than the {} the chunk holds",
                    data_len,
                    self.remaining_bytes
                ));
            }
            self.remaining_bytes -= data_len;

            let mut buffer = vec![0u8; data_len];
            self.reader.read_exact(&mut buffer)?;

            let page_type = PageType::try_from(header.type_)?;
            if page_type == PageType::INDEX_PAGE {
                // not produced by this crate; skip and read the next page
                continue;
            }
            if page_type == PageType::DATA_PAGE_V2 {
                return Err(unsupported_err!("v2 data pages have no handler"));
            }

            let buffer = match &mut self.decompressor {
                Some(codec) => {
                    let uncompressed_size = header.uncompressed_page_size as usize;
                    let mut decompressed = Vec::with_capacity(uncompressed_size);
                    codec.decompress(&buffer, &mut decompressed, Some(uncompressed_size))?;
                    if decompressed.len() != uncompressed_size {
                        return Err(corrupt_err!(
                            "page decompressed to {} bytes, the header declares {}",
                            decompressed.len(),
                            uncompressed_size
                        ));
                    }
                    Bytes::from(decompressed)
                }
                None => Bytes::from(buffer),
            };

            let page = match page_type {
                PageType::DATA_PAGE => {
                    let data_header = header.data_page_header.ok_or_else(|| {
                        corrupt_err!("data page is missing its data page header")
                    })?;
                    Page::DataPage {
                        buf: buffer,
                        num_values: data_header.num_values.max(0) as u32,
                        encoding: data_header.encoding.try_into()?,
                        def_level_encoding: data_header.definition_level_encoding.try_into()?,
                        rep_level_encoding: data_header.repetition_level_encoding.try_into()?,
                    }
                }
                PageType::DICTIONARY_PAGE => {
                    let dict_header = header.dictionary_page_header.ok_or_else(|| {
                        corrupt_err!("dictionary page is missing its dictionary page header")
                    })?;
                    Page::DictionaryPage {
                        buf: buffer,
                        num_values: dict_header.num_values.max(0) as u32,
                        encoding: dict_header.encoding.try_into()?,
                        is_sorted: dict_header.is_sorted.unwrap_or(false),
                    }
                }
                _ => unreachable!("index and v2 pages are handled above"),
            };
            return Ok(Some(page));
        }
    }
}
