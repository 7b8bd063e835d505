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

//! Contains the file writer API. Row groups are written in sequence, each
//! column in schema order; closing the writer serializes the footer, its
//! length, and the trailing magic.

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use thrift::protocol::TOutputProtocol;

use crate::column::page::{CompressedPage, Page, PageWriteSpec, PageWriter};
use crate::column::writer::write_column_chunk;
use crate::column::DataColumn;
use crate::errors::Result;
use crate::file::properties::{WriterProperties, WriterPropertiesPtr};
use crate::file::reader::read_footer;
use crate::file::{FOOTER_SIZE, PARQUET_MAGIC};
use crate::format;
use crate::record::{shred_rows, Row};
use crate::schema::types::{Field, SchemaDescPtr, SchemaDescriptor};
use crate::thrift::{TCompactOutputProtocol, TSerializable};

/// A wrapper around a [`Write`] that keeps track of the number of bytes
/// written, so page and footer offsets can be recorded.
#[derive(Debug)]
pub struct TrackedWrite<W> {
    inner: W,
    bytes_written: usize,
}

impl<W: Write> TrackedWrite<W> {
    /// Create a new [`TrackedWrite`] starting at offset zero.
    pub fn new(inner: W) -> Self {
        Self::new_at(inner, 0)
    }

    /// Create a new [`TrackedWrite`] whose next byte lands at `offset`;
    /// used when appending to an existing file.
    pub fn new_at(inner: W, offset: usize) -> Self {
        Self {
            inner,
            bytes_written: offset,
        }
    }

    /// Returns the stream offset the next write lands at.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl<W: Write> Write for TrackedWrite<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// A serialized implementation for Parquet [`PageWriter`]: serializes page
/// headers and payloads into the output stream.
pub struct SerializedPageWriter<'a, W> {
    sink: &'a mut TrackedWrite<W>,
}

impl<'a, W: Write> SerializedPageWriter<'a, W> {
    pub fn new(sink: &'a mut TrackedWrite<W>) -> Self {
        Self { sink }
    }

    /// Serializes the page header into Thrift, returning the number of bytes
    /// written into the sink.
    fn serialize_page_header(&mut self, header: format::PageHeader) -> Result<usize> {
        let start_pos = self.sink.bytes_written();
        {
            let mut protocol = TCompactOutputProtocol::new(&mut self.sink);
            header.write_to_out_protocol(&mut protocol)?;
            protocol.flush()?;
        }
        Ok(self.sink.bytes_written() - start_pos)
    }
}

impl<'a, W: Write> PageWriter for SerializedPageWriter<'a, W> {
    fn write_page(&mut self, page: CompressedPage) -> Result<PageWriteSpec> {
        let uncompressed_size = page.uncompressed_size();
        let compressed_size = page.compressed_size();
        let num_values = page.num_values();
        let page_type = page.page_type();

        let mut page_header = format::PageHeader {
            type_: page_type.into(),
            uncompressed_page_size: uncompressed_size as i32,
            compressed_page_size: compressed_size as i32,
            crc: None,
            data_page_header: None,
            index_page_header: None,
            dictionary_page_header: None,
        };
        match page.compressed_page() {
            Page::DataPage {
                encoding,
                def_level_encoding,
                rep_level_encoding,
                ..
            } => {
                page_header.data_page_header = Some(format::DataPageHeader {
                    num_values: num_values as i32,
                    encoding: (*encoding).into(),
                    definition_level_encoding: (*def_level_encoding).into(),
                    repetition_level_encoding: (*rep_level_encoding).into(),
                    statistics: None,
                });
            }
            Page::DictionaryPage {
                encoding, is_sorted, ..
            } => {
                page_header.dictionary_page_header = Some(format::DictionaryPageHeader {
                    num_values: num_values as i32,
                    encoding: (*encoding).into(),
                    is_sorted: Some(*is_sorted),
                });
            }
        }

        let start_pos = self.sink.bytes_written() as u64;
        let header_size = self.serialize_page_header(page_header)?;
        self.sink.write_all(page.data())?;

        let mut spec = PageWriteSpec::new();
        spec.page_type = Some(page_type);
        spec.uncompressed_size = uncompressed_size + header_size;
        spec.compressed_size = compressed_size + header_size;
        spec.num_values = num_values;
        spec.offset = start_pos;
        spec.bytes_written = self.sink.bytes_written() as u64 - start_pos;
        Ok(spec)
    }

    fn close(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Parquet file writer API.
///
/// The main workflow:
/// - create the writer; this writes the leading magic (unless appending)
/// - request a row group writer with [`Self::next_row_group`], write every
///   column in schema order, close it
/// - repeat for subsequent row groups
/// - [`Self::close`] writes the footer
#[derive(Debug)]
pub struct SerializedFileWriter<W: Write> {
    buf: TrackedWrite<W>,
    descr: SchemaDescPtr,
    props: WriterPropertiesPtr,
    row_groups: Vec<format::RowGroup>,
    key_value_metadata: Option<Vec<format::KeyValue>>,
    row_group_open: bool,
}

impl<W: Write> SerializedFileWriter<W> {
    /// Creates a file writer for a fresh stream, writing the leading magic.
    pub fn new(buf: W, fields: Vec<Field>, properties: WriterProperties) -> Result<Self> {
        let descr = Arc::new(SchemaDescriptor::from_fields(fields)?);
        check_int96_allowed(&descr, &properties)?;
        let mut buf = TrackedWrite::new(buf);
        buf.write_all(&PARQUET_MAGIC)?;
        Ok(Self {
            buf,
            descr,
            props: Arc::new(properties),
            row_groups: vec![],
            key_value_metadata: None,
            row_group_open: false,
        })
    }

    /// The schema descriptor this writer enforces.
    pub fn schema_descr(&self) -> &SchemaDescriptor {
        &self.descr
    }

    /// Attaches custom key/value metadata to the footer.
    pub fn set_custom_metadata(&mut self, metadata: HashMap<String, String>) {
        let mut pairs: Vec<_> = metadata.into_iter().collect();
        pairs.sort();
        self.key_value_metadata = Some(
            pairs
                .into_iter()
                .map(|(key, value)| format::KeyValue {
                    key,
                    value: Some(value),
                })
                .collect(),
        );
    }

    /// Opens the next row group. The previous row group writer must have
    /// been closed.
    pub fn next_row_group(&mut self) -> Result<SerializedRowGroupWriter<'_, W>> {
        self.assert_previous_writer_closed()?;
        self.props.cancellation_token().check()?;
        self.row_group_open = true;
        let num_columns = self.descr.num_columns();
        Ok(SerializedRowGroupWriter {
            writer: self,
            column_index: 0,
            chunks: Vec::with_capacity(num_columns),
            total_rows: None,
            total_byte_size: 0,
        })
    }

    /// Shreds and writes `rows`, splitting them into row groups of the
    /// configured target size.
    pub fn write_row_batch(&mut self, rows: &[Row]) -> Result<()> {
        for batch in rows.chunks(self.props.row_group_size().max(1)) {
            let fields = self.descr.fields().to_vec();
            let columns = shred_rows(&fields, batch)?;
            let mut row_group = self.next_row_group()?;
            for column in &columns {
                row_group.write_column(column)?;
            }
            row_group.close()?;
        }
        Ok(())
    }

    /// Closes the writer: serializes the footer, its length and the trailing
    /// magic, and returns the footer struct.
    pub fn close(mut self) -> Result<format::FileMetaData> {
        self.assert_previous_writer_closed()?;

        let num_rows = self.row_groups.iter().map(|rg| rg.num_rows).sum();
        let file_metadata = format::FileMetaData {
            version: 1,
            schema: self.descr.elements().to_vec(),
            num_rows,
            row_groups: std::mem::take(&mut self.row_groups),
            key_value_metadata: self.key_value_metadata.take(),
            created_by: Some(self.props.created_by().to_owned()),
        };

        let start_pos = self.buf.bytes_written();
        {
            let mut protocol = TCompactOutputProtocol::new(&mut self.buf);
            file_metadata.write_to_out_protocol(&mut protocol)?;
            protocol.flush()?;
        }
        let metadata_len = (self.buf.bytes_written() - start_pos) as u32;

        let mut footer = [0u8; FOOTER_SIZE];
        footer[0..4].copy_from_slice(&metadata_len.to_le_bytes());
        footer[4..].copy_from_slice(&PARQUET_MAGIC);
        self.buf.write_all(&footer)?;
        self.buf.flush()?;
        Ok(file_metadata)
    }

    fn assert_previous_writer_closed(&self) -> Result<()> {
        if self.row_group_open {
            Err(invalid_err!("previous row group writer was not closed"))
        } else {
            Ok(())
        }
    }
}

impl<W: Read + Write + Seek> SerializedFileWriter<W> {
    /// Opens a writer that appends row groups to an existing file.
    ///
    /// The existing footer is read and its row groups pre-seeded; writing
    /// resumes just before the old footer-length field, and closing rewrites
    /// the footer and trailing magic. An empty stream behaves like
    /// [`Self::new`]. The schema must match the file's schema exactly.
    pub fn append(mut buf: W, fields: Vec<Field>, properties: WriterProperties) -> Result<Self> {
        let end = buf.seek(SeekFrom::End(0))?;
        if end == 0 {
            return Self::new(buf, fields, properties);
        }

        let descr = Arc::new(SchemaDescriptor::from_fields(fields)?);
        check_int96_allowed(&descr, &properties)?;

        let (existing, _metadata_len) = read_footer(&mut buf)?;
        if existing.schema.as_slice() != descr.elements() {
            return Err(invalid_err!(
                "append schema does not match the schema already in the file"
            ));
        }

        // resume right before the old footer length field; the old metadata
        // bytes become dead space the new footer's offsets never reference
        let resume_at = end - FOOTER_SIZE as u64;
        buf.seek(SeekFrom::Start(resume_at))?;

        Ok(Self {
            buf: TrackedWrite::new_at(buf, resume_at as usize),
            descr,
            props: Arc::new(properties),
            row_groups: existing.row_groups,
            key_value_metadata: existing.key_value_metadata,
            row_group_open: false,
        })
    }
}

/// Parquet row group writer API. Columns must be written sequentially, in
/// schema order, and every column must be written before the row group can
/// close.
pub struct SerializedRowGroupWriter<'a, W: Write> {
    writer: &'a mut SerializedFileWriter<W>,
    column_index: usize,
    chunks: Vec<format::ColumnChunk>,
    total_rows: Option<u64>,
    total_byte_size: i64,
}

impl<'a, W: Write> SerializedRowGroupWriter<'a, W> {
    /// Number of leaf columns this row group expects.
    pub fn num_columns(&self) -> usize {
        self.writer.descr.num_columns()
    }

    /// Writes the next column chunk. `column` must describe the next leaf in
    /// schema order.
    pub fn write_column(&mut self, column: &DataColumn) -> Result<()> {
        if self.column_index >= self.num_columns() {
            return Err(invalid_err!(
                "all {} columns of this row group are already written",
                self.num_columns()
            ));
        }
        let descr = self.writer.descr.column(self.column_index);
        if column.path() != descr.path() {
            return Err(invalid_err!(
                "column {} written out of schema order, expected {}",
                column.path(),
                descr.path()
            ));
        }

        let props = self.writer.props.clone();
        let mut page_writer = SerializedPageWriter::new(&mut self.writer.buf);
        let result = write_column_chunk(&mut page_writer, &descr, &props, column)?;
        page_writer.close()?;

        match self.total_rows {
            Some(rows) if rows != result.num_rows => {
                return Err(invalid_err!(
                    "column {} spans {} rows, the row group has {}",
                    descr.path(),
                    result.num_rows,
                    rows
                ))
            }
            None => self.total_rows = Some(result.num_rows),
            _ => {}
        }

        self.total_byte_size += result.total_uncompressed_size;
        self.chunks.push(result.chunk);
        self.column_index += 1;
        Ok(())
    }

    /// Seals the row group and appends it to the footer under construction.
    pub fn close(self) -> Result<()> {
        if self.column_index != self.num_columns() {
            return Err(invalid_err!(
                "row group closed after {} of {} columns",
                self.column_index,
                self.num_columns()
            ));
        }
        self.writer.row_groups.push(format::RowGroup {
            columns: self.chunks,
            total_byte_size: self.total_byte_size,
            num_rows: self.total_rows.unwrap_or(0) as i64,
        });
        self.writer.row_group_open = false;
        Ok(())
    }
}

/// Rejects schemas that need INT96 when the property disables it.
fn check_int96_allowed(descr: &SchemaDescriptor, props: &WriterProperties) -> Result<()> {
    if props.int96_timestamps() {
        return Ok(());
    }
    for column in descr.columns() {
        if column.physical_type() == crate::basic::Type::INT96 {
            return Err(unsupported_err!(
                "column {} requires legacy INT96 timestamps, which are disabled",
                column.path()
            ));
        }
    }
    Ok(())
}
