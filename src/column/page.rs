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

//! Contains Parquet Page definitions and page reader/writer interfaces.

use bytes::Bytes;

use crate::basic::{Encoding, PageType};
use crate::errors::Result;

/// One page of a column chunk, with its payload held uncompressed.
#[derive(Debug, Clone)]
pub enum Page {
    /// A v1 data page: RLE level streams followed by encoded values.
    DataPage {
        buf: Bytes,
        /// Level slots in this page, nulls and empty collections included.
        num_values: u32,
        encoding: Encoding,
        def_level_encoding: Encoding,
        rep_level_encoding: Encoding,
    },
    /// The chunk's dictionary, PLAIN-encoded distinct values.
    DictionaryPage {
        buf: Bytes,
        num_values: u32,
        encoding: Encoding,
        is_sorted: bool,
    },
}

impl Page {
    /// Returns [`PageType`] for this page.
    pub fn page_type(&self) -> PageType {
        match self {
            Page::DataPage { .. } => PageType::DATA_PAGE,
            Page::DictionaryPage { .. } => PageType::DICTIONARY_PAGE,
        }
    }

    /// Returns the uncompressed payload of this page.
    pub fn buffer(&self) -> &Bytes {
        match self {
            Page::DataPage { buf, .. } => buf,
            Page::DictionaryPage { buf, .. } => buf,
        }
    }

    /// Returns the number of values (level slots) in this page.
    pub fn num_values(&self) -> u32 {
        match self {
            Page::DataPage { num_values, .. } => *num_values,
            Page::DictionaryPage { num_values, .. } => *num_values,
        }
    }

    /// Returns this page's value encoding.
    pub fn encoding(&self) -> Encoding {
        match self {
            Page::DataPage { encoding, .. } => *encoding,
            Page::DictionaryPage { encoding, .. } => *encoding,
        }
    }
}

/// A [`Page`] whose payload has been run through the chunk's compressor.
///
/// The page body keeps the compressed bytes; `uncompressed_size` remembers
/// the original payload length for the page header.
pub struct CompressedPage {
    compressed_page: Page,
    uncompressed_size: usize,
}

impl CompressedPage {
    pub fn new(compressed_page: Page, uncompressed_size: usize) -> Self {
        Self {
            compressed_page,
            uncompressed_size,
        }
    }

    pub fn page_type(&self) -> PageType {
        self.compressed_page.page_type()
    }

    /// The page with the compressed payload.
    pub fn compressed_page(&self) -> &Page {
        &self.compressed_page
    }

    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_size
    }

    pub fn compressed_size(&self) -> usize {
        self.compressed_page.buffer().len()
    }

    pub fn num_values(&self) -> u32 {
        self.compressed_page.num_values()
    }

    pub fn encoding(&self) -> Encoding {
        self.compressed_page.encoding()
    }

    pub fn data(&self) -> &[u8] {
        self.compressed_page.buffer()
    }
}

/// Bookkeeping returned after a page is written out.
#[derive(Debug, Clone, Default)]
pub struct PageWriteSpec {
    pub page_type: Option<PageType>,
    /// Page payload plus header bytes, uncompressed.
    pub uncompressed_size: usize,
    /// Page payload plus header bytes, as stored.
    pub compressed_size: usize,
    pub num_values: u32,
    /// File offset of the page header.
    pub offset: u64,
    pub bytes_written: u64,
}

impl PageWriteSpec {
    pub fn new() -> Self {
        Self::default()
    }
}

/// API for writing pages in a column chunk sequentially.
pub trait PageWriter {
    /// Writes a page, returning where and how large it landed.
    fn write_page(&mut self, page: CompressedPage) -> Result<PageWriteSpec>;

    /// Flushes the underlying sink.
    fn close(&mut self) -> Result<()>;
}

/// API for reading the pages of one column chunk in order.
///
/// Implementations hand out pages with their payload already decompressed.
pub trait PageReader {
    /// Gets the next page, or `None` when the chunk is exhausted.
    fn get_next_page(&mut self) -> Result<Option<Page>>;
}
