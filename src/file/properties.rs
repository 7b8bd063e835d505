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

//! Writer and reader properties.
//!
//! # Usage
//!
//! ```rust
//! use parquet_lite::basic::Compression;
//! use parquet_lite::file::properties::{ReaderProperties, WriterProperties};
//!
//! // Create properties with default configuration.
//! let props = WriterProperties::builder().build();
//! assert_eq!(props.compression(), Compression::SNAPPY);
//!
//! // Use the builder to assemble a custom configuration.
//! let props = WriterProperties::builder()
//!     .set_compression(Compression::ZSTD)
//!     .set_row_group_size(10_000)
//!     .set_dictionary_enabled(false)
//!     .build();
//! assert_eq!(props.row_group_size(), 10_000);
//!
//! let props = ReaderProperties::builder()
//!     .set_treat_byte_array_as_string(true)
//!     .build();
//! assert!(props.treat_byte_array_as_string());
//! ```

use std::sync::Arc;

use crate::basic::Compression;
use crate::util::cancel::CancellationToken;

const DEFAULT_COMPRESSION: Compression = Compression::SNAPPY;
const DEFAULT_ROW_GROUP_SIZE: usize = 5000;
const DEFAULT_DICTIONARY_ENABLED: bool = true;
const DEFAULT_STATISTICS_ENABLED: bool = true;
const DEFAULT_INT96_TIMESTAMPS: bool = true;
const DEFAULT_DATA_PAGE_ROW_COUNT_LIMIT: usize = 20_000;
const DEFAULT_CREATED_BY: &str = concat!("parquet-lite version ", env!("CARGO_PKG_VERSION"));

/// Reference counted writer properties.
pub type WriterPropertiesPtr = Arc<WriterProperties>;

/// Writer properties, immutable once built; assemble them with
/// [`WriterPropertiesBuilder`].
#[derive(Debug, Clone)]
pub struct WriterProperties {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
    int96_timestamps: bool,
    data_page_row_count_limit: usize,
    created_by: String,
    cancellation_token: CancellationToken,
}

impl Default for WriterProperties {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WriterProperties {
    /// Returns a builder with default values.
    pub fn builder() -> WriterPropertiesBuilder {
        WriterPropertiesBuilder::new()
    }

    /// Block compression applied to every column chunk.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Target number of rows per row group for the row-based write API.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Whether columns may use dictionary encoding.
    pub fn dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Whether min/max statistics are computed for column chunks.
    pub fn statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Whether nanosecond timestamps may be stored as legacy INT96.
    pub fn int96_timestamps(&self) -> bool {
        self.int96_timestamps
    }

    /// Upper bound on rows per data page.
    pub fn data_page_row_count_limit(&self) -> usize {
        self.data_page_row_count_limit
    }

    /// `created_by` string written into the footer.
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Token checked before each page write and between row groups.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }
}

/// Builder for [`WriterProperties`].
pub struct WriterPropertiesBuilder {
    props: WriterProperties,
}

impl WriterPropertiesBuilder {
    fn new() -> Self {
        Self {
            props: WriterProperties {
                compression: DEFAULT_COMPRESSION,
                row_group_size: DEFAULT_ROW_GROUP_SIZE,
                dictionary_enabled: DEFAULT_DICTIONARY_ENABLED,
                statistics_enabled: DEFAULT_STATISTICS_ENABLED,
                int96_timestamps: DEFAULT_INT96_TIMESTAMPS,
                data_page_row_count_limit: DEFAULT_DATA_PAGE_ROW_COUNT_LIMIT,
                created_by: DEFAULT_CREATED_BY.to_string(),
                cancellation_token: CancellationToken::new(),
            },
        }
    }

    /// Finalizes the configuration.
    pub fn build(self) -> WriterProperties {
        self.props
    }

    pub fn set_compression(mut self, value: Compression) -> Self {
        self.props.compression = value;
        self
    }

    pub fn set_row_group_size(mut self, value: usize) -> Self {
        assert!(value > 0, "row group size must be greater than 0");
        self.props.row_group_size = value;
        self
    }

    pub fn set_dictionary_enabled(mut self, value: bool) -> Self {
        self.props.dictionary_enabled = value;
        self
    }

    pub fn set_statistics_enabled(mut self, value: bool) -> Self {
        self.props.statistics_enabled = value;
        self
    }

    pub fn set_int96_timestamps(mut self, value: bool) -> Self {
        self.props.int96_timestamps = value;
        self
    }

    pub fn set_data_page_row_count_limit(mut self, value: usize) -> Self {
        assert!(value > 0, "data page row count limit must be greater than 0");
        self.props.data_page_row_count_limit = value;
        self
    }

    pub fn set_created_by(mut self, value: String) -> Self {
        self.props.created_by = value;
        self
    }

    pub fn set_cancellation_token(mut self, value: CancellationToken) -> Self {
        self.props.cancellation_token = value;
        self
    }
}

/// Reference counted reader properties.
pub type ReaderPropertiesPtr = Arc<ReaderProperties>;

/// Reader properties, immutable once built; assemble them with
/// [`ReaderPropertiesBuilder`].
#[derive(Debug, Clone, Default)]
pub struct ReaderProperties {
    treat_byte_array_as_string: bool,
    cancellation_token: CancellationToken,
}

impl ReaderProperties {
    /// Returns a builder with default values.
    pub fn builder() -> ReaderPropertiesBuilder {
        ReaderPropertiesBuilder::new()
    }

    /// Whether un-annotated BYTE_ARRAY columns decode as UTF-8 strings.
    pub fn treat_byte_array_as_string(&self) -> bool {
        self.treat_byte_array_as_string
    }

    /// Token checked before each page read and between row groups.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }
}

/// Builder for [`ReaderProperties`].
#[derive(Default)]
pub struct ReaderPropertiesBuilder {
    props: ReaderProperties,
}

impl ReaderPropertiesBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Finalizes the configuration.
    pub fn build(self) -> ReaderProperties {
        self.props
    }

    pub fn set_treat_byte_array_as_string(mut self, value: bool) -> Self {
        self.props.treat_byte_array_as_string = value;
        self
    }

    pub fn set_cancellation_token(mut self, value: CancellationToken) -> Self {
        self.props.cancellation_token = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_defaults() {
        let props = WriterProperties::builder().build();
        assert_eq!(props.compression(), Compression::SNAPPY);
        assert_eq!(props.row_group_size(), 5000);
        assert!(props.dictionary_enabled());
        assert!(props.int96_timestamps());
        assert!(props.created_by().starts_with("parquet-lite version"));
    }

    #[test]
    fn test_reader_defaults() {
        let props = ReaderProperties::builder().build();
        assert!(!props.treat_byte_array_as_string());
        assert!(!props.cancellation_token().is_cancelled());
    }
}
