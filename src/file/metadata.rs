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

//! Parsed file metadata: the raw Thrift footer plus the schema descriptor
//! derived from it.

use std::collections::HashMap;

use crate::format;
use crate::schema::types::{FieldRef, SchemaDescPtr, SchemaDescriptor};

/// Metadata for a Parquet file, produced by decoding its footer.
#[derive(Debug)]
pub struct ParquetMetaData {
    thrift: format::FileMetaData,
    descr: SchemaDescPtr,
}

impl ParquetMetaData {
    pub(crate) fn new(thrift: format::FileMetaData, descr: SchemaDescPtr) -> Self {
        Self { thrift, descr }
    }

    /// The raw Thrift footer struct.
    pub fn thrift(&self) -> &format::FileMetaData {
        &self.thrift
    }

    /// Total rows across all row groups.
    pub fn num_rows(&self) -> i64 {
        self.thrift.num_rows
    }

    /// Number of row groups in the file.
    pub fn num_row_groups(&self) -> usize {
        self.thrift.row_groups.len()
    }

    /// Metadata of the i-th row group.
    pub fn row_group(&self, i: usize) -> &format::RowGroup {
        &self.thrift.row_groups[i]
    }

    /// The application that wrote the file, if recorded.
    pub fn created_by(&self) -> Option<&str> {
        self.thrift.created_by.as_deref()
    }

    /// The schema descriptor for the file's columns.
    pub fn schema_descr(&self) -> &SchemaDescriptor {
        &self.descr
    }

    pub(crate) fn schema_descr_ptr(&self) -> SchemaDescPtr {
        self.descr.clone()
    }

    /// The logical top-level fields.
    pub fn fields(&self) -> &[FieldRef] {
        self.descr.fields()
    }

    /// The custom key/value metadata, as a map.
    pub fn custom_metadata(&self) -> HashMap<String, String> {
        self.thrift
            .key_value_metadata
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|kv| (kv.key.clone(), kv.value.clone().unwrap_or_default()))
            .collect()
    }
}
