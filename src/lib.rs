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

//! A compact native Rust reader and writer for the
//! [Apache Parquet](https://parquet.apache.org/) columnar format, built
//! around a logical row model.
//!
//! Records described by a nested logical schema are shredded into dense
//! columns with [Dremel] repetition and definition levels, encoded and
//! compressed into pages, and written with a Thrift-serialized footer;
//! reading reverses every step.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use parquet_lite::file::properties::WriterProperties;
//! use parquet_lite::file::reader::SerializedFileReader;
//! use parquet_lite::file::writer::SerializedFileWriter;
//! use parquet_lite::record::Value;
//! use parquet_lite::schema::types::{DataType, Field};
//!
//! let fields = vec![
//!     Field::primitive("id", DataType::Int32, false),
//!     Field::primitive("city", DataType::Utf8, true),
//! ];
//!
//! let mut buffer = Vec::new();
//! let mut writer = SerializedFileWriter::new(
//!     &mut buffer,
//!     fields,
//!     WriterProperties::builder().build(),
//! )
//! .unwrap();
//! writer
//!     .write_row_batch(&[
//!         vec![Value::Int32(1), Value::Str("London".into())],
//!         vec![Value::Int32(2), Value::Null],
//!     ])
//!     .unwrap();
//! writer.close().unwrap();
//!
//! let mut reader = SerializedFileReader::new(Cursor::new(buffer)).unwrap();
//! assert_eq!(reader.metadata().num_rows(), 2);
//! let rows = reader.read_rows().unwrap();
//! assert_eq!(rows[0][1], Value::Str("London".into()));
//! ```
//!
//! [Dremel]: https://research.google/pubs/pub36632/

#[macro_use]
pub mod errors;
pub mod basic;

/// Rust mirrors of the Parquet Thrift definitions.
pub mod format;

pub mod data_type;

mod util;
pub use util::cancel::CancellationToken;

pub mod column;
pub mod compression;
mod encodings;
pub mod file;
pub mod record;
pub mod schema;

pub mod thrift;
