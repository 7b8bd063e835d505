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

//! File-level APIs: writing row groups into a Parquet byte stream (including
//! append mode) and reading them back.
//!
//! # File layout
//!
//! ```text
//! +------+ ... column chunk bytes ... +----------+-----+--------+
//! | PAR1 |                            | metadata | len | 'PAR1' |
//! +------+ ... ------------------ ... +----------+-----+--------+
//! ```

pub mod metadata;
pub mod properties;
pub mod reader;
pub mod writer;

/// The 4-byte magic at both ends of every Parquet file.
pub const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// The trailing footer: a 4-byte little endian metadata length plus the
/// magic.
pub const FOOTER_SIZE: usize = 8;
