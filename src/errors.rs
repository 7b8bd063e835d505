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

//! Common Parquet errors and macros.

use std::error::Error;
use std::{io, result, str};

/// Parquet error enumeration.
///
/// Every failure surfaced by this crate falls into one of these categories;
/// callers can match on the category without parsing messages.
#[derive(Debug)]
pub enum ParquetError {
    /// The caller violated the API contract, e.g. wrote a column out of
    /// schema order or inserted a value whose kind does not match the field.
    InvalidArgument(String),
    /// The byte stream is not a well-formed Parquet file: missing magic,
    /// footer or page bounds that do not add up, levels out of range.
    Corrupt(String),
    /// The file or schema requires a capability this crate does not provide,
    /// e.g. a type/converted-type combination with no handler.
    Unsupported(String),
    /// The operation's cancellation token was triggered before it completed.
    Cancelled,
    /// Not enough bytes to decode.
    Eof(String),
    /// An external error, e.g. from IO, Thrift or a compression codec.
    External(Box<dyn Error + Send + Sync>),
}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            ParquetError::InvalidArgument(message) => {
                write!(fmt, "Invalid argument: {message}")
            }
            ParquetError::Corrupt(message) => write!(fmt, "Corrupt file: {message}"),
            ParquetError::Unsupported(message) => write!(fmt, "Unsupported: {message}"),
            ParquetError::Cancelled => write!(fmt, "Operation cancelled"),
            ParquetError::Eof(message) => write!(fmt, "EOF: {message}"),
            ParquetError::External(e) => write!(fmt, "External: {e}"),
        }
    }
}

impl Error for ParquetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParquetError::External(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for ParquetError {
    fn from(e: io::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<thrift::Error> for ParquetError {
    fn from(e: thrift::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<snap::Error> for ParquetError {
    fn from(e: snap::Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<str::Utf8Error> for ParquetError {
    fn from(e: str::Utf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

impl From<std::string::FromUtf8Error> for ParquetError {
    fn from(e: std::string::FromUtf8Error) -> ParquetError {
        ParquetError::External(Box::new(e))
    }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T, E = ParquetError> = result::Result<T, E>;

// ----------------------------------------------------------------------
// Conversion from `ParquetError` to other types of `Error`s

impl From<ParquetError> for io::Error {
    fn from(e: ParquetError) -> Self {
        io::Error::new(io::ErrorKind::Other, e)
    }
}

// ----------------------------------------------------------------------
// Convenient macros for different errors

macro_rules! invalid_err {
    ($fmt:expr) => (crate::errors::ParquetError::InvalidArgument($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::errors::ParquetError::InvalidArgument(format!($fmt, $($args),*)));
}

macro_rules! corrupt_err {
    ($fmt:expr) => (crate::errors::ParquetError::Corrupt($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::errors::ParquetError::Corrupt(format!($fmt, $($args),*)));
}

macro_rules! unsupported_err {
    ($fmt:expr) => (crate::errors::ParquetError::Unsupported($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::errors::ParquetError::Unsupported(format!($fmt, $($args),*)));
}

macro_rules! eof_err {
    ($fmt:expr) => (crate::errors::ParquetError::Eof($fmt.to_owned()));
    ($fmt:expr, $($args:expr),*) => (crate::errors::ParquetError::Eof(format!($fmt, $($args),*)));
}
