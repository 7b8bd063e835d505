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

//! Column abstractions: the dense column produced by shredding and consumed
//! by the page engine, plus the chunk writer and reader.

pub mod page;
pub mod reader;
pub mod writer;

use crate::basic::Type as PhysicalType;
use crate::data_type::{ByteArray, FixedLenByteArray, Int96};
use crate::errors::Result;
use crate::schema::types::{ColumnPath, DataType};

/// A dense buffer of non-null values of a single physical type.
///
/// The logical to physical conversion happens at the level-packing boundary;
/// nulls never appear here, they exist only in the definition levels.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueBuffer {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Int96(Vec<Int96>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    ByteArray(Vec<ByteArray>),
    FixedLenByteArray(Vec<FixedLenByteArray>),
}

impl ValueBuffer {
    /// Creates an empty buffer for the given physical type.
    pub fn new(physical_type: PhysicalType) -> Self {
        match physical_type {
            PhysicalType::BOOLEAN => ValueBuffer::Bool(Vec::new()),
            PhysicalType::INT32 => ValueBuffer::Int32(Vec::new()),
            PhysicalType::INT64 => ValueBuffer::Int64(Vec::new()),
            PhysicalType::INT96 => ValueBuffer::Int96(Vec::new()),
            PhysicalType::FLOAT => ValueBuffer::Float(Vec::new()),
            PhysicalType::DOUBLE => ValueBuffer::Double(Vec::new()),
            PhysicalType::BYTE_ARRAY => ValueBuffer::ByteArray(Vec::new()),
            PhysicalType::FIXED_LEN_BYTE_ARRAY => ValueBuffer::FixedLenByteArray(Vec::new()),
        }
    }

    /// The physical type of the stored values.
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            ValueBuffer::Bool(_) => PhysicalType::BOOLEAN,
            ValueBuffer::Int32(_) => PhysicalType::INT32,
            ValueBuffer::Int64(_) => PhysicalType::INT64,
            ValueBuffer::Int96(_) => PhysicalType::INT96,
            ValueBuffer::Float(_) => PhysicalType::FLOAT,
            ValueBuffer::Double(_) => PhysicalType::DOUBLE,
            ValueBuffer::ByteArray(_) => PhysicalType::BYTE_ARRAY,
            ValueBuffer::FixedLenByteArray(_) => PhysicalType::FIXED_LEN_BYTE_ARRAY,
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        match self {
            ValueBuffer::Bool(v) => v.len(),
            ValueBuffer::Int32(v) => v.len(),
            ValueBuffer::Int64(v) => v.len(),
            ValueBuffer::Int96(v) => v.len(),
            ValueBuffer::Float(v) => v.len(),
            ValueBuffer::Double(v) => v.len(),
            ValueBuffer::ByteArray(v) => v.len(),
            ValueBuffer::FixedLenByteArray(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! value_buffer_from {
    ($source_ty:ty, $variant:ident) => {
        impl From<Vec<$source_ty>> for ValueBuffer {
            fn from(values: Vec<$source_ty>) -> Self {
                ValueBuffer::$variant(values)
            }
        }
    };
}

value_buffer_from!(bool, Bool);
value_buffer_from!(i32, Int32);
value_buffer_from!(i64, Int64);
value_buffer_from!(Int96, Int96);
value_buffer_from!(f32, Float);
value_buffer_from!(f64, Double);
value_buffer_from!(ByteArray, ByteArray);
value_buffer_from!(FixedLenByteArray, FixedLenByteArray);

/// All data for one leaf column: the field's logical type, the dense value
/// buffer, and, for columns inside nested or nullable fields, the parallel
/// repetition and definition level arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    path: ColumnPath,
    data_type: DataType,
    values: ValueBuffer,
    def_levels: Option<Vec<i16>>,
    rep_levels: Option<Vec<i16>>,
    max_def_level: i16,
    max_rep_level: i16,
}

impl DataColumn {
    pub fn new(
        path: ColumnPath,
        data_type: DataType,
        values: ValueBuffer,
        def_levels: Option<Vec<i16>>,
        rep_levels: Option<Vec<i16>>,
        max_def_level: i16,
        max_rep_level: i16,
    ) -> Self {
        Self {
            path,
            data_type,
            values,
            def_levels,
            rep_levels,
            max_def_level,
            max_rep_level,
        }
    }

    /// The dotted path of the leaf this column holds data for.
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    /// The logical type of the values.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The dense non-null values.
    pub fn values(&self) -> &ValueBuffer {
        &self.values
    }

    pub fn def_levels(&self) -> Option<&[i16]> {
        self.def_levels.as_deref()
    }

    pub fn rep_levels(&self) -> Option<&[i16]> {
        self.rep_levels.as_deref()
    }

    /// The definition level at which a value is physically present.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// The deepest repetition level a slot of this column can carry.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    /// Total level slots: every value, null and empty collection counts one.
    pub fn num_slots(&self) -> usize {
        match &self.def_levels {
            Some(levels) => levels.len(),
            None => self.values.len(),
        }
    }

    /// Number of records this column spans: slots starting a new record.
    pub fn num_rows(&self) -> usize {
        match &self.rep_levels {
            Some(levels) => levels.iter().filter(|r| **r == 0).count(),
            None => self.num_slots(),
        }
    }

    /// Validates the level arrays against the column's maxima before the
    /// page engine consumes them.
    pub(crate) fn validate(&self, max_def: i16, max_rep: i16) -> Result<()> {
        if self.max_def_level != max_def || self.max_rep_level != max_rep {
            return Err(invalid_err!(
                "column {} carries level maxima ({}, {}) but the schema defines ({}, {})",
                self.path,
                self.max_def_level,
                self.max_rep_level,
                max_def,
                max_rep
            ));
        }
        match (&self.def_levels, max_def) {
            (None, 0) => {}
            (Some(_), 0) => {
                return Err(invalid_err!(
                    "column {} is required but carries definition levels",
                    self.path
                ))
            }
            (None, _) => {
                return Err(invalid_err!(
                    "column {} requires definition levels up to {}",
                    self.path,
                    max_def
                ))
            }
            (Some(levels), _) => {
                if let Some(bad) = levels.iter().find(|l| **l < 0 || **l > max_def) {
                    return Err(invalid_err!(
                        "definition level {} out of range [0, {}] for column {}",
                        bad,
                        max_def,
                        self.path
                    ));
                }
                let present = levels.iter().filter(|l| **l == max_def).count();
                if present != self.values.len() {
                    return Err(invalid_err!(
                        "column {} has {} values but {} slots at the maximum definition level",
                        self.path,
                        self.values.len(),
                        present
                    ));
                }
            }
        }
        match (&self.rep_levels, max_rep) {
            (None, 0) => {}
            (Some(_), 0) => {
                return Err(invalid_err!(
                    "column {} is not repeated but carries repetition levels",
                    self.path
                ))
            }
            (None, _) => {
                return Err(invalid_err!(
                    "column {} requires repetition levels up to {}",
                    self.path,
                    max_rep
                ))
            }
            (Some(levels), _) => {
                if levels.len() != self.num_slots() {
                    return Err(invalid_err!(
                        "column {} has {} repetition levels for {} slots",
                        self.path,
                        levels.len(),
                        self.num_slots()
                    ));
                }
                if let Some(bad) = levels.iter().find(|l| **l < 0 || **l > max_rep) {
                    return Err(invalid_err!(
                        "repetition level {} out of range [0, {}] for column {}",
                        bad,
                        max_rep,
                        self.path
                    ));
                }
                if levels.first().is_some_and(|r| *r != 0) {
                    return Err(invalid_err!(
                        "column {} does not start at a record boundary",
                        self.path
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParquetError;

    #[test]
    fn test_value_buffer_new_matches_type() {
        for t in [
            PhysicalType::BOOLEAN,
            PhysicalType::INT32,
            PhysicalType::INT64,
            PhysicalType::INT96,
            PhysicalType::FLOAT,
            PhysicalType::DOUBLE,
            PhysicalType::BYTE_ARRAY,
            PhysicalType::FIXED_LEN_BYTE_ARRAY,
        ] {
            let buffer = ValueBuffer::new(t);
            assert_eq!(buffer.physical_type(), t);
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn test_num_rows_counts_record_starts() {
        let column = DataColumn::new(
            ColumnPath::from("c.list.element"),
            DataType::Int32,
            ValueBuffer::Int32(vec![1, 2, 3, 4]),
            Some(vec![3, 3, 3, 3]),
            Some(vec![0, 1, 0, 1]),
            3,
            1,
        );
        assert_eq!(column.num_slots(), 4);
        assert_eq!(column.num_rows(), 2);
    }

    #[test]
    fn test_validate_catches_value_count_mismatch() {
        let column = DataColumn::new(
            ColumnPath::from("c"),
            DataType::Int32,
            ValueBuffer::Int32(vec![1]),
            Some(vec![1, 1]),
            None,
            1,
            0,
        );
        let err = column.validate(1, 0).unwrap_err();
        assert!(matches!(err, ParquetError::InvalidArgument(_)));
    }

    #[test]
    fn test_validate_catches_out_of_range_levels() {
        let column = DataColumn::new(
            ColumnPath::from("c"),
            DataType::Int32,
            ValueBuffer::Int32(vec![1]),
            Some(vec![5]),
            None,
            1,
            0,
        );
        assert!(column.validate(1, 0).is_err());
    }

    #[test]
    fn test_validate_missing_levels() {
        let column = DataColumn::new(
            ColumnPath::from("c"),
            DataType::Int32,
            ValueBuffer::Int32(vec![1]),
            None,
            None,
            0,
            0,
        );
        assert!(column.validate(1, 0).is_err());
        assert!(column.validate(0, 0).is_ok());
    }
}
