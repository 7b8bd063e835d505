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

//! The in-memory value model for rows, and its conversion to and from the
//! physical representation at the level-packing boundary.

use crate::column::ValueBuffer;
use crate::data_type::{
    decimal_from_bytes, decimal_length_from_precision, decimal_to_bytes, ByteArray,
    FixedLenByteArray, Int96,
};
use crate::errors::Result;
use crate::schema::types::DataType;

/// A time interval: months, days and milliseconds, each non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub months: u32,
    pub days: u32,
    pub millis: u32,
}

impl Interval {
    pub fn new(months: u32, days: u32, millis: u32) -> Self {
        Self {
            months,
            days,
            millis,
        }
    }

    fn to_le_bytes(self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0..4].copy_from_slice(&self.months.to_le_bytes());
        out[4..8].copy_from_slice(&self.days.to_le_bytes());
        out[8..12].copy_from_slice(&self.millis.to_le_bytes());
        out
    }

    fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 12 {
            return Err(corrupt_err!(
                "INTERVAL value of {} bytes, expected 12",
                bytes.len()
            ));
        }
        Ok(Self {
            months: u32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            days: u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            millis: u32::from_le_bytes(bytes[8..12].try_into().unwrap()),
        })
    }
}

/// A single cell of a row: either a scalar of one of the logical data types,
/// a null, or a nested collection.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    /// Unscaled decimal; precision and scale come from the field.
    Decimal(i128),
    /// Days since the Unix epoch.
    Date(i32),
    /// Time of day in the field's unit.
    Time(i64),
    /// Instant since the Unix epoch in the field's unit.
    Timestamp(i64),
    Interval(Interval),
    Bytes(ByteArray),
    Str(String),
    /// Elements of a list field or of an array-flagged data field.
    List(Vec<Value>),
    /// Key/value pairs of a map field, in insertion order.
    Map(Vec<(Value, Value)>),
    /// Child values of a struct field, in schema order.
    Group(Vec<Value>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts this scalar to its physical form and appends it to `buffer`.
    ///
    /// Fails with *InvalidArgument* when the value's kind does not match the
    /// field's logical type, and with *Unsupported* for decimals beyond the
    /// handler maximum.
    pub(crate) fn append_physical(
        &self,
        data_type: &DataType,
        buffer: &mut ValueBuffer,
    ) -> Result<()> {
        let mismatch =
            || invalid_err!("value {:?} does not match field type {:?}", self, data_type);
        match (data_type, self, buffer) {
            (DataType::Boolean, Value::Bool(v), ValueBuffer::Bool(out)) => out.push(*v),
            (DataType::Int8, Value::Int8(v), ValueBuffer::Int32(out)) => out.push(*v as i32),
            (DataType::Int16, Value::Int16(v), ValueBuffer::Int32(out)) => out.push(*v as i32),
            (DataType::Int32, Value::Int32(v), ValueBuffer::Int32(out)) => out.push(*v),
            (DataType::Int64, Value::Int64(v), ValueBuffer::Int64(out)) => out.push(*v),
            (DataType::UInt8, Value::UInt8(v), ValueBuffer::Int32(out)) => out.push(*v as i32),
            (DataType::UInt16, Value::UInt16(v), ValueBuffer::Int32(out)) => out.push(*v as i32),
            (DataType::UInt32, Value::UInt32(v), ValueBuffer::Int32(out)) => out.push(*v as i32),
            (DataType::UInt64, Value::UInt64(v), ValueBuffer::Int64(out)) => out.push(*v as i64),
            (DataType::Float, Value::Float(v), ValueBuffer::Float(out)) => out.push(*v),
            (DataType::Double, Value::Double(v), ValueBuffer::Double(out)) => out.push(*v),
            (DataType::Date, Value::Date(v), ValueBuffer::Int32(out)) => out.push(*v),
            (DataType::TimeMillis, Value::Time(v), ValueBuffer::Int32(out)) => {
                out.push(i32::try_from(*v).map_err(|_| {
                    invalid_err!("time of day {} out of range for millisecond unit", v)
                })?)
            }
            (DataType::TimeMicros, Value::Time(v), ValueBuffer::Int64(out)) => out.push(*v),
            (
                DataType::TimestampMillis | DataType::TimestampMicros,
                Value::Timestamp(v),
                ValueBuffer::Int64(out),
            ) => out.push(*v),
            (DataType::TimestampNanos, Value::Timestamp(v), ValueBuffer::Int96(out)) => {
                out.push(Int96::from_nanos(*v))
            }
            (DataType::Interval, Value::Interval(v), ValueBuffer::FixedLenByteArray(out)) => {
                out.push(v.to_le_bytes().to_vec().into())
            }
            (DataType::Decimal { precision, .. }, Value::Decimal(v), buffer) => {
                append_decimal(*v, *precision, buffer)?
            }
            (DataType::ByteArray, Value::Bytes(v), ValueBuffer::ByteArray(out)) => {
                out.push(v.clone())
            }
            (DataType::Utf8, Value::Str(v), ValueBuffer::ByteArray(out)) => {
                out.push(v.as_str().into())
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Reads the physical value at `index` back into its logical form.
    pub(crate) fn from_physical(
        data_type: &DataType,
        buffer: &ValueBuffer,
        index: usize,
    ) -> Result<Value> {
        let mismatch = || {
            corrupt_err!(
                "column of physical type {} cannot hold {:?} values",
                buffer.physical_type(),
                data_type
            )
        };
        Ok(match (data_type, buffer) {
            (DataType::Boolean, ValueBuffer::Bool(v)) => Value::Bool(v[index]),
            (DataType::Int8, ValueBuffer::Int32(v)) => Value::Int8(v[index] as i8),
            (DataType::Int16, ValueBuffer::Int32(v)) => Value::Int16(v[index] as i16),
            (DataType::Int32, ValueBuffer::Int32(v)) => Value::Int32(v[index]),
            (DataType::Int64, ValueBuffer::Int64(v)) => Value::Int64(v[index]),
            (DataType::UInt8, ValueBuffer::Int32(v)) => Value::UInt8(v[index] as u8),
            (DataType::UInt16, ValueBuffer::Int32(v)) => Value::UInt16(v[index] as u16),
            (DataType::UInt32, ValueBuffer::Int32(v)) => Value::UInt32(v[index] as u32),
            (DataType::UInt64, ValueBuffer::Int64(v)) => Value::UInt64(v[index] as u64),
            (DataType::Float, ValueBuffer::Float(v)) => Value::Float(v[index]),
            (DataType::Double, ValueBuffer::Double(v)) => Value::Double(v[index]),
            (DataType::Date, ValueBuffer::Int32(v)) => Value::Date(v[index]),
            (DataType::TimeMillis, ValueBuffer::Int32(v)) => Value::Time(v[index] as i64),
            (DataType::TimeMicros, ValueBuffer::Int64(v)) => Value::Time(v[index]),
            (
                DataType::TimestampMillis | DataType::TimestampMicros,
                ValueBuffer::Int64(v),
            ) => Value::Timestamp(v[index]),
            (DataType::TimestampNanos, ValueBuffer::Int96(v)) => {
                Value::Timestamp(v[index].to_nanos())
            }
            (DataType::Interval, ValueBuffer::FixedLenByteArray(v)) => {
                Value::Interval(Interval::from_le_bytes(v[index].data())?)
            }
            (DataType::Decimal { .. }, ValueBuffer::Int32(v)) => Value::Decimal(v[index] as i128),
            (DataType::Decimal { .. }, ValueBuffer::Int64(v)) => Value::Decimal(v[index] as i128),
            (DataType::Decimal { .. }, ValueBuffer::FixedLenByteArray(v)) => {
                Value::Decimal(decimal_from_bytes(v[index].data()))
            }
            (DataType::Decimal { .. }, ValueBuffer::ByteArray(v)) => {
                Value::Decimal(decimal_from_bytes(v[index].data()))
            }
            (DataType::ByteArray, ValueBuffer::ByteArray(v)) => Value::Bytes(v[index].clone()),
            (DataType::Utf8, ValueBuffer::ByteArray(v)) => {
                Value::Str(v[index].as_utf8()?.to_string())
            }
            _ => return Err(mismatch()),
        })
    }
}

fn append_decimal(unscaled: i128, precision: i32, buffer: &mut ValueBuffer) -> Result<()> {
    match buffer {
        ValueBuffer::Int32(out) => {
            let v = i32::try_from(unscaled)
                .map_err(|_| invalid_err!("decimal {} out of range for precision {}", unscaled, precision))?;
            out.push(v);
        }
        ValueBuffer::Int64(out) => {
            let v = i64::try_from(unscaled)
                .map_err(|_| invalid_err!("decimal {} out of range for precision {}", unscaled, precision))?;
            out.push(v);
        }
        ValueBuffer::FixedLenByteArray(out) => {
            let length = decimal_length_from_precision(precision);
            out.push(FixedLenByteArray::from(decimal_to_bytes(unscaled, length)));
        }
        other => {
            return Err(invalid_err!(
                "decimal cannot be stored as {}",
                other.physical_type()
            ))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::Type as PhysicalType;
    use crate::errors::ParquetError;

    #[test]
    fn test_scalar_conversion_roundtrip() {
        let cases: Vec<(DataType, Value, PhysicalType)> = vec![
            (DataType::Boolean, Value::Bool(true), PhysicalType::BOOLEAN),
            (DataType::Int8, Value::Int8(-3), PhysicalType::INT32),
            (DataType::UInt16, Value::UInt16(65_535), PhysicalType::INT32),
            (DataType::UInt64, Value::UInt64(u64::MAX), PhysicalType::INT64),
            (DataType::Date, Value::Date(19_000), PhysicalType::INT32),
            (DataType::TimeMillis, Value::Time(86_399_999), PhysicalType::INT32),
            (
                DataType::TimestampMicros,
                Value::Timestamp(1_700_000_000_000_000),
                PhysicalType::INT64,
            ),
            (
                DataType::TimestampNanos,
                Value::Timestamp(1_700_000_000_123_456_789),
                PhysicalType::INT96,
            ),
            (
                DataType::Interval,
                Value::Interval(Interval::new(1, 2, 3)),
                PhysicalType::FIXED_LEN_BYTE_ARRAY,
            ),
            (
                DataType::Decimal {
                    precision: 25,
                    scale: 2,
                },
                Value::Decimal(-123_456_789_012_345_678_901_i128),
                PhysicalType::FIXED_LEN_BYTE_ARRAY,
            ),
            (
                DataType::Utf8,
                Value::Str("hello".to_string()),
                PhysicalType::BYTE_ARRAY,
            ),
        ];
        for (data_type, value, physical) in cases {
            assert_eq!(data_type.physical_type().unwrap(), physical);
            let mut buffer = ValueBuffer::new(physical);
            value.append_physical(&data_type, &mut buffer).unwrap();
            let back = Value::from_physical(&data_type, &buffer, 0).unwrap();
            assert_eq!(back, value, "{data_type:?}");
        }
    }

    #[test]
    fn test_kind_mismatch_is_invalid_argument() {
        let mut buffer = ValueBuffer::new(PhysicalType::INT32);
        let err = Value::Str("oops".to_string())
            .append_physical(&DataType::Int32, &mut buffer)
            .unwrap_err();
        assert!(matches!(err, ParquetError::InvalidArgument(_)));
    }

    #[test]
    fn test_small_decimal_uses_int32() {
        let data_type = DataType::Decimal {
            precision: 5,
            scale: 2,
        };
        let mut buffer = ValueBuffer::new(data_type.physical_type().unwrap());
        Value::Decimal(12_345)
            .append_physical(&data_type, &mut buffer)
            .unwrap();
        assert_eq!(buffer, ValueBuffer::Int32(vec![12_345]));
        assert_eq!(
            Value::from_physical(&data_type, &buffer, 0).unwrap(),
            Value::Decimal(12_345)
        );
    }

    #[test]
    fn test_interval_bytes_layout() {
        let interval = Interval::new(1, 2, 3);
        let bytes = interval.to_le_bytes();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[2, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[3, 0, 0, 0]);
        assert_eq!(Interval::from_le_bytes(&bytes).unwrap(), interval);
    }
}
