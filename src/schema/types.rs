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

//! Contains the logical schema model, its conversion to and from the flat
//! physical schema, and the schema descriptor used to resolve columns.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::basic::{ConvertedType, Repetition, Type as PhysicalType};
use crate::data_type::decimal_length_from_precision;
use crate::errors::Result;
use crate::format::SchemaElement;

/// Maximum decimal precision representable as a 16-byte two's-complement
/// integer.
pub const MAX_DECIMAL_PRECISION: i32 = 38;

// ----------------------------------------------------------------------
// Column path

/// Represents the location of a column in a schema: the chain of field names
/// from the root.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ColumnPath {
    parts: Vec<String>,
}

impl ColumnPath {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// Returns the component names from the root to the leaf.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Appends a name, producing the path of a child.
    pub fn child(&self, name: &str) -> Self {
        let mut parts = self.parts.clone();
        parts.push(name.to_string());
        Self { parts }
    }

    /// Returns the dotted string form, e.g. `a.b.c`.
    pub fn string(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.string())
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(parts: Vec<String>) -> Self {
        Self { parts }
    }
}

impl From<&str> for ColumnPath {
    fn from(single_path: &str) -> Self {
        Self {
            parts: single_path.split('.').map(|s| s.to_string()).collect(),
        }
    }
}

// ----------------------------------------------------------------------
// Logical data types

/// The closed set of logical data types a [`DataField`] can carry.
///
/// Each maps to a Parquet physical type plus an optional converted-type
/// annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    /// Decimal with the given precision and scale; the physical type is
    /// chosen from the precision.
    Decimal { precision: i32, scale: i32 },
    /// Days since the Unix epoch.
    Date,
    /// Milliseconds since midnight.
    TimeMillis,
    /// Microseconds since midnight.
    TimeMicros,
    /// Milliseconds since the Unix epoch.
    TimestampMillis,
    /// Microseconds since the Unix epoch.
    TimestampMicros,
    /// Nanoseconds since the Unix epoch, stored as legacy INT96.
    TimestampNanos,
    /// Months / days / milliseconds triple.
    Interval,
    ByteArray,
    Utf8,
}

impl DataType {
    /// Returns the physical type values of this logical type are stored as.
    pub fn physical_type(&self) -> Result<PhysicalType> {
        Ok(match self {
            DataType::Boolean => PhysicalType::BOOLEAN,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::Date
            | DataType::TimeMillis => PhysicalType::INT32,
            DataType::Int64
            | DataType::UInt64
            | DataType::TimeMicros
            | DataType::TimestampMillis
            | DataType::TimestampMicros => PhysicalType::INT64,
            DataType::TimestampNanos => PhysicalType::INT96,
            DataType::Float => PhysicalType::FLOAT,
            DataType::Double => PhysicalType::DOUBLE,
            DataType::Decimal { precision, .. } => {
                if *precision <= 0 {
                    return Err(invalid_err!("decimal precision {} must be positive", precision));
                } else if *precision <= 9 {
                    PhysicalType::INT32
                } else if *precision <= 18 {
                    PhysicalType::INT64
                } else if *precision <= MAX_DECIMAL_PRECISION {
                    PhysicalType::FIXED_LEN_BYTE_ARRAY
                } else {
                    return Err(unsupported_err!(
                        "decimal precision {} exceeds the maximum of {}",
                        precision,
                        MAX_DECIMAL_PRECISION
                    ));
                }
            }
            DataType::Interval => PhysicalType::FIXED_LEN_BYTE_ARRAY,
            DataType::ByteArray | DataType::Utf8 => PhysicalType::BYTE_ARRAY,
        })
    }

    /// Returns the converted-type annotation attached to the schema element.
    pub fn converted_type(&self) -> ConvertedType {
        match self {
            DataType::Boolean
            | DataType::Int32
            | DataType::Int64
            | DataType::Float
            | DataType::Double
            | DataType::TimestampNanos
            | DataType::ByteArray => ConvertedType::NONE,
            DataType::Int8 => ConvertedType::INT_8,
            DataType::Int16 => ConvertedType::INT_16,
            DataType::UInt8 => ConvertedType::UINT_8,
            DataType::UInt16 => ConvertedType::UINT_16,
            DataType::UInt32 => ConvertedType::UINT_32,
            DataType::UInt64 => ConvertedType::UINT_64,
            DataType::Decimal { .. } => ConvertedType::DECIMAL,
            DataType::Date => ConvertedType::DATE,
            DataType::TimeMillis => ConvertedType::TIME_MILLIS,
            DataType::TimeMicros => ConvertedType::TIME_MICROS,
            DataType::TimestampMillis => ConvertedType::TIMESTAMP_MILLIS,
            DataType::TimestampMicros => ConvertedType::TIMESTAMP_MICROS,
            DataType::Interval => ConvertedType::INTERVAL,
            DataType::Utf8 => ConvertedType::UTF8,
        }
    }

    /// Byte length for types stored as FIXED_LEN_BYTE_ARRAY, `None` otherwise.
    pub fn type_length(&self) -> Option<i32> {
        match self {
            DataType::Interval => Some(12),
            DataType::Decimal { precision, .. } if *precision > 18 => {
                Some(decimal_length_from_precision(*precision) as i32)
            }
            _ => None,
        }
    }

    /// Reconstructs the logical type from a physical schema element.
    ///
    /// `string_by_default` maps un-annotated BYTE_ARRAY to [`DataType::Utf8`].
    fn from_physical(
        physical: PhysicalType,
        converted: ConvertedType,
        precision: Option<i32>,
        scale: Option<i32>,
        string_by_default: bool,
    ) -> Result<Self> {
        let decimal = || -> Result<DataType> {
            let precision = precision
                .ok_or_else(|| corrupt_err!("DECIMAL schema element missing precision"))?;
            if precision > MAX_DECIMAL_PRECISION {
                return Err(unsupported_err!(
                    "decimal precision {} exceeds the maximum of {}",
                    precision,
                    MAX_DECIMAL_PRECISION
                ));
            }
            Ok(DataType::Decimal {
                precision,
                scale: scale.unwrap_or(0),
            })
        };
        Ok(match (physical, converted) {
            (PhysicalType::BOOLEAN, ConvertedType::NONE) => DataType::Boolean,
            (PhysicalType::INT32, ConvertedType::NONE | ConvertedType::INT_32) => DataType::Int32,
            (PhysicalType::INT32, ConvertedType::INT_8) => DataType::Int8,
            (PhysicalType::INT32, ConvertedType::INT_16) => DataType::Int16,
            (PhysicalType::INT32, ConvertedType::UINT_8) => DataType::UInt8,
            (PhysicalType::INT32, ConvertedType::UINT_16) => DataType::UInt16,
            (PhysicalType::INT32, ConvertedType::UINT_32) => DataType::UInt32,
            (PhysicalType::INT32, ConvertedType::DATE) => DataType::Date,
            (PhysicalType::INT32, ConvertedType::TIME_MILLIS) => DataType::TimeMillis,
            (PhysicalType::INT32, ConvertedType::DECIMAL) => decimal()?,
            (PhysicalType::INT64, ConvertedType::NONE | ConvertedType::INT_64) => DataType::Int64,
            (PhysicalType::INT64, ConvertedType::UINT_64) => DataType::UInt64,
            (PhysicalType::INT64, ConvertedType::TIME_MICROS) => DataType::TimeMicros,
            (PhysicalType::INT64, ConvertedType::TIMESTAMP_MILLIS) => DataType::TimestampMillis,
            (PhysicalType::INT64, ConvertedType::TIMESTAMP_MICROS) => DataType::TimestampMicros,
            (PhysicalType::INT64, ConvertedType::DECIMAL) => decimal()?,
            (PhysicalType::INT96, ConvertedType::NONE) => DataType::TimestampNanos,
            (PhysicalType::FLOAT, ConvertedType::NONE) => DataType::Float,
            (PhysicalType::DOUBLE, ConvertedType::NONE) => DataType::Double,
            (PhysicalType::BYTE_ARRAY, ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON) => {
                DataType::Utf8
            }
            (PhysicalType::BYTE_ARRAY, ConvertedType::NONE | ConvertedType::BSON) => {
                if string_by_default {
                    DataType::Utf8
                } else {
                    DataType::ByteArray
                }
            }
            (PhysicalType::BYTE_ARRAY, ConvertedType::DECIMAL) => decimal()?,
            (PhysicalType::FIXED_LEN_BYTE_ARRAY, ConvertedType::DECIMAL) => decimal()?,
            (PhysicalType::FIXED_LEN_BYTE_ARRAY, ConvertedType::INTERVAL) => DataType::Interval,
            (PhysicalType::FIXED_LEN_BYTE_ARRAY, ConvertedType::NONE) => DataType::ByteArray,
            (physical, converted) => {
                return Err(unsupported_err!(
                    "no handler for physical type {} with converted type {:?}",
                    physical,
                    converted
                ))
            }
        })
    }
}

// ----------------------------------------------------------------------
// Logical fields

/// Reference counted logical field.
pub type FieldRef = Arc<Field>;

/// A leaf field holding values of a single [`DataType`].
#[derive(Clone, Debug, PartialEq)]
pub struct DataField {
    pub name: String,
    pub data_type: DataType,
    /// Whether values may be null.
    pub nullable: bool,
    /// Convenience flag for a single-level repeated scalar; encoded as a
    /// three-level list on write and produced when decoding legacy two-level
    /// lists.
    pub is_array: bool,
}

impl DataField {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            is_array: false,
        }
    }

    /// Marks this field as holding an array of scalars per record.
    pub fn with_array(mut self) -> Self {
        self.is_array = true;
        self
    }
}

/// A struct with named child fields.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupField {
    pub name: String,
    pub fields: Vec<FieldRef>,
}

/// A list with a single element field.
#[derive(Clone, Debug, PartialEq)]
pub struct ListField {
    pub name: String,
    pub element: FieldRef,
}

/// A map with a key field and a value field.
///
/// The key is always a required primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct MapField {
    pub name: String,
    pub key: DataField,
    pub value: FieldRef,
}

/// A field in the logical schema.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Primitive(DataField),
    Group(GroupField),
    List(ListField),
    Map(MapField),
}

impl Field {
    /// Creates a leaf field.
    pub fn primitive(name: impl Into<String>, data_type: DataType, nullable: bool) -> Field {
        Field::Primitive(DataField::new(name, data_type, nullable))
    }

    /// Creates a struct field.
    pub fn group(name: impl Into<String>, fields: Vec<Field>) -> Field {
        Field::Group(GroupField {
            name: name.into(),
            fields: fields.into_iter().map(Arc::new).collect(),
        })
    }

    /// Creates a list field with the given element.
    pub fn list(name: impl Into<String>, element: Field) -> Field {
        Field::List(ListField {
            name: name.into(),
            element: Arc::new(element),
        })
    }

    /// Creates a map field. The key is forced non-nullable.
    pub fn map(name: impl Into<String>, mut key: DataField, value: Field) -> Field {
        key.nullable = false;
        key.is_array = false;
        Field::Map(MapField {
            name: name.into(),
            key,
            value: Arc::new(value),
        })
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        match self {
            Field::Primitive(f) => &f.name,
            Field::Group(f) => &f.name,
            Field::List(f) => &f.name,
            Field::Map(f) => &f.name,
        }
    }

    /// Returns the leaf data fields under this field, with their paths, in
    /// schema order.
    pub fn leaves(&self) -> Vec<(ColumnPath, DataField)> {
        let mut out = Vec::new();
        self.collect_leaves(&ColumnPath::default(), &mut out);
        out
    }

    fn collect_leaves(&self, parent: &ColumnPath, out: &mut Vec<(ColumnPath, DataField)>) {
        match self {
            Field::Primitive(f) => {
                let mut path = parent.child(&f.name);
                if f.is_array {
                    // three-level encoding inserts the repeated group
                    path = path.child("list").child(&f.name);
                }
                out.push((path, f.clone()));
            }
            Field::Group(f) => {
                let path = parent.child(&f.name);
                for child in &f.fields {
                    child.collect_leaves(&path, out);
                }
            }
            Field::List(f) => {
                let path = parent.child(&f.name).child("list");
                f.element.collect_leaves(&path, out);
            }
            Field::Map(f) => {
                let path = parent.child(&f.name).child("key_value");
                out.push((path.child(&f.key.name), f.key.clone()));
                f.value.collect_leaves(&path, out);
            }
        }
    }
}

// ----------------------------------------------------------------------
// Logical -> physical

/// Converts a logical schema into its flat physical form, starting with the
/// unnamed root group element.
pub fn to_thrift(fields: &[FieldRef]) -> Result<Vec<SchemaElement>> {
    let mut elements = Vec::new();
    elements.push(SchemaElement {
        name: "schema".to_string(),
        num_children: Some(fields.len() as i32),
        ..Default::default()
    });
    for field in fields {
        encode_field(field, &mut elements)?;
    }
    Ok(elements)
}

fn encode_field(field: &Field, elements: &mut Vec<SchemaElement>) -> Result<()> {
    match field {
        Field::Primitive(f) if f.is_array => {
            // array flag is sugar for a list of non-array scalars
            encode_list_wrapper(&f.name, elements)?;
            let element = DataField {
                is_array: false,
                ..f.clone()
            };
            encode_data_field(&element, elements)
        }
        Field::Primitive(f) => encode_data_field(f, elements),
        Field::Group(f) => {
            elements.push(SchemaElement {
                repetition_type: Some(Repetition::OPTIONAL.into()),
                name: f.name.clone(),
                num_children: Some(f.fields.len() as i32),
                ..Default::default()
            });
            for child in &f.fields {
                encode_field(child, elements)?;
            }
            Ok(())
        }
        Field::List(f) => {
            encode_list_wrapper(&f.name, elements)?;
            encode_field(&f.element, elements)
        }
        Field::Map(f) => {
            elements.push(SchemaElement {
                repetition_type: Some(Repetition::OPTIONAL.into()),
                name: f.name.clone(),
                num_children: Some(1),
                converted_type: ConvertedType::MAP.into(),
                ..Default::default()
            });
            elements.push(SchemaElement {
                repetition_type: Some(Repetition::REPEATED.into()),
                name: "key_value".to_string(),
                num_children: Some(2),
                converted_type: ConvertedType::MAP_KEY_VALUE.into(),
                ..Default::default()
            });
            let key = DataField {
                nullable: false,
                ..f.key.clone()
            };
            encode_data_field(&key, elements)?;
            encode_field(&f.value, elements)
        }
    }
}

/// Emits the two group elements of the three-level list idiom; the element
/// itself follows.
fn encode_list_wrapper(name: &str, elements: &mut Vec<SchemaElement>) -> Result<()> {
    elements.push(SchemaElement {
        repetition_type: Some(Repetition::OPTIONAL.into()),
        name: name.to_string(),
        num_children: Some(1),
        converted_type: ConvertedType::LIST.into(),
        ..Default::default()
    });
    elements.push(SchemaElement {
        repetition_type: Some(Repetition::REPEATED.into()),
        name: "list".to_string(),
        num_children: Some(1),
        ..Default::default()
    });
    Ok(())
}

fn encode_data_field(f: &DataField, elements: &mut Vec<SchemaElement>) -> Result<()> {
    let repetition = if f.nullable {
        Repetition::OPTIONAL
    } else {
        Repetition::REQUIRED
    };
    let (precision, scale) = match f.data_type {
        DataType::Decimal { precision, scale } => (Some(precision), Some(scale)),
        _ => (None, None),
    };
    elements.push(SchemaElement {
        type_: Some(f.data_type.physical_type()?.into()),
        type_length: f.data_type.type_length(),
        repetition_type: Some(repetition.into()),
        name: f.name.clone(),
        converted_type: f.data_type.converted_type().into(),
        precision,
        scale,
        ..Default::default()
    });
    Ok(())
}

// ----------------------------------------------------------------------
// Physical -> logical

/// Converts a flat physical schema back into logical fields.
///
/// `string_by_default` controls whether un-annotated BYTE_ARRAY leaves decode
/// as strings.
pub fn from_thrift(elements: &[SchemaElement], string_by_default: bool) -> Result<Vec<FieldRef>> {
    let root = elements
        .first()
        .ok_or_else(|| corrupt_err!("schema is empty"))?;
    let num_children = root.num_children.unwrap_or(0) as usize;

    let mut fields = Vec::with_capacity(num_children);
    let mut index = 1;
    for _ in 0..num_children {
        let (field, consumed) = decode_field(elements, index, string_by_default)?;
        fields.push(Arc::new(field));
        index += consumed;
    }
    if index != elements.len() {
        return Err(corrupt_err!(
            "schema has {} elements but the root group accounts for {}",
            elements.len(),
            index
        ));
    }
    Ok(fields)
}

/// Decodes the field rooted at `index`, returning it and the number of
/// physical elements it consumed.
fn decode_field(
    elements: &[SchemaElement],
    index: usize,
    string_by_default: bool,
) -> Result<(Field, usize)> {
    let element = elements
        .get(index)
        .ok_or_else(|| corrupt_err!("schema element {} out of bounds", index))?;
    let converted = ConvertedType::try_from(element.converted_type)?;
    let repetition = element
        .repetition_type
        .map(Repetition::try_from)
        .transpose()?
        .unwrap_or(Repetition::REQUIRED);
    let num_children = element.num_children.unwrap_or(0) as usize;

    // Three-level list: an annotated group whose single child is a repeated
    // group wrapping the element.
    if converted == ConvertedType::LIST && num_children == 1 {
        if let Some(child) = elements.get(index + 1) {
            let child_is_repeated_group = child.type_.is_none()
                && child.repetition_type == Some(Repetition::REPEATED.into());
            if child_is_repeated_group && child.num_children == Some(1) {
                // an array-flagged data field encodes to this same shape, so
                // it decodes as a list; the wire format cannot tell the two
                // apart
                let (element_field, consumed) =
                    decode_field(elements, index + 2, string_by_default)?;
                let field = Field::List(ListField {
                    name: element.name.clone(),
                    element: Arc::new(element_field),
                });
                return Ok((field, 2 + consumed));
            }
        }
    }

    // Map: an annotated group whose single child is a repeated group with a
    // key and a value.
    if matches!(converted, ConvertedType::MAP | ConvertedType::MAP_KEY_VALUE)
        && num_children == 1
    {
        if let Some(child) = elements.get(index + 1) {
            let child_is_repeated_group = child.type_.is_none()
                && child.repetition_type == Some(Repetition::REPEATED.into());
            if child_is_repeated_group && child.num_children == Some(2) {
                let (key_field, key_consumed) =
                    decode_field(elements, index + 2, string_by_default)?;
                let (value_field, value_consumed) =
                    decode_field(elements, index + 2 + key_consumed, string_by_default)?;
                let key = match key_field {
                    Field::Primitive(df) => df,
                    _ => return Err(corrupt_err!("map key of {} is not a primitive", element.name)),
                };
                return Ok((
                    Field::Map(MapField {
                        name: element.name.clone(),
                        key,
                        value: Arc::new(value_field),
                    }),
                    2 + key_consumed + value_consumed,
                ));
            }
        }
    }

    // Legacy two-level list: a repeated primitive directly under its parent.
    if let (Repetition::REPEATED, Some(type_)) = (repetition, element.type_) {
        let physical = PhysicalType::try_from(type_)?;
        let data_type = DataType::from_physical(
            physical,
            converted,
            element.precision,
            element.scale,
            string_by_default,
        )?;
        let field = DataField {
            name: element.name.clone(),
            data_type,
            nullable: false,
            is_array: true,
        };
        return Ok((Field::Primitive(field), 1));
    }

    // Struct.
    if num_children > 0 {
        let mut fields = Vec::with_capacity(num_children);
        let mut consumed = 1;
        for _ in 0..num_children {
            let (child, child_consumed) =
                decode_field(elements, index + consumed, string_by_default)?;
            fields.push(Arc::new(child));
            consumed += child_consumed;
        }
        return Ok((
            Field::Group(GroupField {
                name: element.name.clone(),
                fields,
            }),
            consumed,
        ));
    }

    // Plain primitive.
    let physical = element
        .type_
        .map(PhysicalType::try_from)
        .transpose()?
        .ok_or_else(|| {
            corrupt_err!("schema element {} has neither children nor a type", element.name)
        })?;
    let data_type = DataType::from_physical(
        physical,
        converted,
        element.precision,
        element.scale,
        string_by_default,
    )?;
    Ok((
        Field::Primitive(DataField {
            name: element.name.clone(),
            data_type,
            nullable: repetition == Repetition::OPTIONAL,
            is_array: false,
        }),
        1,
    ))
}

// ----------------------------------------------------------------------
// Schema descriptor

/// A node of the physical schema tree, stored in an arena with a parent
/// index rather than owning bidirectional pointers.
#[derive(Debug)]
struct SchemaNode {
    name: String,
    repetition: Option<Repetition>,
    parent: Option<usize>,
}

/// Represents a path to a leaf in the physical schema with everything the
/// column codecs need to know about it.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    path: ColumnPath,
    data_type: DataType,
    physical_type: PhysicalType,
    type_length: usize,
    precision: i32,
    scale: i32,
    max_def_level: i16,
    max_rep_level: i16,
}

/// Reference counted column descriptor.
pub type ColumnDescPtr = Arc<ColumnDescriptor>;

impl ColumnDescriptor {
    /// The dotted path from the schema root to this column.
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    /// The logical type of the column's values.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The physical type the values are stored as.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Byte length for FIXED_LEN_BYTE_ARRAY columns, zero otherwise.
    pub fn type_length(&self) -> usize {
        self.type_length
    }

    pub fn precision(&self) -> i32 {
        self.precision
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// The count of non-REQUIRED ancestors on the column's path.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// The count of REPEATED ancestors on the column's path.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }
}

/// A schema descriptor: the flat physical schema reconstituted as an arena
/// of nodes with parent links, plus a descriptor per leaf column.
#[derive(Debug)]
pub struct SchemaDescriptor {
    elements: Vec<SchemaElement>,
    fields: Vec<FieldRef>,
    nodes: Vec<SchemaNode>,
    leaves: Vec<ColumnDescPtr>,
    /// Maps a leaf's dotted path to its index in `leaves`.
    leaf_by_path: HashMap<String, usize>,
}

/// Reference counted schema descriptor.
pub type SchemaDescPtr = Arc<SchemaDescriptor>;

impl SchemaDescriptor {
    /// Builds a descriptor from the physical schema.
    pub fn new(elements: Vec<SchemaElement>, string_by_default: bool) -> Result<Self> {
        let fields = from_thrift(&elements, string_by_default)?;

        // reconstruct the tree shape from the flat pre-order element list
        let mut nodes: Vec<SchemaNode> = Vec::with_capacity(elements.len());
        // stack of (node index, children still to attach)
        let mut stack: Vec<(Option<usize>, usize)> = Vec::new();
        let mut leaf_nodes: Vec<(usize, &SchemaElement)> = Vec::new();

        for (i, element) in elements.iter().enumerate() {
            let parent = match stack.last_mut() {
                Some((parent, remaining)) => {
                    let parent = *parent;
                    *remaining -= 1;
                    parent
                }
                None if i == 0 => None,
                None => {
                    return Err(corrupt_err!(
                        "schema element {} is not reachable from the root",
                        element.name
                    ))
                }
            };
            while let Some((_, 0)) = stack.last() {
                stack.pop();
            }

            let repetition = element
                .repetition_type
                .map(Repetition::try_from)
                .transpose()?;
            nodes.push(SchemaNode {
                name: element.name.clone(),
                repetition: if i == 0 { None } else { repetition },
                parent,
            });

            let num_children = element.num_children.unwrap_or(0) as usize;
            if num_children > 0 {
                stack.push((Some(i), num_children));
            } else if i > 0 {
                leaf_nodes.push((i, element));
            }
        }
        if let Some((_, remaining)) = stack.last() {
            if *remaining > 0 {
                return Err(corrupt_err!("schema ends before all children are defined"));
            }
        }

        // derive per-leaf paths and level maxima by walking parent links
        let mut leaves = Vec::with_capacity(leaf_nodes.len());
        let mut leaf_by_path = HashMap::with_capacity(leaf_nodes.len());
        for (node_index, element) in leaf_nodes {
            let mut parts = Vec::new();
            let mut max_def_level = 0i16;
            let mut max_rep_level = 0i16;
            let mut cursor = Some(node_index);
            while let Some(i) = cursor {
                let node = &nodes[i];
                if i != 0 {
                    parts.push(node.name.clone());
                    match node.repetition {
                        Some(Repetition::OPTIONAL) => max_def_level += 1,
                        Some(Repetition::REPEATED) => {
                            max_def_level += 1;
                            max_rep_level += 1;
                        }
                        _ => {}
                    }
                }
                cursor = node.parent;
            }
            parts.reverse();
            let path = ColumnPath::new(parts);

            let physical = PhysicalType::try_from(
                element
                    .type_
                    .ok_or_else(|| corrupt_err!("leaf {} has no physical type", path))?,
            )?;
            let converted = ConvertedType::try_from(element.converted_type)?;
            let data_type = DataType::from_physical(
                physical,
                converted,
                element.precision,
                element.scale,
                string_by_default,
            )?;

            let type_length = element.type_length.unwrap_or(0);
            if physical == PhysicalType::FIXED_LEN_BYTE_ARRAY && type_length <= 0 {
                return Err(corrupt_err!(
                    "fixed length column {} has no positive type length",
                    path
                ));
            }

            let index = leaves.len();
            if leaf_by_path.insert(path.string(), index).is_some() {
                return Err(corrupt_err!("duplicate column path {}", path));
            }
            leaves.push(Arc::new(ColumnDescriptor {
                path,
                data_type,
                physical_type: physical,
                type_length: type_length.max(0) as usize,
                precision: element.precision.unwrap_or(0),
                scale: element.scale.unwrap_or(0),
                max_def_level,
                max_rep_level,
            }));
        }

        Ok(Self {
            elements,
            fields,
            nodes,
            leaves,
            leaf_by_path,
        })
    }

    /// Builds a descriptor from a logical schema.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let fields: Vec<FieldRef> = fields.into_iter().map(Arc::new).collect();
        Self::new(to_thrift(&fields)?, false)
    }

    /// The physical schema elements, root first.
    pub fn elements(&self) -> &[SchemaElement] {
        &self.elements
    }

    /// The logical top-level fields.
    pub fn fields(&self) -> &[FieldRef] {
        &self.fields
    }

    /// Number of leaf columns.
    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// Returns the descriptor of the i-th leaf column.
    pub fn column(&self, i: usize) -> ColumnDescPtr {
        self.leaves[i].clone()
    }

    /// All leaf column descriptors in schema order.
    pub fn columns(&self) -> &[ColumnDescPtr] {
        &self.leaves
    }

    /// Looks a column up by its dotted path.
    pub fn column_by_path(&self, path: &ColumnPath) -> Option<ColumnDescPtr> {
        self.leaf_by_path
            .get(&path.string())
            .map(|i| self.leaves[*i].clone())
    }

    /// Number of nodes in the schema tree arena, the root included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}
