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

//! Reconstitutes nested row values from dense columns and their repetition
//! and definition levels: the inverse of the shredder.
//!
//! A repetition level of 0 closes the current record; a definition level
//! equal to the column maximum consumes one dense value; anything lower
//! materializes a null or an empty collection at the depth the level implies.

use crate::column::DataColumn;
use crate::errors::Result;
use crate::record::value::Value;
use crate::schema::types::{DataField, DataType, Field, FieldRef};

/// Streams one leaf column slot by slot.
struct LeafCursor<'a> {
    column: &'a DataColumn,
    /// Definition level that marks a present value.
    max_def: i16,
    slot: usize,
    value_index: usize,
}

impl<'a> LeafCursor<'a> {
    fn new(column: &'a DataColumn) -> Self {
        Self {
            column,
            max_def: column.max_def_level(),
            slot: 0,
            value_index: 0,
        }
    }

    fn remaining(&self) -> bool {
        self.slot < self.column.num_slots()
    }

    /// Levels of the next slot: `(def, rep)`.
    fn peek(&self) -> Option<(i16, i16)> {
        if !self.remaining() {
            return None;
        }
        let def = match self.column.def_levels() {
            Some(levels) => levels[self.slot],
            None => self.max_def,
        };
        let rep = match self.column.rep_levels() {
            Some(levels) => levels[self.slot],
            None => 0,
        };
        Some((def, rep))
    }

    /// Consumes the next slot without producing a value.
    fn advance_empty(&mut self) -> Result<()> {
        if !self.remaining() {
            return Err(corrupt_err!(
                "column {} ran out of level slots",
                self.column.path()
            ));
        }
        self.slot += 1;
        Ok(())
    }

    /// Consumes the next slot and its dense value.
    fn take_value(&mut self, data_type: &DataType) -> Result<Value> {
        if !self.remaining() {
            return Err(corrupt_err!(
                "column {} ran out of level slots",
                self.column.path()
            ));
        }
        let value = Value::from_physical(data_type, self.column.values(), self.value_index)?;
        self.slot += 1;
        self.value_index += 1;
        Ok(value)
    }
}

/// Reassembles the records of a top-level field from its leaf columns.
///
/// `columns` must hold one column per leaf of `field`, in schema order, as
/// produced by the shredder or by the row-group reader.
pub fn assemble(field: &Field, columns: &[DataColumn]) -> Result<Vec<Value>> {
    let expected = leaf_count(field);
    if columns.len() != expected {
        return Err(invalid_err!(
            "field {} has {} leaves but {} columns were supplied",
            field.name(),
            expected,
            columns.len()
        ));
    }
    let mut cursors: Vec<LeafCursor> = columns.iter().map(LeafCursor::new).collect();

    let mut records = Vec::new();
    while cursors.iter().any(|c| c.remaining()) {
        // a cursor exhausted before its siblings surfaces as Corrupt inside
        records.push(read_value(field, 0, 0, &mut cursors)?);
    }
    Ok(records)
}

/// Reassembles full rows for a set of top-level fields.
pub fn assemble_rows(fields: &[FieldRef], columns: &[DataColumn]) -> Result<Vec<Vec<Value>>> {
    let mut per_field = Vec::with_capacity(fields.len());
    let mut offset = 0;
    let mut num_rows = 0;
    for field in fields {
        let count = leaf_count(field.as_ref());
        let values = assemble(field.as_ref(), &columns[offset..offset + count])?;
        num_rows = num_rows.max(values.len());
        per_field.push(values);
        offset += count;
    }
    for (field, values) in fields.iter().zip(&per_field) {
        if values.len() != num_rows {
            return Err(corrupt_err!(
                "field {} spans {} rows, expected {}",
                field.name(),
                values.len(),
                num_rows
            ));
        }
    }

    let mut rows = vec![Vec::with_capacity(fields.len()); num_rows];
    for values in per_field {
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
    Ok(rows)
}

fn leaf_count(field: &Field) -> usize {
    match field {
        Field::Primitive(_) => 1,
        Field::Group(f) => f.fields.iter().map(|c| leaf_count(c.as_ref())).sum(),
        Field::List(f) => leaf_count(f.element.as_ref()),
        Field::Map(f) => 1 + leaf_count(f.value.as_ref()),
    }
}

/// Reads one instance of `field` starting at the cursors' current slots.
///
/// `def` is the definition level contributed by the (present) ancestors,
/// `rep_depth` the number of repeated ancestors entered.
fn read_value(
    field: &Field,
    def: i16,
    rep_depth: i16,
    cursors: &mut [LeafCursor],
) -> Result<Value> {
    match field {
        Field::Primitive(f) if f.is_array => {
            let element = Field::Primitive(DataField {
                is_array: false,
                ..f.clone()
            });
            // a legacy two-level column has exactly one level above the
            // element; a three-level column has the usual two
            let legacy = cursors[0].max_def == def + 1 && !f.nullable;
            if legacy {
                read_legacy_array(f, def, rep_depth, &mut cursors[0])
            } else {
                let value = read_list(&element, def, rep_depth, cursors)?;
                // arrays have no null form; an absent list reads as empty
                Ok(match value {
                    Value::Null => Value::List(Vec::new()),
                    other => other,
                })
            }
        }
        Field::Primitive(f) => {
            let (d, _) = cursors[0]
                .peek()
                .ok_or_else(|| corrupt_err!("column {} exhausted", cursors[0].column.path()))?;
            if d >= cursors[0].max_def {
                cursors[0].take_value(&f.data_type)
            } else if f.nullable && d == def {
                cursors[0].advance_empty()?;
                Ok(Value::Null)
            } else {
                Err(corrupt_err!(
                    "definition level {} cannot occur for field {} at depth {}",
                    d,
                    f.name,
                    def
                ))
            }
        }
        Field::Group(f) => {
            let (d, _) = cursors[0]
                .peek()
                .ok_or_else(|| corrupt_err!("column {} exhausted", cursors[0].column.path()))?;
            if d <= def {
                // the struct itself is absent; every leaf consumes one slot
                for cursor in cursors.iter_mut() {
                    cursor.advance_empty()?;
                }
                return Ok(Value::Null);
            }
            let mut children = Vec::with_capacity(f.fields.len());
            let mut offset = 0;
            for child in &f.fields {
                let count = leaf_count(child.as_ref());
                children.push(read_value(
                    child.as_ref(),
                    def + 1,
                    rep_depth,
                    &mut cursors[offset..offset + count],
                )?);
                offset += count;
            }
            Ok(Value::Group(children))
        }
        Field::List(f) => read_list(f.element.as_ref(), def, rep_depth, cursors),
        Field::Map(f) => {
            let (d, _) = cursors[0]
                .peek()
                .ok_or_else(|| corrupt_err!("column {} exhausted", cursors[0].column.path()))?;
            if d == def {
                for cursor in cursors.iter_mut() {
                    cursor.advance_empty()?;
                }
                return Ok(Value::Null);
            }
            if d == def + 1 {
                for cursor in cursors.iter_mut() {
                    cursor.advance_empty()?;
                }
                return Ok(Value::Map(Vec::new()));
            }
            let key_field = Field::Primitive(f.key.clone());
            let pair_rep_depth = rep_depth + 1;
            let mut pairs = Vec::new();
            loop {
                let key = read_value(&key_field, def + 2, pair_rep_depth, &mut cursors[0..1])?;
                let value =
                    read_value(f.value.as_ref(), def + 2, pair_rep_depth, &mut cursors[1..])?;
                pairs.push((key, value));
                match cursors[0].peek() {
                    Some((_, r)) if r == pair_rep_depth => continue,
                    _ => break,
                }
            }
            Ok(Value::Map(pairs))
        }
    }
}

/// Reads one list instance: null, empty, or one element per repetition.
fn read_list(
    element: &Field,
    def: i16,
    rep_depth: i16,
    cursors: &mut [LeafCursor],
) -> Result<Value> {
    let (d, _) = cursors[0]
        .peek()
        .ok_or_else(|| corrupt_err!("column {} exhausted", cursors[0].column.path()))?;
    if d == def {
        for cursor in cursors.iter_mut() {
            cursor.advance_empty()?;
        }
        return Ok(Value::Null);
    }
    if d == def + 1 {
        for cursor in cursors.iter_mut() {
            cursor.advance_empty()?;
        }
        return Ok(Value::List(Vec::new()));
    }

    let element_rep_depth = rep_depth + 1;
    let mut items = Vec::new();
    loop {
        items.push(read_value(element, def + 2, element_rep_depth, cursors)?);
        match cursors[0].peek() {
            Some((_, r)) if r == element_rep_depth => continue,
            _ => break,
        }
    }
    Ok(Value::List(items))
}

/// Reads one legacy two-level array: a repeated primitive whose only level
/// above the element is the repetition itself.
fn read_legacy_array(
    f: &DataField,
    def: i16,
    rep_depth: i16,
    cursor: &mut LeafCursor,
) -> Result<Value> {
    let (d, _) = cursor
        .peek()
        .ok_or_else(|| corrupt_err!("column {} exhausted", cursor.column.path()))?;
    if d == def {
        // a single slot at the parent level: the array is empty
        cursor.advance_empty()?;
        return Ok(Value::List(Vec::new()));
    }

    let element_rep_depth = rep_depth + 1;
    let mut items = Vec::new();
    loop {
        items.push(cursor.take_value(&f.data_type)?);
        match cursor.peek() {
            Some((_, r)) if r == element_rep_depth => continue,
            _ => break,
        }
    }
    Ok(Value::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{DataColumn, ValueBuffer};
    use crate::record::shredder::shred;
    use crate::schema::types::{ColumnPath, DataType};

    fn roundtrip(field: Field, values: Vec<Value>) {
        let columns = shred(&field, &values).unwrap();
        let back = assemble(&field, &columns).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_roundtrip_flat() {
        roundtrip(
            Field::primitive("id", DataType::Int32, false),
            vec![Value::Int32(1), Value::Int32(2)],
        );
        roundtrip(
            Field::primitive("name", DataType::Utf8, true),
            vec![Value::Null, Value::Str("x".into()), Value::Null],
        );
    }

    #[test]
    fn test_roundtrip_all_null() {
        roundtrip(
            Field::primitive("v", DataType::Double, true),
            vec![Value::Null, Value::Null, Value::Null],
        );
    }

    #[test]
    fn test_roundtrip_lists_with_empties_and_nulls() {
        roundtrip(
            Field::list("xs", Field::primitive("element", DataType::Utf8, true)),
            vec![
                Value::List(vec![Value::Str("1".into()), Value::Str("2".into())]),
                Value::List(vec![]),
                Value::Null,
                Value::List(vec![Value::Null]),
                Value::List(vec![Value::Null, Value::Str("tail".into())]),
            ],
        );
    }

    #[test]
    fn test_roundtrip_leading_and_trailing_empties() {
        roundtrip(
            Field::list("xs", Field::primitive("element", DataType::Int32, false)),
            vec![
                Value::List(vec![]),
                Value::List(vec![Value::Int32(1)]),
                Value::List(vec![]),
            ],
        );
    }

    #[test]
    fn test_roundtrip_nested_lists() {
        roundtrip(
            Field::list(
                "matrix",
                Field::list("row", Field::primitive("element", DataType::Int32, false)),
            ),
            vec![
                Value::List(vec![
                    Value::List(vec![Value::Int32(1), Value::Int32(2)]),
                    Value::List(vec![]),
                    Value::Null,
                ]),
                Value::Null,
                Value::List(vec![]),
                Value::List(vec![Value::List(vec![Value::Int32(3)])]),
            ],
        );
    }

    #[test]
    fn test_roundtrip_map() {
        roundtrip(
            Field::map(
                "population",
                DataField::new("key", DataType::Int32, false),
                Field::primitive("value", DataType::Int64, true),
            ),
            vec![
                Value::Map(vec![
                    (Value::Int32(234), Value::Int64(100)),
                    (Value::Int32(235), Value::Int64(110)),
                ]),
                Value::Map(vec![]),
                Value::Null,
                Value::Map(vec![(Value::Int32(236), Value::Null)]),
            ],
        );
    }

    #[test]
    fn test_roundtrip_struct() {
        roundtrip(
            Field::group(
                "address",
                vec![
                    Field::primitive("street", DataType::Utf8, true),
                    Field::primitive("zip", DataType::Int32, false),
                ],
            ),
            vec![
                Value::Group(vec![Value::Str("high st".into()), Value::Int32(12)]),
                Value::Null,
                Value::Group(vec![Value::Null, Value::Int32(34)]),
            ],
        );
    }

    #[test]
    fn test_roundtrip_list_of_structs() {
        roundtrip(
            Field::list(
                "items",
                Field::group(
                    "element",
                    vec![
                        Field::primitive("sku", DataType::Utf8, false),
                        Field::primitive("qty", DataType::Int32, true),
                    ],
                ),
            ),
            vec![
                Value::List(vec![
                    Value::Group(vec![Value::Str("a".into()), Value::Int32(1)]),
                    Value::Group(vec![Value::Str("b".into()), Value::Null]),
                ]),
                Value::List(vec![]),
            ],
        );
    }

    #[test]
    fn test_roundtrip_array_flag() {
        roundtrip(
            Field::Primitive(DataField::new("tags", DataType::Utf8, false).with_array()),
            vec![
                Value::List(vec![Value::Str("a".into())]),
                Value::List(vec![]),
                Value::List(vec![Value::Str("b".into()), Value::Str("c".into())]),
            ],
        );
    }

    #[test]
    fn test_assemble_legacy_two_level_array() {
        // a column as read from a legacy file: max_def 1, max_rep 1
        let field =
            Field::Primitive(DataField::new("values", DataType::Int32, false).with_array());
        let column = DataColumn::new(
            ColumnPath::from("values"),
            DataType::Int32,
            ValueBuffer::Int32(vec![1, 2, 3]),
            Some(vec![1, 1, 0, 1]),
            Some(vec![0, 1, 0, 0]),
            1,
            1,
        );
        let values = assemble(&field, &[column]).unwrap();
        assert_eq!(
            values,
            vec![
                Value::List(vec![Value::Int32(1), Value::Int32(2)]),
                Value::List(vec![]),
                Value::List(vec![Value::Int32(3)]),
            ]
        );
    }

    #[test]
    fn test_assemble_wrong_column_count() {
        let field = Field::primitive("id", DataType::Int32, false);
        assert!(assemble(&field, &[]).is_err());
    }
}
