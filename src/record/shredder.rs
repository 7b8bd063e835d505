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

//! Shreds nested row values into dense columns with repetition and
//! definition levels.
//!
//! Walking each record depth-first: a present leaf emits its value and the
//! maximum definition level; a null emits the definition level of its
//! deepest present ancestor; an empty collection emits a single level pair
//! and no value. The first slot of every record carries repetition level 0.

use crate::column::{DataColumn, ValueBuffer};
use crate::errors::Result;
use crate::record::value::Value;
use crate::schema::types::{DataField, Field, FieldRef, SchemaDescriptor};

/// Accumulates one leaf column while records are walked.
struct LeafState {
    values: ValueBuffer,
    def_levels: Vec<i16>,
    rep_levels: Vec<i16>,
}

impl LeafState {
    fn emit_null(&mut self, def: i16, rep: i16) {
        self.def_levels.push(def);
        self.rep_levels.push(rep);
    }

    fn emit_value(&mut self, value: &Value, field: &DataField, def: i16, rep: i16) -> Result<()> {
        value.append_physical(&field.data_type, &mut self.values)?;
        self.def_levels.push(def);
        self.rep_levels.push(rep);
        Ok(())
    }
}

/// Shreds `values`, one per record, of the given top-level field into one
/// dense column per leaf.
pub fn shred(field: &Field, values: &[Value]) -> Result<Vec<DataColumn>> {
    shred_fields(&[field.clone()], |record, _| Ok(&values[record]), values.len())
}

/// Shreds full rows across `fields`; every row must have one value per
/// top-level field, in schema order.
pub fn shred_rows(fields: &[FieldRef], rows: &[Vec<Value>]) -> Result<Vec<DataColumn>> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != fields.len() {
            return Err(invalid_err!(
                "row {} has {} cells for a schema of {} fields",
                i,
                row.len(),
                fields.len()
            ));
        }
    }
    let fields: Vec<Field> = fields.iter().map(|f| f.as_ref().clone()).collect();
    shred_fields(&fields, |record, field| Ok(&rows[record][field]), rows.len())
}

fn shred_fields<'a, F>(fields: &[Field], cell: F, num_records: usize) -> Result<Vec<DataColumn>>
where
    F: Fn(usize, usize) -> Result<&'a Value>,
{
    // the descriptor provides per-leaf paths and level maxima consistent
    // with the physical encoding of this schema
    let descr = SchemaDescriptor::from_fields(fields.to_vec())?;

    let mut states: Vec<LeafState> = descr
        .columns()
        .iter()
        .map(|c| LeafState {
            values: ValueBuffer::new(c.physical_type()),
            def_levels: Vec::new(),
            rep_levels: Vec::new(),
        })
        .collect();

    let leaf_counts: Vec<usize> = fields.iter().map(leaf_count).collect();
    for record in 0..num_records {
        let mut leaf_offset = 0;
        for (i, field) in fields.iter().enumerate() {
            let leaves = &mut states[leaf_offset..leaf_offset + leaf_counts[i]];
            shred_value(field, cell(record, i)?, 0, 0, 0, leaves)?;
            leaf_offset += leaf_counts[i];
        }
    }

    let columns = states
        .into_iter()
        .zip(descr.columns())
        .map(|(state, descr)| {
            let def_levels = (descr.max_def_level() > 0).then_some(state.def_levels);
            let rep_levels = (descr.max_rep_level() > 0).then_some(state.rep_levels);
            DataColumn::new(
                descr.path().clone(),
                descr.data_type(),
                state.values,
                def_levels,
                rep_levels,
                descr.max_def_level(),
                descr.max_rep_level(),
            )
        })
        .collect();
    Ok(columns)
}

/// Number of leaf columns under a field.
fn leaf_count(field: &Field) -> usize {
    match field {
        Field::Primitive(_) => 1,
        Field::Group(f) => f.fields.iter().map(|c| leaf_count(c.as_ref())).sum(),
        Field::List(f) => leaf_count(f.element.as_ref()),
        Field::Map(f) => 1 + leaf_count(f.value.as_ref()),
    }
}

/// Emits one `(def, rep)` pair and no value into every leaf under a field
/// whose subtree is absent at this point.
fn emit_null_subtree(leaves: &mut [LeafState], def: i16, rep: i16) {
    for leaf in leaves {
        leaf.emit_null(def, rep);
    }
}

/// Shreds `value` for `field`.
///
/// `def` counts the non-REQUIRED ancestors that are present, `rep` is the
/// repetition level for the first slot this subtree emits, and `rep_depth`
/// counts the REPEATED ancestors entered so far.
fn shred_value(
    field: &Field,
    value: &Value,
    def: i16,
    rep: i16,
    rep_depth: i16,
    leaves: &mut [LeafState],
) -> Result<()> {
    match field {
        Field::Primitive(f) if f.is_array => {
            let element = Field::Primitive(DataField {
                is_array: false,
                ..f.clone()
            });
            shred_list(&f.name, &element, value, def, rep, rep_depth, leaves)
        }
        Field::Primitive(f) => match value {
            Value::Null if f.nullable => {
                leaves[0].emit_null(def, rep);
                Ok(())
            }
            Value::Null => Err(invalid_err!("null value for required field {}", f.name)),
            value => leaves[0].emit_value(value, f, def + f.nullable as i16, rep),
        },
        Field::Group(f) => match value {
            Value::Null => {
                emit_null_subtree(leaves, def, rep);
                Ok(())
            }
            Value::Group(children) => {
                if children.len() != f.fields.len() {
                    return Err(invalid_err!(
                        "struct {} expects {} children, got {}",
                        f.name,
                        f.fields.len(),
                        children.len()
                    ));
                }
                let mut leaf_offset = 0;
                for (child_field, child_value) in f.fields.iter().zip(children) {
                    let count = leaf_count(child_field.as_ref());
                    shred_value(
                        child_field.as_ref(),
                        child_value,
                        def + 1,
                        rep,
                        rep_depth,
                        &mut leaves[leaf_offset..leaf_offset + count],
                    )?;
                    leaf_offset += count;
                }
                Ok(())
            }
            other => Err(invalid_err!(
                "value {:?} does not match struct field {}",
                other,
                f.name
            )),
        },
        Field::List(f) => shred_list(&f.name, f.element.as_ref(), value, def, rep, rep_depth, leaves),
        Field::Map(f) => match value {
            Value::Null => {
                emit_null_subtree(leaves, def, rep);
                Ok(())
            }
            Value::Map(pairs) if pairs.is_empty() => {
                // the outer group is present but the repeated group is not
                emit_null_subtree(leaves, def + 1, rep);
                Ok(())
            }
            Value::Map(pairs) => {
                let pair_rep_depth = rep_depth + 1;
                let key_field = Field::Primitive(f.key.clone());
                for (i, (key, val)) in pairs.iter().enumerate() {
                    let pair_rep = if i == 0 { rep } else { pair_rep_depth };
                    if key.is_null() {
                        return Err(invalid_err!("null key in map field {}", f.name));
                    }
                    shred_value(
                        &key_field,
                        key,
                        def + 2,
                        pair_rep,
                        pair_rep_depth,
                        &mut leaves[0..1],
                    )?;
                    shred_value(
                        f.value.as_ref(),
                        val,
                        def + 2,
                        pair_rep,
                        pair_rep_depth,
                        &mut leaves[1..],
                    )?;
                }
                Ok(())
            }
            other => Err(invalid_err!(
                "value {:?} does not match map field {}",
                other,
                f.name
            )),
        },
    }
}

fn shred_list(
    name: &str,
    element: &Field,
    value: &Value,
    def: i16,
    rep: i16,
    rep_depth: i16,
    leaves: &mut [LeafState],
) -> Result<()> {
    match value {
        Value::Null => {
            emit_null_subtree(leaves, def, rep);
            Ok(())
        }
        Value::List(items) if items.is_empty() => {
            // the outer group is present but the repeated group is not
            emit_null_subtree(leaves, def + 1, rep);
            Ok(())
        }
        Value::List(items) => {
            let element_rep_depth = rep_depth + 1;
            for (i, item) in items.iter().enumerate() {
                let item_rep = if i == 0 { rep } else { element_rep_depth };
                shred_value(element, item, def + 2, item_rep, element_rep_depth, leaves)?;
            }
            Ok(())
        }
        other => Err(invalid_err!(
            "value {:?} does not match list field {}",
            other,
            name
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParquetError;
    use crate::schema::types::DataType;

    fn utf8_list_field() -> Field {
        Field::list("repeats", Field::primitive("element", DataType::Utf8, true))
    }

    #[test]
    fn test_shred_flat_required() {
        let field = Field::primitive("id", DataType::Int32, false);
        let values = vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)];
        let columns = shred(&field, &values).unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].values(), &ValueBuffer::Int32(vec![1, 2, 3]));
        assert!(columns[0].def_levels().is_none());
        assert!(columns[0].rep_levels().is_none());
    }

    #[test]
    fn test_shred_flat_nullable() {
        let field = Field::primitive("score", DataType::Double, true);
        let values = vec![Value::Null, Value::Double(1.5), Value::Null];
        let columns = shred(&field, &values).unwrap();
        assert_eq!(columns[0].values(), &ValueBuffer::Double(vec![1.5]));
        assert_eq!(columns[0].def_levels(), Some(&[0i16, 1, 0][..]));
        assert!(columns[0].rep_levels().is_none());
    }

    #[test]
    fn test_shred_list_levels() {
        let field = utf8_list_field();
        let values = vec![
            Value::List(vec![
                Value::Str("1".into()),
                Value::Str("2".into()),
                Value::Str("3".into()),
            ]),
            Value::List(vec![]),
            Value::Null,
            Value::List(vec![Value::Null, Value::Str("4".into())]),
        ];
        let columns = shred(&field, &values).unwrap();
        let column = &columns[0];
        // slots: 3 values, 1 empty list, 1 null list, 1 null element + 1 value
        assert_eq!(column.num_slots(), 7);
        assert_eq!(column.values().len(), 4);
        assert_eq!(column.def_levels(), Some(&[3i16, 3, 3, 1, 0, 2, 3][..]));
        assert_eq!(column.rep_levels(), Some(&[0i16, 1, 1, 0, 0, 0, 1][..]));
        assert_eq!(column.num_rows(), 4);
    }

    #[test]
    fn test_shred_nested_list_levels() {
        let field = Field::list(
            "matrix",
            Field::list("row", Field::primitive("element", DataType::Int32, false)),
        );
        // [[1, 2], []], [[3]]
        let values = vec![
            Value::List(vec![
                Value::List(vec![Value::Int32(1), Value::Int32(2)]),
                Value::List(vec![]),
            ]),
            Value::List(vec![Value::List(vec![Value::Int32(3)])]),
        ];
        let columns = shred(&field, &values).unwrap();
        let column = &columns[0];
        // max_def: outer(1) + outer rep(2) + inner(3) + inner rep(4); element
        // itself is required
        assert_eq!(column.def_levels(), Some(&[4i16, 4, 3, 4][..]));
        assert_eq!(column.rep_levels(), Some(&[0i16, 2, 1, 0][..]));
        assert_eq!(column.values(), &ValueBuffer::Int32(vec![1, 2, 3]));
    }

    #[test]
    fn test_shred_map() {
        let field = Field::map(
            "population",
            DataField::new("key", DataType::Int32, false),
            Field::primitive("value", DataType::Int64, true),
        );
        let values = vec![Value::Map(vec![
            (Value::Int32(234), Value::Int64(100)),
            (Value::Int32(235), Value::Int64(110)),
        ])];
        let columns = shred(&field, &values).unwrap();
        assert_eq!(columns.len(), 2);
        let keys = &columns[0];
        let vals = &columns[1];
        assert_eq!(keys.path().string(), "population.key_value.key");
        assert_eq!(keys.values(), &ValueBuffer::Int32(vec![234, 235]));
        assert_eq!(keys.def_levels(), Some(&[2i16, 2][..]));
        assert_eq!(keys.rep_levels(), Some(&[0i16, 1][..]));
        assert_eq!(vals.values(), &ValueBuffer::Int64(vec![100, 110]));
        assert_eq!(vals.def_levels(), Some(&[3i16, 3][..]));
    }

    #[test]
    fn test_shred_struct_with_null() {
        let field = Field::group(
            "address",
            vec![
                Field::primitive("street", DataType::Utf8, true),
                Field::primitive("zip", DataType::Int32, false),
            ],
        );
        let values = vec![
            Value::Group(vec![Value::Str("high st".into()), Value::Int32(1)]),
            Value::Null,
        ];
        let columns = shred(&field, &values).unwrap();
        // null struct emits one slot in every leaf
        assert_eq!(columns[0].def_levels(), Some(&[2i16, 0][..]));
        assert_eq!(columns[1].def_levels(), Some(&[1i16, 0][..]));
        assert_eq!(columns[1].values(), &ValueBuffer::Int32(vec![1]));
    }

    #[test]
    fn test_shred_array_flag_matches_list() {
        let field = Field::Primitive(DataField::new("tags", DataType::Utf8, false).with_array());
        let values = vec![
            Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]),
            Value::List(vec![]),
        ];
        let columns = shred(&field, &values).unwrap();
        let column = &columns[0];
        assert_eq!(column.path().string(), "tags.list.tags");
        // outer(1) + repeated(2); element required
        assert_eq!(column.def_levels(), Some(&[2i16, 2, 1][..]));
        assert_eq!(column.rep_levels(), Some(&[0i16, 1, 0][..]));
    }

    #[test]
    fn test_shred_wrong_kind_fails() {
        let field = Field::primitive("id", DataType::Int32, false);
        let err = shred(&field, &[Value::Str("oops".into())]).unwrap_err();
        assert!(matches!(err, ParquetError::InvalidArgument(_)));
    }

    #[test]
    fn test_shred_null_for_required_fails() {
        let field = Field::primitive("id", DataType::Int32, false);
        let err = shred(&field, &[Value::Null]).unwrap_err();
        assert!(matches!(err, ParquetError::InvalidArgument(_)));
    }

    #[test]
    fn test_shred_rows_ragged_row_fails() {
        let fields = vec![
            std::sync::Arc::new(Field::primitive("a", DataType::Int32, false)),
            std::sync::Arc::new(Field::primitive("b", DataType::Int32, false)),
        ];
        let err = shred_rows(&fields, &[vec![Value::Int32(1)]]).unwrap_err();
        assert!(matches!(err, ParquetError::InvalidArgument(_)));
    }
}
