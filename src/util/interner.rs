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

//! A value interner backing the dictionary encoder.

use hashbrown::hash_map::RawEntryMut;
use hashbrown::HashMap;
use std::hash::{BuildHasher, Hash, Hasher};

use crate::data_type::ParquetValueType;

/// Deduplicates column values, assigning each distinct value a dense `u64`
/// key in first-seen order.
///
/// The map stores keys with respect to the hash of the value bytes via the
/// raw entry API, so values are held once, in the dense `values` vector the
/// dictionary page is later built from.
pub struct Interner<T: ParquetValueType> {
    state: ahash::RandomState,
    dedup: HashMap<u64, (), ()>,
    values: Vec<T>,
}

impl<T: ParquetValueType> Interner<T> {
    pub fn new() -> Self {
        Self {
            state: Default::default(),
            dedup: Default::default(),
            values: Vec::new(),
        }
    }

    /// Interns `value`, returning its key.
    pub fn intern(&mut self, value: &T) -> u64 {
        let hash = self.hash_value(value);
        let entry = self
            .dedup
            .raw_entry_mut()
            .from_hash(hash, |key| value == &self.values[*key as usize]);

        match entry {
            RawEntryMut::Occupied(entry) => *entry.into_key(),
            RawEntryMut::Vacant(entry) => {
                let key = self.values.len() as u64;
                self.values.push(value.clone());
                let state = &self.state;
                let values = &self.values;
                *entry
                    .insert_with_hasher(hash, key, (), |key| {
                        hash_bytes(state, values[*key as usize].as_bytes())
                    })
                    .0
            }
        }
    }

    /// The distinct values, in key order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    fn hash_value(&self, value: &T) -> u64 {
        hash_bytes(&self.state, value.as_bytes())
    }
}

fn hash_bytes(state: &ahash::RandomState, bytes: &[u8]) -> u64 {
    let mut hasher = state.build_hasher();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::ByteArray;

    #[test]
    fn test_intern_assigns_dense_keys() {
        let mut interner = Interner::<i64>::new();
        assert_eq!(interner.intern(&10), 0);
        assert_eq!(interner.intern(&20), 1);
        assert_eq!(interner.intern(&10), 0);
        assert_eq!(interner.intern(&30), 2);
        assert_eq!(interner.values(), &[10, 20, 30]);
    }

    #[test]
    fn test_intern_byte_arrays() {
        let mut interner = Interner::<ByteArray>::new();
        let a = ByteArray::from("a");
        let b = ByteArray::from("b");
        assert_eq!(interner.intern(&a), 0);
        assert_eq!(interner.intern(&b), 1);
        assert_eq!(interner.intern(&a), 0);
    }
}
