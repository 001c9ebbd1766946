// Copyright © 2021-2023 HQS Quantum Simulations GmbH. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the
// License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
// express or implied. See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Backing store of a matrix registry: maps a scenario-specific index to a matrix offset.
pub trait IndexStorage<I>: Default {
    /// Looks up the offset registered for an index.
    fn find(&self, index: &I) -> Option<usize>;

    /// Registers an offset for an index if the index is vacant.
    ///
    /// # Returns
    ///
    /// * `Some(existing)` - The index was already registered; nothing was changed.
    /// * `None` - The offset was registered.
    fn insert(&mut self, index: I, offset: usize) -> Option<usize>;
}

impl<I: Ord> IndexStorage<I> for BTreeMap<I, usize> {
    fn find(&self, index: &I) -> Option<usize> {
        self.get(index).copied()
    }

    fn insert(&mut self, index: I, offset: usize) -> Option<usize> {
        match self.entry(index) {
            std::collections::btree_map::Entry::Occupied(entry) => Some(*entry.get()),
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(offset);
                None
            }
        }
    }
}

/// A registry of matrices addressable by a scenario-specific index kind.
///
/// Offsets point into the owning system's append-only matrix vector; once registered, an index
/// never re-points. `insert_alias` cross-registers an already built matrix under an additional
/// index (e.g. a nearest-neighbour moment matrix with radius zero under the plain moment-matrix
/// index).
#[derive(Debug)]
pub struct MatrixIndices<I, S: IndexStorage<I> = BTreeMap<I, usize>> {
    storage: S,
    _marker: PhantomData<I>,
}

impl<I, S: IndexStorage<I>> Default for MatrixIndices<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S: IndexStorage<I>> MatrixIndices<I, S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            storage: S::default(),
            _marker: PhantomData,
        }
    }

    /// Looks up the offset registered for an index.
    pub fn find(&self, index: &I) -> Option<usize> {
        self.storage.find(index)
    }

    /// True, if the index has been registered.
    pub fn contains(&self, index: &I) -> bool {
        self.storage.find(index).is_some()
    }

    /// Registers an offset for a new index; a racing registration keeps the existing offset.
    ///
    /// # Returns
    ///
    /// * The offset now registered under the index.
    pub fn insert(&mut self, index: I, offset: usize) -> usize {
        self.storage.insert(index, offset).unwrap_or(offset)
    }

    /// Cross-registers an already built matrix under an additional index.
    pub fn insert_alias(&mut self, index: I, offset: usize) -> usize {
        self.insert(index, offset)
    }
}
