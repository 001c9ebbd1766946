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
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dictionary::{OperatorSequenceGenerator, WordList};
use crate::scenarios::pauli::{osg, NearestNeighbourIndex, PauliContext};
use crate::MomentaError;

/// Dictionary of a Pauli context: full levels plus memoized nearest-neighbour restrictions.
///
/// The nearest-neighbour cache follows the same read-check / build-unlocked / write-recheck
/// discipline as the standard word list.
#[derive(Debug)]
pub struct PauliDictionary {
    standard: WordList<PauliContext>,
    nearest_neighbour: RwLock<BTreeMap<NearestNeighbourIndex, Arc<OperatorSequenceGenerator>>>,
}

impl PauliDictionary {
    /// Creates an empty dictionary attached to a context.
    pub fn new(context: Arc<PauliContext>) -> Self {
        Self {
            standard: WordList::new(context),
            nearest_neighbour: RwLock::new(BTreeMap::new()),
        }
    }

    /// The context the dictionary enumerates.
    pub fn context(&self) -> &Arc<PauliContext> {
        self.standard.context()
    }

    /// The full dictionary of a hierarchy level.
    pub fn level(&self, word_length: usize) -> Arc<OperatorSequenceGenerator> {
        self.standard.level(word_length)
    }

    /// The (possibly restricted) dictionary for a nearest-neighbour index.
    pub fn nearest_neighbour(
        &self,
        index: &NearestNeighbourIndex,
    ) -> Result<Arc<OperatorSequenceGenerator>, MomentaError> {
        if index.neighbours == 0 {
            return Ok(self.standard.level(index.moment_matrix_level));
        }

        {
            let cache = self.nearest_neighbour.read();
            if let Some(generator) = cache.get(index) {
                return Ok(Arc::clone(generator));
            }
        }

        let candidate = Arc::new(osg::nearest_neighbour_generator(
            self.context().as_ref(),
            index,
        )?);

        let mut cache = self.nearest_neighbour.write();
        match cache.get(index) {
            Some(existing) => Ok(Arc::clone(existing)),
            None => {
                cache.insert(*index, Arc::clone(&candidate));
                Ok(candidate)
            }
        }
    }
}
