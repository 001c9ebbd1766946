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

use std::sync::Arc;

use parking_lot::RwLock;

use crate::dictionary::OperatorSequenceGenerator;
use crate::Context;

/// Lazily extended collection of sequence generators, one per requested word length.
///
/// Lookup follows a read-check / build-unlocked / write-recheck discipline: readers share the
/// lock while probing the cache; on a miss the candidate generator is built without any lock
/// held, and the exclusive lock is only taken to insert it. A racing creator wins and the
/// duplicate work is discarded.
#[derive(Debug)]
pub struct WordList<C: Context> {
    context: Arc<C>,
    generators: RwLock<Vec<Option<Arc<OperatorSequenceGenerator>>>>,
}

impl<C: Context> WordList<C> {
    /// Creates an empty word list attached to a context.
    pub fn new(context: Arc<C>) -> Self {
        Self {
            context,
            generators: RwLock::new(Vec::new()),
        }
    }

    /// The context the word list enumerates.
    pub fn context(&self) -> &Arc<C> {
        &self.context
    }

    /// Returns the generator for the requested word length, building it on first use.
    pub fn level(&self, word_length: usize) -> Arc<OperatorSequenceGenerator> {
        {
            let generators = self.generators.read();
            if let Some(Some(generator)) = generators.get(word_length) {
                return Arc::clone(generator);
            }
        }

        // Construct outside any lock; enumeration may be expensive.
        let candidate = Arc::new(self.context.new_osg(word_length));

        let mut generators = self.generators.write();
        if generators.len() <= word_length {
            generators.resize(word_length + 1, None);
        }
        match &generators[word_length] {
            Some(existing) => Arc::clone(existing),
            None => {
                generators[word_length] = Some(Arc::clone(&candidate));
                candidate
            }
        }
    }

    /// Returns the generator for a word length only if it has already been built.
    pub fn level_if_generated(&self, word_length: usize) -> Option<Arc<OperatorSequenceGenerator>> {
        let generators = self.generators.read();
        generators.get(word_length).cloned().flatten()
    }
}
