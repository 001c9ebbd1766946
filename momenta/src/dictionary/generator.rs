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

use crate::operators::{MultiOperatorIterator, OperatorSequence};
use crate::Context;

/// An enumerated dictionary: all canonical sequences of a context up to a fixed word length.
///
/// The identity is always the first entry. Generators are immutable once built and shared via
/// `Arc` by the word list that caches them; operator matrices use them as row/column labels.
#[derive(Debug, Clone)]
pub struct OperatorSequenceGenerator {
    word_length: usize,
    sequences: Vec<OperatorSequence>,
}

impl OperatorSequenceGenerator {
    /// Builds a generator by enumerating every raw string up to `word_length` and keeping
    /// those the context reports as canonical.
    ///
    /// This is the scenario-agnostic fallback; specialized scenarios enumerate canonical
    /// strings directly instead.
    pub fn filtered<C: Context>(context: &C, word_length: usize) -> Self {
        let mut sequences = vec![OperatorSequence::identity()];
        for length in 1..=word_length {
            for raw in MultiOperatorIterator::new(context.operator_count(), length) {
                if let Some(sequence) = context.get_if_canonical(&raw) {
                    sequences.push(sequence);
                }
            }
        }
        Self {
            word_length,
            sequences,
        }
    }

    /// Wraps an explicitly enumerated sequence list.
    pub fn from_sequences(word_length: usize, sequences: Vec<OperatorSequence>) -> Self {
        Self {
            word_length,
            sequences,
        }
    }

    /// The word length the generator was built for.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Number of enumerated sequences.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// True if the generator is empty (never the case for a well-formed context).
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Access one sequence by position.
    pub fn get(&self, position: usize) -> Option<&OperatorSequence> {
        self.sequences.get(position)
    }

    /// Iterator over the enumerated sequences.
    pub fn iter(&self) -> std::slice::Iter<'_, OperatorSequence> {
        self.sequences.iter()
    }
}

/// Implements indexing of the generator by sequence position.
///
/// # Panics
///
/// * If the position is out of range.
impl std::ops::Index<usize> for OperatorSequenceGenerator {
    type Output = OperatorSequence;

    fn index(&self, position: usize) -> &OperatorSequence {
        &self.sequences[position]
    }
}
