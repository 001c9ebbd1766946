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

use itertools::Itertools;

use crate::scenarios::inflation::{InflationContext, OVIndex};
use crate::MomentaError;

/// One equivalence class of observable-variant strings under source relabelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalObservable {
    /// Position of the class in the table.
    pub index: usize,
    /// The canonical representative string.
    pub indices: Vec<OVIndex>,
    /// Global variant numbers of the representative string.
    pub flattened_indices: Vec<usize>,
    /// True, if every constituent observable is projective.
    pub projective: bool,
    /// Hash of the representative string.
    pub hash: u64,
    /// Product of the constituents' operator counts.
    pub operators: usize,
    /// Product of the constituents' outcome counts (0 if any is non-projective).
    pub outcomes: usize,
    /// Outcome counts per constituent.
    pub outcomes_per_observable: Vec<usize>,
}

/// Equivalence classes of observable-variant tuples under source-variant relabelling.
///
/// Generated level by level; every raw tuple of a generated level is aliased by hash to its
/// canonical class. The table backs explicit-symbol and probability-tensor construction.
#[derive(Debug)]
pub struct CanonicalObservables {
    canonical_observables: Vec<CanonicalObservable>,
    hash_aliases: BTreeMap<u64, usize>,
    distinct_observables_per_level: Vec<usize>,
    max_level: usize,
}

impl CanonicalObservables {
    /// Creates a table holding the level-0 (identity) class.
    pub fn new() -> Self {
        let identity = CanonicalObservable {
            index: 0,
            indices: Vec::new(),
            flattened_indices: Vec::new(),
            projective: true,
            hash: 0,
            operators: 1,
            outcomes: 1,
            outcomes_per_observable: Vec::new(),
        };
        Self {
            canonical_observables: vec![identity],
            hash_aliases: BTreeMap::from([(0, 0)]),
            distinct_observables_per_level: vec![1],
            max_level: 0,
        }
    }

    /// Highest generated string length.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Number of equivalence classes found so far.
    pub fn len(&self) -> usize {
        self.canonical_observables.len()
    }

    /// True if only the identity class exists.
    pub fn is_empty(&self) -> bool {
        self.canonical_observables.len() <= 1
    }

    /// Iterator over the classes.
    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalObservable> {
        self.canonical_observables.iter()
    }

    /// Number of distinct classes first found at each level.
    pub fn distinct_observables_per_level(&self) -> &[usize] {
        &self.distinct_observables_per_level
    }

    /// Generates all classes of strings up to the requested length.
    pub fn generate_up_to_level(&mut self, context: &InflationContext, new_level: usize) {
        if new_level <= self.max_level {
            return;
        }

        let projective = context
            .observables()
            .iter()
            .all(|observable| observable.projective());
        let variant_count = context.observable_variant_count();

        for level in (self.max_level + 1)..=new_level {
            let before = self.canonical_observables.len();
            let tuples: Box<dyn Iterator<Item = Vec<usize>>> = if projective {
                Box::new((0..variant_count).combinations(level))
            } else {
                Box::new((0..variant_count).combinations_with_replacement(level))
            };
            for tuple in tuples {
                self.try_add_entry(context, &tuple);
            }
            self.distinct_observables_per_level
                .push(self.canonical_observables.len() - before);
        }
        self.max_level = new_level;
    }

    fn try_add_entry(&mut self, context: &InflationContext, global_indices: &[usize]) {
        let observable_variants: Vec<OVIndex> = global_indices
            .iter()
            .map(|&index| context.index_to_obs_variant(index))
            .collect();

        let raw_hash = self.hash_variants(context, &observable_variants);
        let canonical_indices = context.canonical_variants(&observable_variants);
        let canonical_hash = self.hash_variants(context, &canonical_indices);

        let index = match self.hash_aliases.get(&canonical_hash) {
            Some(&existing) => existing,
            None => {
                let mut operators = 1usize;
                let mut outcomes = 1usize;
                let mut flattened_indices = Vec::with_capacity(canonical_indices.len());
                let mut outcomes_per_observable = Vec::with_capacity(canonical_indices.len());
                let mut projective = true;
                for ov in &canonical_indices {
                    let observable = &context.observables()[ov.observable];
                    flattened_indices.push(context.obs_variant_to_index(*ov));
                    operators *= observable.operators();
                    if observable.projective() {
                        outcomes *= observable.outcomes;
                        outcomes_per_observable.push(observable.outcomes);
                    } else {
                        outcomes = 0;
                        outcomes_per_observable.push(0);
                        projective = false;
                    }
                }

                let index = self.canonical_observables.len();
                self.canonical_observables.push(CanonicalObservable {
                    index,
                    indices: canonical_indices,
                    flattened_indices,
                    projective,
                    hash: canonical_hash,
                    operators,
                    outcomes,
                    outcomes_per_observable,
                });
                self.hash_aliases.insert(canonical_hash, index);
                index
            }
        };

        self.hash_aliases.insert(raw_hash, index);
    }

    /// Hash of an observable-variant string over the global variant alphabet.
    pub fn hash_variants(&self, context: &InflationContext, indices: &[OVIndex]) -> u64 {
        let radix = context.observable_variant_count() as u64;
        let mut hash = 0u64;
        let mut multiplier = 1u64;
        for index in indices.iter().rev() {
            hash += (1 + context.obs_variant_to_index(*index) as u64) * multiplier;
            multiplier = multiplier.wrapping_mul(radix);
        }
        hash
    }

    /// Looks up the canonical class of an observable-variant string.
    ///
    /// # Returns
    ///
    /// * `Ok(&CanonicalObservable)` - The class of the (possibly non-canonical) string.
    /// * `Err(MomentaError::MissingComponent)` - Strings of this length are not yet generated.
    /// * `Err(MomentaError::NotFound)` - The string's hash is unknown.
    pub fn canonical(
        &self,
        context: &InflationContext,
        indices: &[OVIndex],
    ) -> Result<&CanonicalObservable, MomentaError> {
        if indices.len() > self.max_level {
            return Err(MomentaError::MissingComponent {
                component: format!(
                    "canonical observables of length {} (generated up to {})",
                    indices.len(),
                    self.max_level
                ),
            });
        }
        let hash = self.hash_variants(context, indices);
        match self.hash_aliases.get(&hash) {
            Some(&index) => Ok(&self.canonical_observables[index]),
            None => Err(MomentaError::NotFound {
                msg: format!("Could not find hash \"{}\" in canonical observable table.", hash),
            }),
        }
    }
}

/// Implements the default function (Default trait) of CanonicalObservables.
impl Default for CanonicalObservables {
    fn default() -> Self {
        Self::new()
    }
}
