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

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scenarios::alphabetic_name;
use crate::MomentaError;

/// A hidden source of a causal network, connecting a subset of observables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// The source's id.
    pub id: usize,
    /// The observables the source feeds.
    pub observables: BTreeSet<usize>,
    /// True, if the source was added implicitly for a singleton observable.
    pub implicit: bool,
}

/// A classical observable of a causal network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observable {
    /// The observable's id.
    pub id: usize,
    /// Number of outcomes; 0 marks a non-projective generic moment.
    pub outcomes: usize,
    /// The sources feeding the observable (including any implicit source).
    pub sources: BTreeSet<usize>,
    /// True, if no explicit source feeds the observable.
    pub singleton: bool,
}

impl Observable {
    /// True if the observable is a projective measurement (cf. a generic moment).
    pub fn projective(&self) -> bool {
        self.outcomes != 0
    }

    /// The number of operators to associate with this observable, per variant.
    pub fn operators(&self) -> usize {
        if self.projective() {
            self.outcomes - 1
        } else {
            1
        }
    }

    /// Number of inflated copies of the observable at a given inflation level.
    ///
    /// Singleton observables are never replicated: their implicit source exists only to make
    /// factorization bookkeeping uniform.
    pub fn count_copies(&self, inflation_level: usize) -> usize {
        if self.singleton {
            1
        } else {
            inflation_level.pow(self.sources.len() as u32)
        }
    }

    /// Number of operators associated with the observable at a given inflation level.
    pub fn count_operators(&self, inflation_level: usize) -> usize {
        self.operators() * self.count_copies(inflation_level)
    }

    /// Converts per-source variant indices to the flat variant number.
    ///
    /// The first index is contiguous (changes fastest).
    pub fn flatten_index(&self, inflation_level: usize, indices: &[usize]) -> usize {
        debug_assert_eq!(indices.len(), self.sources.len());
        let mut flat = 0;
        let mut base = 1;
        for &index in indices {
            flat += index * base;
            base *= inflation_level;
        }
        flat
    }

    /// Converts a flat variant number to per-source variant indices.
    pub fn unflatten_index(&self, inflation_level: usize, mut flat: usize) -> Vec<usize> {
        let mut output = vec![0; self.sources.len()];
        if output.is_empty() || inflation_level == 0 {
            return output;
        }
        for slot in output.iter_mut() {
            *slot = flat % inflation_level;
            flat /= inflation_level;
        }
        output
    }
}

/// A classical causal network: observables and the hidden sources connecting them.
///
/// Observables without any source receive an implicit singleton source, which keeps the
/// source-disjointness test of factorization uniform across the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalNetwork {
    observables: Vec<Observable>,
    sources: Vec<Source>,
    explicit_source_count: usize,
}

impl CausalNetwork {
    /// Creates a causal network.
    ///
    /// # Arguments
    ///
    /// * `outcomes_per_observable` - Outcome count per observable; 0 for a generic moment.
    /// * `source_observables` - For each source, the set of observables it feeds.
    ///
    /// # Returns
    ///
    /// * `Ok(CausalNetwork)` - The new network.
    /// * `Err(MomentaError::EmptyObservableList)` - No observables were declared.
    /// * `Err(MomentaError::SourceOutOfRange)` - A source references a missing observable.
    pub fn new(
        outcomes_per_observable: &[usize],
        source_observables: Vec<BTreeSet<usize>>,
    ) -> Result<Self, MomentaError> {
        if outcomes_per_observable.is_empty() {
            return Err(MomentaError::EmptyObservableList);
        }

        // Check sources, and build the reverse observable -> source map.
        let mut observable_sources: Vec<BTreeSet<usize>> =
            vec![BTreeSet::new(); outcomes_per_observable.len()];
        for (source_id, observables) in source_observables.iter().enumerate() {
            for &observable in observables {
                if observable >= outcomes_per_observable.len() {
                    return Err(MomentaError::SourceOutOfRange {
                        source_id,
                        observable,
                    });
                }
                observable_sources[observable].insert(source_id);
            }
        }

        let explicit_source_count = source_observables.len();
        let mut sources: Vec<Source> = source_observables
            .into_iter()
            .enumerate()
            .map(|(id, observables)| Source {
                id,
                observables,
                implicit: false,
            })
            .collect();

        // Singleton observables receive implicit sources; factorization relies on every
        // observable having at least one source.
        let mut observables = Vec::with_capacity(outcomes_per_observable.len());
        for (id, (&outcomes, mut connected)) in outcomes_per_observable
            .iter()
            .zip(observable_sources)
            .enumerate()
        {
            let singleton = connected.is_empty();
            if singleton {
                let implicit_id = sources.len();
                connected.insert(implicit_id);
                sources.push(Source {
                    id: implicit_id,
                    observables: BTreeSet::from([id]),
                    implicit: true,
                });
            }
            observables.push(Observable {
                id,
                outcomes,
                sources: connected,
                singleton,
            });
        }

        Ok(Self {
            observables,
            sources,
            explicit_source_count,
        })
    }

    /// The observables of the network.
    pub fn observables(&self) -> &[Observable] {
        &self.observables
    }

    /// The sources of the network (explicit sources first).
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Number of explicitly declared sources.
    pub fn explicit_source_count(&self) -> usize {
        self.explicit_source_count
    }

    /// Number of implicitly added singleton sources.
    pub fn implicit_source_count(&self) -> usize {
        self.sources.len() - self.explicit_source_count
    }

    /// Total number of operators needed to express the network at an inflation level.
    pub fn total_operator_count(&self, inflation_level: usize) -> usize {
        self.observables
            .iter()
            .map(|observable| observable.count_operators(inflation_level))
            .sum()
    }
}

/// Implements the format function (Display trait) of CausalNetwork.
impl fmt::Display for CausalNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Causal network with {} {} and {} {}.",
            self.observables.len(),
            if self.observables.len() == 1 { "observable" } else { "observables" },
            self.sources.len(),
            if self.sources.len() == 1 { "source" } else { "sources" },
        )?;
        for observable in &self.observables {
            write!(
                f,
                "Observable {} [{}]",
                alphabetic_name(observable.id),
                observable.outcomes
            )?;
            if !observable.sources.is_empty() {
                let list: Vec<String> = observable
                    .sources
                    .iter()
                    .map(|source| source.to_string())
                    .collect();
                write!(f, " <- {}", list.join(", "))?;
            }
            writeln!(f)?;
        }
        for source in &self.sources {
            write!(f, "Source {}", source.id)?;
            if !source.observables.is_empty() {
                let list: Vec<String> = source
                    .observables
                    .iter()
                    .map(|&observable| alphabetic_name(observable))
                    .collect();
                write!(f, " -> {}", list.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
