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

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::dictionary::OperatorSequenceGenerator;
use crate::operators::{OperatorSequence, SequenceSign, SequenceStorage, ShortlexHasher};
use crate::scenarios::alphabetic_name;
use crate::scenarios::inflation::{osg, CausalNetwork, OVIndex};
use crate::{Context, MomentaError, OperatorId};

/// Extra information attached to one operator of an inflation scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// The base-network observable the operator measures.
    pub observable: usize,
    /// Flat variant number of the observable copy.
    pub variant: usize,
    /// The outcome the operator projects onto.
    pub outcome: usize,
    /// True, if the operator is a projector (idempotent).
    pub projective: bool,
}

/// One inflated copy of an observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Global number of the variant's first operator.
    pub operator_offset: usize,
    /// Flat variant number within the observable.
    pub flat_index: usize,
    /// Per-source variant indices, ordered by ascending source id.
    pub indices: Vec<usize>,
    /// Inflated-source slots (`source · inflation + variant`) the copy is connected to.
    pub connected_sources: BTreeSet<usize>,
}

impl Variant {
    /// True, if the two variants share no inflated source.
    pub fn independent(&self, other: &Variant) -> bool {
        self.connected_sources
            .intersection(&other.connected_sources)
            .next()
            .is_none()
    }
}

/// An observable of the base network together with its inflated copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflatedObservable {
    /// The observable's id within the base network.
    pub id: usize,
    /// Number of outcomes; 0 marks a non-projective generic moment.
    pub outcomes: usize,
    /// The sources feeding the observable.
    pub sources: BTreeSet<usize>,
    /// True, if the observable has no explicit source.
    pub singleton: bool,
    /// Global number of the observable's first operator.
    pub operator_offset: usize,
    /// Global number of the observable's first variant.
    pub variant_offset: usize,
    /// The inflated copies, by flat variant number.
    pub variants: Vec<Variant>,
}

impl InflatedObservable {
    /// True if the observable is a projective measurement.
    pub fn projective(&self) -> bool {
        self.outcomes != 0
    }

    /// Number of operators per variant.
    pub fn operators(&self) -> usize {
        if self.projective() {
            self.outcomes - 1
        } else {
            1
        }
    }

    /// Number of inflated copies.
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// The variant addressed by per-source indices (ascending source id, first contiguous).
    pub fn variant(&self, inflation: usize, indices: &[usize]) -> &Variant {
        debug_assert_eq!(indices.len(), self.sources.len());
        let mut flat = 0;
        let mut base = 1;
        for &index in indices {
            flat += index * base;
            base *= inflation;
        }
        &self.variants[flat]
    }
}

/// Scenario of an inflated causal network.
///
/// Every hidden source of the network is replicated `inflation` times; observables become one
/// copy per combination of source variants. All operators commute; distinct outcomes of one
/// observable copy annihilate, and projective operators are idempotent. Physically equivalent
/// moments are identified by relabelling source variants to a canonical representative.
#[derive(Debug)]
pub struct InflationContext {
    network: CausalNetwork,
    inflation: usize,
    observables: Vec<InflatedObservable>,
    operator_info: Vec<OperatorInfo>,
    variant_index: Vec<OVIndex>,
    hasher: ShortlexHasher,
}

impl InflationContext {
    /// Inflates a causal network.
    ///
    /// # Arguments
    ///
    /// * `network` - The base network.
    /// * `inflation` - Number of copies of each explicit source (at least 1).
    ///
    /// # Returns
    ///
    /// * `Ok(InflationContext)` - The inflated scenario.
    /// * `Err(MomentaError::ZeroInflationLevel)` - The inflation level was 0.
    pub fn new(network: CausalNetwork, inflation: usize) -> Result<Self, MomentaError> {
        if inflation == 0 {
            return Err(MomentaError::ZeroInflationLevel);
        }

        let mut observables = Vec::with_capacity(network.observables().len());
        let mut operator_info = Vec::new();
        let mut variant_index = Vec::new();
        let mut variant_offset = 0;

        for base in network.observables() {
            let operator_offset = operator_info.len();
            let copies = base.count_copies(inflation);
            let mut variants = Vec::with_capacity(copies);
            for flat in 0..copies {
                let indices = base.unflatten_index(inflation, flat);
                let connected_sources: BTreeSet<usize> = base
                    .sources
                    .iter()
                    .zip(indices.iter())
                    .map(|(&source, &variant)| source * inflation + variant)
                    .collect();
                variants.push(Variant {
                    operator_offset: operator_info.len(),
                    flat_index: flat,
                    indices,
                    connected_sources,
                });
                variant_index.push(OVIndex::new(base.id, flat));
                for outcome in 0..base.operators() {
                    operator_info.push(OperatorInfo {
                        observable: base.id,
                        variant: flat,
                        outcome,
                        projective: base.projective(),
                    });
                }
            }
            observables.push(InflatedObservable {
                id: base.id,
                outcomes: base.outcomes,
                sources: base.sources.clone(),
                singleton: base.singleton,
                operator_offset,
                variant_offset,
                variants,
            });
            variant_offset += copies;
        }

        let hasher = ShortlexHasher::new(operator_info.len());
        Ok(Self {
            network,
            inflation,
            observables,
            operator_info,
            variant_index,
            hasher,
        })
    }

    /// The base network.
    pub fn network(&self) -> &CausalNetwork {
        &self.network
    }

    /// The inflation level.
    pub fn inflation(&self) -> usize {
        self.inflation
    }

    /// The inflated observables.
    pub fn observables(&self) -> &[InflatedObservable] {
        &self.observables
    }

    /// Extra information for every operator, by global number.
    pub fn operator_info(&self) -> &[OperatorInfo] {
        &self.operator_info
    }

    /// Total number of observable variants across the network.
    pub fn observable_variant_count(&self) -> usize {
        self.variant_index.len()
    }

    /// Global operator number of an observable/variant/outcome triple.
    ///
    /// # Panics
    ///
    /// * If the observable, variant or outcome is out of range.
    pub fn operator_number(&self, observable: usize, variant: usize, outcome: usize) -> OperatorId {
        let info = &self.observables[observable];
        assert!(variant < info.variant_count());
        assert!(outcome < info.operators());
        (info.variants[variant].operator_offset + outcome) as OperatorId
    }

    /// Global variant number of an observable/variant pair.
    pub fn obs_variant_to_index(&self, index: OVIndex) -> usize {
        self.observables[index.observable].variant_offset + index.variant
    }

    /// The observable/variant pair of a global variant number.
    pub fn index_to_obs_variant(&self, global_variant: usize) -> OVIndex {
        self.variant_index[global_variant]
    }

    /// Splits a sequence into maximal source-connected components.
    ///
    /// Two operators fall into the same factor exactly when their observable copies share at
    /// least one inflated source (directly or through a chain of other operators in the
    /// sequence). The product of the factors equals the input, and distinct factors are
    /// source-disjoint.
    pub fn factorize(&self, seq: &OperatorSequence) -> Vec<OperatorSequence> {
        if seq.len() <= 1 {
            return vec![seq.clone()];
        }

        let mut remaining: Vec<OperatorId> = seq.operators().to_vec();
        let mut output = Vec::new();

        while let Some(first) = remaining.first().copied() {
            remaining.remove(0);
            let mut operators = SequenceStorage::new();
            operators.push(first);
            let mut included_sources = self.sources_of(first).clone();

            loop {
                let mut absorbed = false;
                let mut position = 0;
                while position < remaining.len() {
                    let candidate = remaining[position];
                    let candidate_sources = self.sources_of(candidate);
                    if included_sources
                        .intersection(candidate_sources)
                        .next()
                        .is_some()
                    {
                        operators.push(candidate);
                        included_sources.extend(candidate_sources.iter().copied());
                        remaining.remove(position);
                        absorbed = true;
                    } else {
                        position += 1;
                    }
                }
                if !absorbed {
                    break;
                }
            }

            let hash = self.hasher.hash(&operators);
            output.push(OperatorSequence::from_raw_parts(
                operators,
                hash,
                SequenceSign::Positive,
            ));
        }

        output
    }

    fn sources_of(&self, operator: OperatorId) -> &BTreeSet<usize> {
        let info = &self.operator_info[operator as usize];
        &self.observables[info.observable].variants[info.variant].connected_sources
    }

    /// Relabels source variants to the canonical (first-seen, lexicographically minimal)
    /// representative, so physically equivalent sequences map onto one moment.
    pub fn canonical_moment(&self, seq: &OperatorSequence) -> OperatorSequence {
        if seq.is_empty() || self.inflation <= 1 {
            return seq.clone();
        }

        let mut next_available = vec![0usize; self.network.sources().len()];
        let mut permutation: BTreeMap<usize, usize> = BTreeMap::new();
        let mut permuted = SequenceStorage::new();

        for &oper in seq.operators() {
            let info = &self.operator_info[oper as usize];
            let observable = &self.observables[info.observable];
            let variant = &observable.variants[info.variant];

            let mut source_indices = Vec::with_capacity(variant.indices.len());
            for &slot in &variant.connected_sources {
                match permutation.get(&slot) {
                    Some(&new_slot) => source_indices.push(new_slot % self.inflation),
                    None => {
                        let source = slot / self.inflation;
                        let new_variant = next_available[source];
                        next_available[source] += 1;
                        permutation.insert(slot, source * self.inflation + new_variant);
                        source_indices.push(new_variant);
                    }
                }
            }
            let new_variant = observable.variant(self.inflation, &source_indices);
            permuted.push((new_variant.operator_offset + info.outcome) as OperatorId);
        }

        self.canonicalize(permuted, seq.sign())
    }

    /// Relabels a string of observable variants to its canonical representative.
    ///
    /// The result is sorted and stripped of repeated projective entries, matching the moment
    /// canonicalization of the underlying operator strings.
    pub fn canonical_variants(&self, input: &[OVIndex]) -> Vec<OVIndex> {
        if input.is_empty() {
            return Vec::new();
        }

        let mut next_available = vec![0usize; self.network.sources().len()];
        let mut permutation: BTreeMap<usize, usize> = BTreeMap::new();
        let mut permuted = Vec::with_capacity(input.len());

        for index in input {
            let observable = &self.observables[index.observable];
            let variant = &observable.variants[index.variant];

            let mut source_indices = Vec::with_capacity(variant.indices.len());
            for &slot in &variant.connected_sources {
                match permutation.get(&slot) {
                    Some(&new_slot) => source_indices.push(new_slot % self.inflation),
                    None => {
                        let source = slot / self.inflation;
                        let new_variant = next_available[source];
                        next_available[source] += 1;
                        permutation.insert(slot, source * self.inflation + new_variant);
                        source_indices.push(new_variant);
                    }
                }
            }
            let new_variant = observable.variant(self.inflation, &source_indices);
            permuted.push(OVIndex::new(index.observable, new_variant.flat_index));
        }

        permuted.sort_unstable();
        permuted.dedup_by(|lhs, rhs| {
            lhs == rhs && self.observables[lhs.observable].projective()
        });
        permuted
    }

    /// Outcome counts of a string of observable variants.
    pub fn outcomes_per_observable(&self, indices: &[OVIndex]) -> Vec<usize> {
        indices
            .iter()
            .map(|index| self.observables[index.observable].outcomes)
            .collect()
    }
}

impl Context for InflationContext {
    fn operator_count(&self) -> usize {
        self.operator_info.len()
    }

    fn hasher(&self) -> &ShortlexHasher {
        &self.hasher
    }

    fn can_be_nonhermitian(&self) -> bool {
        // All operators commute and are hermitian, so every canonical word is hermitian.
        false
    }

    fn additional_simplification(
        &self,
        operators: &mut SequenceStorage,
        _sign: &mut SequenceSign,
    ) -> bool {
        // Completely commuting set, so sort (no need for stability).
        operators.sort_unstable();

        // Orthogonality: distinct outcomes of one observable copy annihilate.
        for pair in operators.windows(2) {
            let lhs = &self.operator_info[pair[0] as usize];
            let rhs = &self.operator_info[pair[1] as usize];
            if lhs.observable == rhs.observable
                && lhs.variant == rhs.variant
                && pair[0] != pair[1]
            {
                operators.clear();
                return true;
            }
        }

        // Remove excess idempotent elements.
        let mut simplified = SequenceStorage::new();
        for &oper in operators.iter() {
            if let Some(&previous) = simplified.last() {
                if previous == oper && self.operator_info[oper as usize].projective {
                    continue;
                }
            }
            simplified.push(oper);
        }
        *operators = simplified;

        false
    }

    fn conjugate(&self, seq: &OperatorSequence) -> OperatorSequence {
        // Commuting hermitian operators: reversal re-sorts to the same word.
        seq.with_sign(seq.sign().conjugate())
    }

    fn simplify_as_moment(&self, seq: &OperatorSequence) -> OperatorSequence {
        self.canonical_moment(seq)
    }

    fn format_raw_sequence(&self, operators: &[OperatorId]) -> String {
        if operators.is_empty() {
            return "1".to_string();
        }

        let needs_comma = self.inflation > 9;
        let needs_braces = self
            .observables
            .iter()
            .any(|observable| observable.outcomes > 2);

        let mut pieces = Vec::with_capacity(operators.len());
        for &oper in operators {
            let info = &self.operator_info[oper as usize];
            let observable = &self.observables[info.observable];
            let mut piece = alphabetic_name(info.observable);
            if observable.outcomes > 2 {
                piece.push_str(&info.outcome.to_string());
            }
            if self.inflation > 1 {
                if needs_braces {
                    piece.push('[');
                }
                let indices = &observable.variants[info.variant].indices;
                let rendered: Vec<String> =
                    indices.iter().map(|index| index.to_string()).collect();
                piece.push_str(&rendered.join(if needs_comma { "," } else { "" }));
                if needs_braces {
                    piece.push(']');
                }
            }
            pieces.push(piece);
        }
        pieces.join(";")
    }

    fn new_osg(&self, word_length: usize) -> OperatorSequenceGenerator {
        osg::inflation_generator(self, word_length)
    }
}

/// Implements the format function (Display trait) of InflationContext.
impl fmt::Display for InflationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Inflation setting with {} {} in total.",
            self.operator_info.len(),
            if self.operator_info.len() == 1 { "operator" } else { "operators" },
        )?;
        writeln!(f)?;
        write!(f, "{}", self.network)?;
        write!(f, "Inflation level: {}", self.inflation)
    }
}
