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

//! Extended moment matrices: a moment matrix bordered by scalar-extension rows and columns.

use std::collections::BTreeMap;

use ndarray::Array2;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dictionary::OperatorSequenceGenerator;
use crate::matrices::{basis_masks, MatrixProperties, MonomialMatrix};
use crate::operators::{OperatorSequence, SequenceSign, SequenceStorage};
use crate::scenarios::inflation::{FactorTable, InflationContext};
use crate::symbols::{Monomial, SymbolTable};
use crate::system::{IndexStorage, MultithreadPolicy};
use crate::utilities::IndexTree;
use crate::{Context, MomentaError, OperatorId, SymbolId};

/// Index of an extended matrix: the source moment-matrix level and the extension symbols.
///
/// The extension list is kept sorted and duplicate-free, so equivalent requests share one key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtendedMatrixIndex {
    /// Hierarchy level of the source moment matrix.
    pub moment_matrix_level: usize,
    /// Symbols whose factors border the matrix, sorted ascending.
    pub extension_list: Vec<SymbolId>,
}

impl ExtendedMatrixIndex {
    /// Creates an index, normalizing the extension list.
    pub fn new(
        moment_matrix_level: usize,
        extensions: impl IntoIterator<Item = SymbolId>,
    ) -> Self {
        let mut extension_list: Vec<SymbolId> = extensions.into_iter().collect();
        extension_list.sort_unstable();
        extension_list.dedup();
        Self {
            moment_matrix_level,
            extension_list,
        }
    }

    fn tree_path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(1 + self.extension_list.len());
        path.push(self.moment_matrix_level);
        path.extend(self.extension_list.iter().copied());
        path
    }
}

/// Trie-backed registry storage for extended-matrix indices.
#[derive(Debug, Default)]
pub struct ExtendedMatrixIndexStorage {
    tree: IndexTree<usize, usize>,
}

impl IndexStorage<ExtendedMatrixIndex> for ExtendedMatrixIndexStorage {
    fn find(&self, index: &ExtendedMatrixIndex) -> Option<usize> {
        self.tree.find(&index.tree_path())
    }

    fn insert(&mut self, index: ExtendedMatrixIndex, offset: usize) -> Option<usize> {
        let (stored, inserted) = self.tree.add_if_new(&index.tree_path(), offset);
        if inserted {
            None
        } else {
            Some(stored)
        }
    }
}

#[derive(Debug, Default)]
struct Overlay {
    tree: IndexTree<SymbolId, SymbolId>,
    count: usize,
}

/// Two-tier factor-list resolver shared by the parallel workers.
///
/// The persistent factor table is probed lock-free (it cannot change while the build holds the
/// system's write access); factor lists unknown to it live in a lock-guarded overlay trie.
/// Workers take the shared lock to probe the overlay, release it, and only take the exclusive
/// lock to insert, re-checking for a racing creator. Overlay ids are provisional; the
/// post-join flush assigns the final symbol ids.
pub(crate) struct TemporarySymbolsAndFactors<'a> {
    factors: &'a FactorTable,
    first_id: SymbolId,
    overlay: RwLock<Overlay>,
}

impl<'a> TemporarySymbolsAndFactors<'a> {
    pub(crate) fn new(factors: &'a FactorTable, first_id: SymbolId) -> Self {
        Self {
            factors,
            first_id,
            overlay: RwLock::new(Overlay::default()),
        }
    }

    /// Resolves a normalized factor list to a symbol id, allocating a provisional id for
    /// lists never seen before.
    pub(crate) fn find_or_register(&self, joint_factors: &[SymbolId]) -> SymbolId {
        // First, the uncontended look-up in the persistent factor index.
        if let Some(id) = self.factors.find_by_factors(joint_factors) {
            return id;
        }

        {
            let overlay = self.overlay.read();
            let (node, suffix) = overlay.tree.find_node_or_suffix(joint_factors);
            if suffix.is_empty() {
                if let Some(id) = node.value() {
                    return id;
                }
            }
        }

        // Not present during the shared probe; re-check under the exclusive lock in case a
        // racing worker created the entry in between.
        let mut overlay = self.overlay.write();
        let candidate = self.first_id + overlay.count;
        let (id, inserted) = overlay.tree.add_if_new(joint_factors, candidate);
        if inserted {
            overlay.count += 1;
        }
        id
    }

    fn into_overlay(self) -> (IndexTree<SymbolId, SymbolId>, usize) {
        let overlay = self.overlay.into_inner();
        (overlay.tree, overlay.count)
    }
}

/// Realizes a factor list as an operator sequence on pairwise-independent source copies.
///
/// Each factor is relabelled onto fresh variants of its sources, so distinct factors share no
/// inflated source in the result.
///
/// # Returns
///
/// * `Some(OperatorSequence)` - The product word on independent copies.
/// * `None` - The inflation level has no further copies for some factor (or the word would
///   exceed the hashable length); the moment product has no operator realization.
fn independent_product(
    context: &InflationContext,
    symbols: &SymbolTable,
    factor_ids: &[SymbolId],
) -> Option<OperatorSequence> {
    let inflation = context.inflation();
    let mut next_available = vec![0usize; context.network().sources().len()];
    let mut operators = SequenceStorage::new();

    for &factor in factor_ids {
        let sequence = symbols[factor]
            .sequence()
            .expect("Internal error: factor symbols always carry sequences.");
        let mut slot_map: BTreeMap<usize, usize> = BTreeMap::new();
        for &oper in sequence.operators() {
            let info = &context.operator_info()[oper as usize];
            let observable = &context.observables()[info.observable];
            let variant = &observable.variants[info.variant];

            let mut indices = Vec::with_capacity(variant.indices.len());
            for &slot in &variant.connected_sources {
                let assigned = match slot_map.get(&slot) {
                    Some(&variant_index) => variant_index,
                    None => {
                        let source = slot / inflation;
                        let fresh = next_available[source];
                        if fresh >= inflation {
                            return None;
                        }
                        next_available[source] += 1;
                        slot_map.insert(slot, fresh);
                        fresh
                    }
                };
                indices.push(assigned);
            }
            let target = observable.variant(inflation, &indices);
            operators.push((target.operator_offset + info.outcome) as OperatorId);
        }
    }

    if operators.len() > context.hasher().longest_hashable() {
        return None;
    }
    Some(context.canonicalize(operators, SequenceSign::Positive))
}

/// Builds an extended moment matrix.
///
/// The top-left block is the source moment matrix; border entries are resolved by merging the
/// factor lists of the row and column labels. The factor table must be synchronized with the
/// symbol table before the build. After the parallel fill, newly discovered factor lists are
/// flushed into the symbol and factor tables in trie order, so the final id assignment does
/// not depend on worker interleaving.
pub(crate) fn create_extended_matrix(
    context: &InflationContext,
    symbols: &mut SymbolTable,
    factors: &mut FactorTable,
    source: &MonomialMatrix,
    source_labels: &OperatorSequenceGenerator,
    index: &ExtendedMatrixIndex,
    policy: MultithreadPolicy,
) -> Result<MonomialMatrix, MomentaError> {
    let source_dimension = source.dimension();
    let extensions = &index.extension_list;
    let full_dimension = source_dimension + extensions.len();

    for &extension in extensions {
        if symbols.get(extension).is_none() {
            return Err(MomentaError::UnknownSymbol { symbol: extension });
        }
    }
    if source_labels.len() != source_dimension {
        return Err(MomentaError::MismatchedDimension {
            expected: source_dimension,
            found: source_labels.len(),
        });
    }

    // Symbols of the source matrix's row/column labels, as moments.
    let mut label_symbols = Vec::with_capacity(source_dimension);
    for label in source_labels.iter() {
        let moment = context.simplify_as_moment(label);
        let (id, _) = symbols
            .find(moment.hash())
            .ok_or_else(|| MomentaError::UnregisteredOperatorSequence {
                sequence: context.format_sequence(label),
            })?;
        label_symbols.push(id);
    }

    let first_new_id = symbols.len();
    let shared_factors: &FactorTable = factors;
    let temporary = TemporarySymbolsAndFactors::new(shared_factors, first_new_id);

    fn factor_list<'f>(
        factors: &'f FactorTable,
        label_symbols: &[SymbolId],
        extensions: &[SymbolId],
        source_dimension: usize,
        row: usize,
    ) -> &'f [SymbolId] {
        let symbol = if row < source_dimension {
            label_symbols[row]
        } else {
            extensions[row - source_dimension]
        };
        &factors
            .get(symbol)
            .expect("Internal error: factor table out of sync with symbol table.")
            .canonical_symbols
    }

    let fill_row = |row: usize, cells: &mut [Monomial]| {
        let row_factors = factor_list(
            shared_factors,
            &label_symbols,
            extensions,
            source_dimension,
            row,
        );
        for (col, cell) in cells.iter_mut().enumerate() {
            if row < source_dimension && col < source_dimension {
                *cell = *source.element(row, col);
                continue;
            }
            let col_factors = factor_list(
                shared_factors,
                &label_symbols,
                extensions,
                source_dimension,
                col,
            );
            let joint = FactorTable::combine_factor_lists(row_factors, col_factors);
            *cell = Monomial::from_symbol(temporary.find_or_register(&joint));
        }
    };

    let mut buffer = vec![Monomial::default(); full_dimension * full_dimension];
    if policy.should_parallelize(full_dimension) {
        buffer
            .par_chunks_mut(full_dimension)
            .enumerate()
            .for_each(|(row, cells)| fill_row(row, cells));
    } else {
        for (row, cells) in buffer.chunks_mut(full_dimension).enumerate() {
            fill_row(row, cells);
        }
    }

    // Flush the overlay in trie order: final ids follow the canonical order of the factor
    // lists, independent of which worker discovered them first.
    let (overlay_tree, overlay_count) = temporary.into_overlay();
    let mut discovered: Vec<(Vec<SymbolId>, SymbolId)> = Vec::with_capacity(overlay_count);
    overlay_tree.visit(&mut |key, provisional| {
        discovered.push((key.to_vec(), provisional));
    });

    let mut remap = vec![0usize; overlay_count];
    for (factor_ids, provisional) in discovered {
        let factor_sequences: Vec<OperatorSequence> = factor_ids
            .iter()
            .map(|&factor| {
                symbols[factor]
                    .sequence()
                    .cloned()
                    .expect("Internal error: factor symbols always carry sequences.")
            })
            .collect();

        // A factor list names a product of independent moments. When the inflation level
        // still holds fresh source copies for every factor, the product is realized as an
        // operator sequence and interned by content; otherwise the symbol is addressable
        // only through the factor table.
        let (final_id, created) = match independent_product(context, symbols, &factor_ids) {
            Some(product) => {
                let moment = context.canonical_moment(&product);
                let (id, _, was_new) = symbols.intern(context, &moment);
                (id, was_new)
            }
            None => (symbols.create_sequenceless(true), true),
        };
        if created {
            factors.register_new(final_id, factor_ids, factor_sequences);
        }
        remap[provisional - first_new_id] = final_id;
    }

    for cell in buffer.iter_mut() {
        if cell.symbol >= first_new_id {
            cell.symbol = remap[cell.symbol - first_new_id];
        }
    }

    let elements = Array2::from_shape_vec((full_dimension, full_dimension), buffer)
        .expect("Internal error: extended matrix buffer has square shape.");

    let hermitian = (0..full_dimension).all(|row| {
        (row..full_dimension).all(|col| elements[(row, col)] == elements[(col, row)])
    });
    let (real_basis_mask, imaginary_basis_mask) = basis_masks(elements.iter(), symbols);

    let description = format!(
        "Extended moment matrix, level {}, {} {}",
        index.moment_matrix_level,
        extensions.len(),
        if extensions.len() == 1 { "extension" } else { "extensions" },
    );

    Ok(MonomialMatrix::from_parts(
        MatrixProperties {
            dimension: full_dimension,
            hermitian,
            description,
            real_basis_mask,
            imaginary_basis_mask,
        },
        elements,
    ))
}
