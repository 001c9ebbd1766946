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

use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::dictionary::OperatorSequenceGenerator;
use crate::matrices::MatrixProperties;
use crate::operators::OperatorSequence;
use crate::symbols::{Monomial, SymbolTable};
use crate::system::MultithreadPolicy;
use crate::{Context, SymbolId};

/// A square matrix whose entries each reference a single symbol.
#[derive(Debug, Clone)]
pub struct MonomialMatrix {
    properties: MatrixProperties,
    elements: Array2<Monomial>,
}

impl MonomialMatrix {
    /// The matrix metadata.
    pub fn properties(&self) -> &MatrixProperties {
        &self.properties
    }

    /// Number of rows (and columns).
    pub fn dimension(&self) -> usize {
        self.properties.dimension
    }

    /// Element-wise access.
    ///
    /// # Panics
    ///
    /// * If the position is out of range.
    pub fn element(&self, row: usize, col: usize) -> &Monomial {
        &self.elements[(row, col)]
    }

    /// The full element array.
    pub fn elements(&self) -> &Array2<Monomial> {
        &self.elements
    }

    pub(crate) fn from_parts(properties: MatrixProperties, elements: Array2<Monomial>) -> Self {
        Self {
            properties,
            elements,
        }
    }
}

/// Computes the real/imaginary basis masks of a set of monomial entries.
pub(crate) fn basis_masks<'a>(
    entries: impl IntoIterator<Item = &'a Monomial>,
    symbols: &SymbolTable,
) -> (BTreeSet<SymbolId>, BTreeSet<SymbolId>) {
    let mut real = BTreeSet::new();
    let mut imaginary = BTreeSet::new();
    for entry in entries {
        if let Some(symbol) = symbols.get(entry.symbol) {
            if symbol.real_basis().is_some() {
                real.insert(entry.symbol);
            }
            if symbol.imaginary_basis().is_some() {
                imaginary.insert(entry.symbol);
            }
        }
    }
    (real, imaginary)
}

/// Builds a monomial operator matrix over a dictionary.
///
/// Entry (i, j) is the symbol of `entry(gᵢ*, gⱼ)` after moment simplification, with the
/// sequence's sign and the global `prefactor` folded into the entry coefficient. Hermiticity is
/// determined exactly, on the entry sequences, before symbols are assigned.
///
/// Under a permissive [MultithreadPolicy] the entry sequences of large matrices are computed
/// on a rayon pool; symbol interning remains single-writer and happens after the join.
pub(crate) fn build_monomial_matrix<C, F>(
    context: &C,
    symbols: &mut SymbolTable,
    labels: &OperatorSequenceGenerator,
    entry: F,
    prefactor: Complex64,
    description: String,
    policy: MultithreadPolicy,
) -> MonomialMatrix
where
    C: Context,
    F: Fn(&OperatorSequence, &OperatorSequence) -> OperatorSequence + Sync,
{
    let dimension = labels.len();
    let conjugated: Vec<OperatorSequence> =
        labels.iter().map(|label| context.conjugate(label)).collect();

    let compute_row = |row: usize| -> Vec<OperatorSequence> {
        (0..dimension)
            .map(|col| entry(&conjugated[row], &labels[col]))
            .collect()
    };

    let rows: Vec<Vec<OperatorSequence>> = if policy.should_parallelize(dimension) {
        (0..dimension).into_par_iter().map(compute_row).collect()
    } else {
        (0..dimension).map(compute_row).collect()
    };

    let hermitian = (0..dimension).all(|row| {
        (row..dimension).all(|col| rows[col][row] == context.conjugate(&rows[row][col]))
    });

    let mut elements = Array2::from_elem((dimension, dimension), Monomial::default());
    for (row, row_sequences) in rows.iter().enumerate() {
        for (col, sequence) in row_sequences.iter().enumerate() {
            let moment = context.simplify_as_moment(sequence);
            if moment.is_zero() {
                continue;
            }
            let (symbol, entry_conjugated, _) = symbols.intern(context, &moment);
            elements[(row, col)] = Monomial::new(
                symbol,
                prefactor * moment.sign().as_complex(),
                entry_conjugated,
            );
        }
    }

    let (real_basis_mask, imaginary_basis_mask) = basis_masks(elements.iter(), symbols);
    MonomialMatrix {
        properties: MatrixProperties {
            dimension,
            hermitian,
            description,
            real_basis_mask,
            imaginary_basis_mask,
        },
        elements,
    }
}
