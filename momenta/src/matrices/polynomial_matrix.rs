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

use crate::matrices::{basis_masks, MatrixProperties, MonomialMatrix};
use crate::symbols::{Monomial, Polynomial, PolynomialFactory, SymbolTable};
use crate::MomentaError;

/// A square matrix whose entries are symbolic polynomials.
#[derive(Debug, Clone)]
pub struct PolynomialMatrix {
    properties: MatrixProperties,
    elements: Array2<Polynomial>,
}

impl PolynomialMatrix {
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
    pub fn element(&self, row: usize, col: usize) -> &Polynomial {
        &self.elements[(row, col)]
    }

    /// The full element array.
    pub fn elements(&self) -> &Array2<Polynomial> {
        &self.elements
    }
}

/// Combines weighted monomial matrices into one polynomial matrix.
///
/// Composite factories register every constituent before calling this, so the parts here are
/// always fully built matrices of equal dimension.
///
/// # Returns
///
/// * `Ok(PolynomialMatrix)` - The combined matrix.
/// * `Err(MomentaError::MismatchedDimension)` - The parts disagree on dimension.
pub(crate) fn compose_polynomial_matrix(
    factory: &PolynomialFactory,
    symbols: &SymbolTable,
    parts: &[(Complex64, MonomialMatrix)],
    description: String,
) -> Result<PolynomialMatrix, MomentaError> {
    let dimension = parts.first().map(|(_, m)| m.dimension()).unwrap_or(0);
    for (_, part) in parts {
        if part.dimension() != dimension {
            return Err(MomentaError::MismatchedDimension {
                expected: dimension,
                found: part.dimension(),
            });
        }
    }

    let mut elements = Array2::from_elem((dimension, dimension), Polynomial::empty());
    for row in 0..dimension {
        for col in 0..dimension {
            let terms: Vec<Monomial> = parts
                .iter()
                .map(|(weight, part)| {
                    let entry = part.element(row, col);
                    Monomial::new(entry.symbol, entry.factor * *weight, entry.conjugated)
                })
                .collect();
            elements[(row, col)] = factory.from_terms(terms);
        }
    }

    let hermitian = (0..dimension).all(|row| {
        (row..dimension).all(|col| {
            let mirrored = factory.conjugate(&elements[(row, col)], symbols);
            factory.equivalent(&elements[(col, row)], &mirrored)
        })
    });

    let mut real_basis_mask = BTreeSet::new();
    let mut imaginary_basis_mask = BTreeSet::new();
    for polynomial in elements.iter() {
        let (real, imaginary) = basis_masks(polynomial.iter(), symbols);
        real_basis_mask.extend(real);
        imaginary_basis_mask.extend(imaginary);
    }

    Ok(PolynomialMatrix {
        properties: MatrixProperties {
            dimension,
            hermitian,
            description,
            real_basis_mask,
            imaginary_basis_mask,
        },
        elements,
    })
}
