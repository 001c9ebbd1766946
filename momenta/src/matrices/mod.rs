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

//! Module for symbolic matrices: monomial and polynomial, and their factories.

use std::collections::BTreeSet;

use crate::{MomentaError, SymbolId};

mod indices;
pub use indices::*;

mod monomial_matrix;
pub use monomial_matrix::*;

mod polynomial_matrix;
pub use polynomial_matrix::*;

mod moment_matrix;
pub use moment_matrix::*;

mod localizing_matrix;
pub use localizing_matrix::*;

/// Metadata shared by all symbolic matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixProperties {
    /// Number of rows (and columns) of the square matrix.
    pub dimension: usize,
    /// True, if the matrix equals its own conjugate transpose.
    pub hermitian: bool,
    /// Human-readable description of the matrix.
    pub description: String,
    /// Symbols appearing in the matrix that carry a real basis element.
    pub real_basis_mask: BTreeSet<SymbolId>,
    /// Symbols appearing in the matrix that carry an imaginary basis element.
    pub imaginary_basis_mask: BTreeSet<SymbolId>,
}

/// A registered matrix: either monomial (one symbol per entry) or polynomial.
#[derive(Debug, Clone)]
pub enum SymbolicMatrix {
    /// A matrix of [crate::symbols::Monomial] entries.
    Monomial(MonomialMatrix),
    /// A matrix of [crate::symbols::Polynomial] entries.
    Polynomial(PolynomialMatrix),
}

impl SymbolicMatrix {
    /// The matrix metadata.
    pub fn properties(&self) -> &MatrixProperties {
        match self {
            SymbolicMatrix::Monomial(matrix) => matrix.properties(),
            SymbolicMatrix::Polynomial(matrix) => matrix.properties(),
        }
    }

    /// Number of rows (and columns).
    pub fn dimension(&self) -> usize {
        self.properties().dimension
    }

    /// True, if the matrix equals its own conjugate transpose.
    pub fn is_hermitian(&self) -> bool {
        self.properties().hermitian
    }

    /// Human-readable description of the matrix.
    pub fn description(&self) -> &str {
        &self.properties().description
    }

    fn kind_name(&self) -> &'static str {
        match self {
            SymbolicMatrix::Monomial(_) => "monomial",
            SymbolicMatrix::Polynomial(_) => "polynomial",
        }
    }

    /// Accesses the matrix as a monomial matrix.
    ///
    /// # Returns
    ///
    /// * `Ok(&MonomialMatrix)` - The monomial matrix.
    /// * `Err(MomentaError::BadCast)` - The matrix holds polynomial entries.
    pub fn as_monomial(&self) -> Result<&MonomialMatrix, MomentaError> {
        match self {
            SymbolicMatrix::Monomial(matrix) => Ok(matrix),
            other => Err(MomentaError::BadCast {
                expected: "monomial".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    /// Accesses the matrix as a polynomial matrix.
    ///
    /// # Returns
    ///
    /// * `Ok(&PolynomialMatrix)` - The polynomial matrix.
    /// * `Err(MomentaError::BadCast)` - The matrix holds monomial entries.
    pub fn as_polynomial(&self) -> Result<&PolynomialMatrix, MomentaError> {
        match self {
            SymbolicMatrix::Polynomial(matrix) => Ok(matrix),
            other => Err(MomentaError::BadCast {
                expected: "polynomial".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }
}
