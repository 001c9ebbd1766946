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

//! Integration test for Pauli commutator and anti-commutator matrices

use momenta::prelude::*;
use momenta::scenarios::pauli::{
    CommutatorMatrixIndex, NearestNeighbourIndex, PauliContext, PauliMatrixSystem,
    PolynomialCommutatorMatrixIndex,
};
use num_complex::Complex64;

const TOLERANCE: f64 = 1e-12;

fn one_qubit_system() -> PauliMatrixSystem {
    PauliMatrixSystem::new(PauliContext::new_chain(1, false, false).unwrap(), TOLERANCE).unwrap()
}

// Test the commutator matrix of the word Y on one qubit
#[test]
fn commutator_matrix_entries() {
    let system = one_qubit_system();
    let word = system.context().sigma_y(0);
    let index = CommutatorMatrixIndex {
        index: NearestNeighbourIndex::unrestricted(1),
        word,
    };
    let matrix = system
        .commutator_matrix(index.clone(), MultithreadPolicy::Never)
        .unwrap();
    assert_eq!(matrix.dimension(), 4);
    let monomial = matrix.as_monomial().unwrap();

    // Row 1 is labelled X: [X, Y] = 2i Z.
    let xy = monomial.element(0, 1);
    assert_eq!(xy.factor, Complex64::new(0.0, 2.0));
    let z_sequence = system.with_symbols(|symbols| {
        symbols.get(xy.symbol).unwrap().sequence().unwrap().clone()
    });
    assert_eq!(z_sequence.operators(), system.context().sigma_z(0).operators());

    // [Y, Y] = 0 and [1, Y] = 0.
    assert!(monomial.element(0, 2).is_zero_symbol());
    assert!(monomial.element(0, 0).is_zero_symbol());

    // The registry resolves the same matrix again.
    assert!(system.get_commutator_matrix(&index).is_ok());
}

// Test the anti-commutator matrix of the word Y on one qubit
#[test]
fn anticommutator_matrix_entries() {
    let system = one_qubit_system();
    let word = system.context().sigma_y(0);
    let index = CommutatorMatrixIndex {
        index: NearestNeighbourIndex::unrestricted(1),
        word,
    };
    let matrix = system
        .anticommutator_matrix(index, MultithreadPolicy::Never)
        .unwrap();
    let monomial = matrix.as_monomial().unwrap();

    // {X, Y} = 0 for distinct letters on one qubit.
    assert!(monomial.element(0, 1).is_zero_symbol());
    // {Y, Y} = 2: the identity entry survives with the conventional prefactor.
    let yy = monomial.element(0, 2);
    assert_eq!(yy.symbol, 1);
    assert_eq!(yy.factor, Complex64::new(2.0, 0.0));
}

// Test that commutator and anti-commutator registries are independent
#[test]
fn registries_are_separate() {
    let system = one_qubit_system();
    let index = CommutatorMatrixIndex {
        index: NearestNeighbourIndex::unrestricted(1),
        word: system.context().sigma_x(0),
    };

    system
        .commutator_matrix(index.clone(), MultithreadPolicy::Never)
        .unwrap();
    assert!(system.get_commutator_matrix(&index).is_ok());
    let missing = system.get_anticommutator_matrix(&index);
    assert!(matches!(missing, Err(MomentaError::NotFound { .. })));
}

// Test the polynomial commutator matrix composed from monomial constituents
#[test]
fn polynomial_commutator_matrix() {
    let system = one_qubit_system();

    // Register X and Y as symbols through the moment matrix.
    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    let (x_id, y_id) = system.with_symbols(|symbols| {
        (
            symbols.find(system.context().sigma_x(0).hash()).unwrap().0,
            symbols.find(system.context().sigma_y(0).hash()).unwrap().0,
        )
    });

    let polynomial = system.polynomial_factory().from_terms(vec![
        Monomial::new(x_id, Complex64::new(1.0, 0.0), false),
        Monomial::new(y_id, Complex64::new(0.5, 0.0), false),
    ]);
    let index = PolynomialCommutatorMatrixIndex {
        index: NearestNeighbourIndex::unrestricted(1),
        polynomial,
    };
    let matrix = system
        .polynomial_commutator_matrix(index, MultithreadPolicy::Never)
        .unwrap();
    assert_eq!(matrix.dimension(), 4);

    // Entry (row Y, col 1): [Y X, ...] contributions reduce to the X-word part:
    // [Y, X] = -2i Z scaled by 1.0.
    let polynomial_matrix = matrix.as_polynomial().unwrap();
    let yx = polynomial_matrix.element(2, 0);
    assert_eq!(yx.len(), 1);
    assert_eq!(yx.terms()[0].factor, Complex64::new(0.0, -2.0));
}

// Test the raw-polynomial commutator path
#[test]
fn commutator_matrix_from_raw() {
    let system = one_qubit_system();
    let mut raw = RawPolynomial::new();
    raw.push(system.context().sigma_x(0), Complex64::new(1.0, 0.0));
    raw.push(system.context().sigma_y(0), Complex64::new(1.0, 0.0));

    let matrix = system
        .commutator_matrix_from_raw(
            NearestNeighbourIndex::unrestricted(1),
            &raw,
            MultithreadPolicy::Never,
        )
        .unwrap();
    assert_eq!(matrix.dimension(), 4);
    assert!(matrix.as_polynomial().is_ok());
}
