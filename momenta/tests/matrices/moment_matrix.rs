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

//! Integration test for moment matrices across scenarios

use momenta::prelude::*;
use momenta::scenarios::pauli::{PauliContext, PauliMatrixSystem};
use momenta::scenarios::MeasurementContext;
use num_complex::Complex64;

const TOLERANCE: f64 = 1e-12;

// Test that a level-0 moment matrix is the 1x1 identity matrix
#[test]
fn level_zero_is_identity() {
    let context = MeasurementContext::new(&[vec![2, 2], vec![2, 2]]).unwrap();
    let system = MatrixSystem::new(context, TOLERANCE).unwrap();
    let matrix = system.moment_matrix(0, MultithreadPolicy::Never).unwrap();

    assert_eq!(matrix.dimension(), 1);
    assert!(matrix.is_hermitian());
    let monomial = matrix.as_monomial().unwrap();
    assert_eq!(monomial.element(0, 0).symbol, 1);
    assert_eq!(monomial.element(0, 0).factor, Complex64::new(1.0, 0.0));
}

// Test the single-qubit Pauli moment matrix at level 1
#[test]
fn pauli_one_qubit_level_one() {
    let context = PauliContext::new_chain(1, false, false).unwrap();
    let system = PauliMatrixSystem::new(context, TOLERANCE).unwrap();
    let matrix = system.moment_matrix(1, MultithreadPolicy::Never).unwrap();

    // Rows and columns are labelled 1, X, Y, Z.
    assert_eq!(matrix.dimension(), 4);
    assert!(matrix.is_hermitian());
    let monomial = matrix.as_monomial().unwrap();

    // Identify the symbols of X, Y, Z through the first row.
    let x_symbol = monomial.element(0, 1).symbol;
    let y_symbol = monomial.element(0, 2).symbol;
    let z_symbol = monomial.element(0, 3).symbol;
    assert_eq!(
        std::collections::BTreeSet::from([x_symbol, y_symbol, z_symbol]).len(),
        3
    );

    // Diagonal: sigma squared is the identity.
    for position in 0..4 {
        assert_eq!(monomial.element(position, position).symbol, 1);
    }

    // (X, Y) = i Z; (X, Z) = -i Y; (Y, Z) = i X.
    let xy = monomial.element(1, 2);
    assert_eq!(xy.symbol, z_symbol);
    assert_eq!(xy.factor, Complex64::new(0.0, 1.0));

    let xz = monomial.element(1, 3);
    assert_eq!(xz.symbol, y_symbol);
    assert_eq!(xz.factor, Complex64::new(0.0, -1.0));

    let yz = monomial.element(2, 3);
    assert_eq!(yz.symbol, x_symbol);
    assert_eq!(yz.factor, Complex64::new(0.0, 1.0));

    // The transposed entries carry the conjugate phases.
    assert_eq!(monomial.element(2, 1).factor, Complex64::new(0.0, -1.0));

    // All Pauli symbols are hermitian: no imaginary basis elements appear.
    assert!(matrix.properties().imaginary_basis_mask.is_empty());
    assert!(matrix.properties().real_basis_mask.contains(&x_symbol));
}

// Test the CHSH moment matrix dimensions at levels 1 and 2
#[test]
fn chsh_dimensions() {
    let context = MeasurementContext::new(&[vec![2, 2], vec![2, 2]]).unwrap();
    let system = MatrixSystem::new(context, TOLERANCE).unwrap();

    assert_eq!(
        system
            .moment_matrix(1, MultithreadPolicy::Never)
            .unwrap()
            .dimension(),
        5
    );
    assert_eq!(
        system
            .moment_matrix(2, MultithreadPolicy::Never)
            .unwrap()
            .dimension(),
        13
    );
}

// Test that an empty scenario admits only the reserved symbols
#[test]
fn empty_scenario() {
    let context = MeasurementContext::new(&[]).unwrap();
    let system = MatrixSystem::new(context, TOLERANCE).unwrap();
    let matrix = system.moment_matrix(3, MultithreadPolicy::Never).unwrap();

    assert_eq!(matrix.dimension(), 1);
    system.with_symbols(|symbols| assert_eq!(symbols.len(), 2));
}

// Test that serial and parallel construction agree
#[test]
fn parallel_matches_serial() {
    let serial_system = PauliMatrixSystem::new(
        PauliContext::new_chain(3, true, false).unwrap(),
        TOLERANCE,
    )
    .unwrap();
    let parallel_system = PauliMatrixSystem::new(
        PauliContext::new_chain(3, true, false).unwrap(),
        TOLERANCE,
    )
    .unwrap();

    let serial = serial_system.moment_matrix(2, MultithreadPolicy::Never).unwrap();
    let parallel = parallel_system
        .moment_matrix(2, MultithreadPolicy::Always)
        .unwrap();

    assert_eq!(serial.dimension(), parallel.dimension());
    let serial = serial.as_monomial().unwrap();
    let parallel = parallel.as_monomial().unwrap();
    for row in 0..serial.dimension() {
        for col in 0..serial.dimension() {
            assert_eq!(serial.element(row, col), parallel.element(row, col));
        }
    }
}
