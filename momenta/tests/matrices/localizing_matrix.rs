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

//! Integration test for localizing matrices

use momenta::prelude::*;
use momenta::scenarios::MeasurementContext;
use num_complex::Complex64;

const TOLERANCE: f64 = 1e-12;

fn chsh_system() -> MatrixSystem<MeasurementContext> {
    let context = MeasurementContext::new(&[vec![2, 2], vec![2, 2]]).unwrap();
    MatrixSystem::new(context, TOLERANCE).unwrap()
}

// Test the shape and corner entry of a monomial localizing matrix
#[test]
fn monomial_localizing_matrix() {
    let system = chsh_system();
    let word = system.context().sequence([0]).unwrap();
    let index = LocalizingMatrixIndex { level: 1, word };

    let matrix = system
        .localizing_matrix(&index, MultithreadPolicy::Never)
        .unwrap();
    assert_eq!(matrix.dimension(), 5);

    let monomial = matrix.as_monomial().unwrap();
    // Entry (0, 0) is the word itself.
    let word_symbol = monomial.element(0, 0).symbol;
    let resolved = system.with_symbols(|symbols| {
        symbols
            .get(word_symbol)
            .and_then(|symbol| symbol.sequence().cloned())
            .unwrap()
    });
    assert_eq!(resolved, system.context().sequence([0]).unwrap());

    // Entry (0, 0) again through the registry.
    let again = system.get_localizing_matrix(&index).unwrap();
    assert_eq!(again.dimension(), 5);
}

// Test that a localizing matrix with a hermitian word is hermitian
#[test]
fn hermiticity_follows_word() {
    let system = chsh_system();
    // A single projector is hermitian.
    let hermitian_word = system.context().sequence([0]).unwrap();
    let hermitian = system
        .localizing_matrix(
            &LocalizingMatrixIndex {
                level: 1,
                word: hermitian_word,
            },
            MultithreadPolicy::Never,
        )
        .unwrap();
    assert!(hermitian.is_hermitian());

    // A0.0 A1.0 differs from its conjugate.
    let word = system.context().sequence([0, 1]).unwrap();
    let non_hermitian = system
        .localizing_matrix(
            &LocalizingMatrixIndex { level: 1, word },
            MultithreadPolicy::Never,
        )
        .unwrap();
    assert!(!non_hermitian.is_hermitian());
}

// Test the polynomial localizing matrix: composition and constituent registration
#[test]
fn polynomial_localizing_matrix() {
    let system = chsh_system();
    let context = system.context();
    let factory = system.polynomial_factory().clone();

    // Register symbols for A0.0 and B0.0 through the level-1 moment matrix.
    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    let a0 = context.sequence([0]).unwrap();
    let b0 = context.sequence([2]).unwrap();
    let (a0_id, b0_id) = system.with_symbols(|symbols| {
        (
            symbols.find(a0.hash()).unwrap().0,
            symbols.find(b0.hash()).unwrap().0,
        )
    });

    let polynomial = factory.from_terms(vec![
        Monomial::new(a0_id, Complex64::new(1.0, 0.0), false),
        Monomial::new(b0_id, Complex64::new(-2.0, 0.0), false),
    ]);
    let index = PolynomialLocalizingMatrixIndex {
        level: 1,
        polynomial: polynomial.clone(),
    };

    let matrix = system
        .polynomial_localizing_matrix(&index, MultithreadPolicy::Never)
        .unwrap();
    assert_eq!(matrix.dimension(), 5);
    let polynomial_matrix = matrix.as_polynomial().unwrap();

    // The (0, 0) entry is the localizing polynomial itself.
    let corner = polynomial_matrix.element(0, 0);
    assert_eq!(corner.len(), 2);
    assert_eq!(corner.terms()[0].symbol, a0_id);
    assert_eq!(corner.terms()[0].factor, Complex64::new(1.0, 0.0));
    assert_eq!(corner.terms()[1].symbol, b0_id);
    assert_eq!(corner.terms()[1].factor, Complex64::new(-2.0, 0.0));

    // Constituent monomial matrices were registered before the composite.
    assert!(system
        .get_localizing_matrix(&LocalizingMatrixIndex { level: 1, word: a0 })
        .is_ok());
    assert!(system
        .get_localizing_matrix(&LocalizingMatrixIndex { level: 1, word: b0 })
        .is_ok());

    // The composite is registered under its polynomial index.
    assert!(system.get_polynomial_localizing_matrix(&index).is_ok());
}
