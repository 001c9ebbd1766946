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

//! Integration test for public API of RawPolynomial

use momenta::prelude::*;
use momenta::scenarios::pauli::PauliContext;
use momenta::scenarios::MeasurementContext;
use num_complex::Complex64;

// Test that pushed sequences absorb their sign tag into the weight
#[test]
fn push_absorbs_sign() {
    let context = PauliContext::new_chain(1, false, false).unwrap();
    let product = context.multiply(&context.sigma_y(0), &context.sigma_x(0));
    assert_eq!(product.sign(), SequenceSign::NegativeImaginary);

    let mut raw = RawPolynomial::new();
    raw.push(product, Complex64::new(1.0, 0.0));

    let (sequence, weight) = raw.iter().next().unwrap();
    assert_eq!(sequence.sign(), SequenceSign::Positive);
    assert_eq!(sequence.operators(), context.sigma_z(0).operators());
    assert_eq!(*weight, Complex64::new(0.0, -1.0));
}

// Test that zero sequences are dropped on push
#[test]
fn push_drops_zero() {
    let mut raw = RawPolynomial::new();
    raw.push(OperatorSequence::zero(), Complex64::new(3.0, 0.0));
    assert!(raw.is_empty());
}

// Test the round-trip law: from_polynomial then to_polynomial is the identity
#[test]
fn polynomial_round_trip() {
    let context = MeasurementContext::new(&[vec![2, 2], vec![2, 2]]).unwrap();
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let mut table = SymbolTable::new();

    let a0 = context.sequence([0]).unwrap();
    let word = context.sequence([0, 1]).unwrap();
    let (a0_id, _, _) = table.intern(&context, &a0);
    let (word_id, _, _) = table.intern(&context, &word);

    let polynomial = factory.from_terms(vec![
        Monomial::new(a0_id, Complex64::new(0.5, 0.0), false),
        Monomial::new(word_id, Complex64::new(0.0, 1.0), true),
    ]);

    let raw = RawPolynomial::from_polynomial(&polynomial, &table).unwrap();
    let restored = raw.to_polynomial(&context, &factory, &table).unwrap();
    assert_eq!(restored, polynomial);
}

// Test that unregistered sequences are reported
#[test]
fn unregistered_sequence_errors() {
    let context = MeasurementContext::new(&[vec![2, 2]]).unwrap();
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let table = SymbolTable::new();

    let mut raw = RawPolynomial::new();
    raw.push(context.sequence([0]).unwrap(), Complex64::new(1.0, 0.0));

    let result = raw.to_polynomial(&context, &factory, &table);
    assert_eq!(
        result,
        Err(MomentaError::UnregisteredOperatorSequence {
            sequence: "A0.0".to_string(),
        })
    );
}

// Test the registering conversion of RawPolynomial
#[test]
fn to_polynomial_register_symbols() {
    let context = MeasurementContext::new(&[vec![2, 2]]).unwrap();
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let mut table = SymbolTable::new();

    let mut raw = RawPolynomial::new();
    raw.push(context.sequence([0]).unwrap(), Complex64::new(2.0, 0.0));
    raw.push(context.sequence([1]).unwrap(), Complex64::new(-1.0, 0.0));

    let polynomial = raw.to_polynomial_register_symbols(&context, &factory, &mut table);
    assert_eq!(polynomial.len(), 2);
    assert_eq!(table.len(), 4);

    // Conversion without registration now succeeds too.
    assert_eq!(
        raw.to_polynomial(&context, &factory, &table).unwrap(),
        polynomial
    );
}
