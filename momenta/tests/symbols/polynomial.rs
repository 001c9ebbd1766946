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

//! Integration test for public API of Polynomial and PolynomialFactory

use momenta::prelude::*;
use momenta::scenarios::MeasurementContext;
use num_complex::Complex64;

// Test that a non-positive zero tolerance is rejected
#[test]
fn factory_rejects_bad_tolerance() {
    assert_eq!(
        PolynomialFactory::new(0.0),
        Err(MomentaError::NonPositiveTolerance { tolerance: 0.0 })
    );
    assert!(PolynomialFactory::new(-1.0).is_err());
    assert!(PolynomialFactory::new(1e-12).is_ok());
}

// Test the canonical ordering and merging of from_terms
#[test]
fn from_terms_orders_and_merges() {
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let polynomial = factory.from_terms(vec![
        Monomial::new(5, Complex64::new(1.0, 0.0), true),
        Monomial::new(3, Complex64::new(2.0, 0.0), false),
        Monomial::new(5, Complex64::new(0.5, 0.0), false),
        Monomial::new(3, Complex64::new(-0.5, 0.0), false),
    ]);

    let keys: Vec<(SymbolId, bool)> = polynomial
        .iter()
        .map(|term| (term.symbol, term.conjugated))
        .collect();
    assert_eq!(keys, vec![(3, false), (5, false), (5, true)]);
    assert_eq!(polynomial.terms()[0].factor, Complex64::new(1.5, 0.0));
}

// Test that coefficients within the tolerance are pruned
#[test]
fn zero_pruning() {
    let factory = PolynomialFactory::new(1e-8).unwrap();
    let polynomial = factory.from_terms(vec![
        Monomial::new(2, Complex64::new(1.0, 0.0), false),
        Monomial::new(3, Complex64::new(1e-10, 0.0), false),
        Monomial::new(4, Complex64::new(1.0, 0.0), false),
        Monomial::new(4, Complex64::new(-1.0, 0.0), false),
    ]);
    assert_eq!(polynomial.len(), 1);
    assert_eq!(polynomial.terms()[0].symbol, 2);

    // Terms referencing the reserved zero symbol contribute nothing.
    let zero_symbol = factory.from_terms(vec![Monomial::from_symbol(0)]);
    assert!(zero_symbol.is_empty());
}

// Test the add and scale functions of the PolynomialFactory
#[test]
fn add_and_scale() {
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let left = factory.from_terms(vec![Monomial::new(2, Complex64::new(1.0, 0.0), false)]);
    let right = factory.from_terms(vec![
        Monomial::new(2, Complex64::new(1.0, 0.0), false),
        Monomial::new(3, Complex64::new(0.5, 0.0), false),
    ]);

    let sum = factory.add(&left, &right);
    assert_eq!(sum.len(), 2);
    assert_eq!(sum.terms()[0].factor, Complex64::new(2.0, 0.0));

    let scaled = factory.scale(&sum, Complex64::new(0.0, 1.0));
    assert_eq!(scaled.terms()[0].factor, Complex64::new(0.0, 2.0));

    let cancelled = factory.add(&left, &factory.scale(&left, Complex64::new(-1.0, 0.0)));
    assert!(cancelled.is_empty());
}

// Test the tolerance-based equivalence of polynomials
#[test]
fn equivalence() {
    let factory = PolynomialFactory::new(1e-6).unwrap();
    let left = factory.from_terms(vec![Monomial::new(2, Complex64::new(1.0, 0.0), false)]);
    let right = factory.from_terms(vec![Monomial::new(2, Complex64::new(1.0 + 1e-9, 0.0), false)]);
    let different = factory.from_terms(vec![Monomial::new(2, Complex64::new(1.5, 0.0), false)]);

    assert!(factory.equivalent(&left, &right));
    assert!(!factory.equivalent(&left, &different));
}

// Test the conjugate function of the PolynomialFactory against the symbol table
#[test]
fn conjugate_resolves_hermiticity() {
    let context = MeasurementContext::new(&[vec![2, 2]]).unwrap();
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let mut table = SymbolTable::new();

    let hermitian = context.sequence([0]).unwrap();
    let (hermitian_id, _, _) = table.intern(&context, &hermitian);

    let word = context.sequence([0, 1]).unwrap();
    let (word_id, _, _) = table.intern(&context, &word);

    let polynomial = factory.from_terms(vec![
        Monomial::new(hermitian_id, Complex64::new(0.0, 2.0), false),
        Monomial::new(word_id, Complex64::new(1.0, 0.0), false),
    ]);
    let conjugated = factory.conjugate(&polynomial, &table);

    // The hermitian term keeps its orientation with a conjugated coefficient; the
    // non-hermitian term flips.
    let flipped: Vec<(SymbolId, bool)> = conjugated
        .iter()
        .map(|term| (term.symbol, term.conjugated))
        .collect();
    assert!(flipped.contains(&(hermitian_id, false)));
    assert!(flipped.contains(&(word_id, true)));
    let hermitian_term = conjugated
        .iter()
        .find(|term| term.symbol == hermitian_id)
        .unwrap();
    assert_eq!(hermitian_term.factor, Complex64::new(0.0, -2.0));
}

// Test serde round-trips of Polynomial
#[test]
fn serde_round_trip() {
    let factory = PolynomialFactory::new(1e-12).unwrap();
    let polynomial = factory.from_terms(vec![
        Monomial::new(2, Complex64::new(1.0, -1.0), false),
        Monomial::new(7, Complex64::new(0.0, 0.5), true),
    ]);

    let json = serde_json::to_string(&polynomial).unwrap();
    let restored: Polynomial = serde_json::from_str(&json).unwrap();
    assert_eq!(polynomial, restored);

    let bytes = bincode::serialize(&polynomial).unwrap();
    let restored: Polynomial = bincode::deserialize(&bytes).unwrap();
    assert_eq!(polynomial, restored);
}
