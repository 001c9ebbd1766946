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

//! Integration test for public API of SymbolTable

use momenta::prelude::*;
use momenta::scenarios::MeasurementContext;

fn chsh() -> MeasurementContext {
    MeasurementContext::new(&[vec![2, 2], vec![2, 2]]).unwrap()
}

// Test the reserved symbols 0 and 1
#[test]
fn reserved_symbols() {
    let table = SymbolTable::new();
    assert_eq!(table.len(), 2);
    assert!(table.is_empty());

    let zero = table.get(0).unwrap();
    assert!(zero.sequence().unwrap().is_zero());
    assert!(zero.is_hermitian());
    assert_eq!(zero.real_basis(), None);
    assert_eq!(zero.imaginary_basis(), None);

    let one = table.get(1).unwrap();
    assert!(one.sequence().unwrap().is_empty());
    assert!(!one.sequence().unwrap().is_zero());
    assert!(one.is_hermitian());
    assert_eq!(one.real_basis(), Some(0));
    assert_eq!(one.imaginary_basis(), None);

    assert_eq!(table.find(0), Some((0, false)));
    assert_eq!(table.find(1), Some((1, false)));
}

// Test the intern function of the SymbolTable for a hermitian sequence
#[test]
fn intern_hermitian() {
    let context = chsh();
    let mut table = SymbolTable::new();

    let a0 = context.sequence([0]).unwrap();
    let (id, conjugated, was_new) = table.intern(&context, &a0);
    assert_eq!(id, 2);
    assert!(!conjugated);
    assert!(was_new);

    let symbol = table.get(id).unwrap();
    assert!(symbol.is_hermitian());
    assert_eq!(symbol.real_basis(), Some(1));
    assert_eq!(symbol.imaginary_basis(), None);

    // Interning again is a no-op.
    assert_eq!(table.intern(&context, &a0), (2, false, false));
    assert_eq!(table.len(), 3);
}

// Test the hash-index invariant: both the sequence and its conjugate resolve to the symbol
#[test]
fn intern_registers_both_orientations() {
    let context = chsh();
    let mut table = SymbolTable::new();

    // A0.0 then A1.0 on the same party do not commute: the word is non-hermitian.
    let word = context.sequence([0, 1]).unwrap();
    let conjugate = context.conjugate(&word);
    assert_ne!(word, conjugate);

    let (id, conjugated, was_new) = table.intern(&context, &word);
    assert!(was_new);
    assert!(!conjugated);

    assert_eq!(table.find(word.hash()), Some((id, false)));
    assert_eq!(table.find(conjugate.hash()), Some((id, true)));

    let symbol = table.get(id).unwrap();
    assert!(!symbol.is_hermitian());
    assert_eq!(symbol.imaginary_basis(), Some(0));

    // Interning the conjugate finds the existing symbol, flagged as conjugated.
    assert_eq!(table.intern(&context, &conjugate), (id, true, false));
    assert_eq!(table.len(), 3);
}

// Test that the zero sequence always maps to symbol 0
#[test]
fn intern_zero() {
    // Orthogonal outcomes of one three-outcome measurement annihilate.
    let context = MeasurementContext::new(&[vec![3]]).unwrap();
    let mut table = SymbolTable::new();
    let word = context.sequence([0, 1]).unwrap();
    assert!(word.is_zero());
    assert_eq!(table.intern(&context, &word), (0, false, false));
}

// Test that basis indices form dense enumerations
#[test]
fn dense_basis_indices() {
    let context = chsh();
    let mut table = SymbolTable::new();

    let words = [vec![0u32], vec![2], vec![0, 2], vec![0, 1], vec![1, 0]];
    for word in &words {
        let sequence = context.sequence(word.iter().copied()).unwrap();
        table.intern(&context, &sequence);
    }

    let real_indices: Vec<usize> = table.iter().filter_map(|symbol| symbol.real_basis()).collect();
    let imaginary_indices: Vec<usize> = table
        .iter()
        .filter_map(|symbol| symbol.imaginary_basis())
        .collect();

    assert_eq!(real_indices, (0..table.real_basis_count()).collect::<Vec<_>>());
    assert_eq!(
        imaginary_indices,
        (0..table.imaginary_basis_count()).collect::<Vec<_>>()
    );
    // A0.0 A1.0 and its reverse are one conjugate pair: one imaginary basis element.
    assert_eq!(table.imaginary_basis_count(), 1);
}

// Test the export rows of the SymbolTable
#[test]
fn rows() {
    let context = chsh();
    let mut table = SymbolTable::new();
    let a0 = context.sequence([0]).unwrap();
    table.intern(&context, &a0);

    let rows = table.rows(&context);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].sequence, "0");
    assert_eq!(rows[1].sequence, "1");
    assert_eq!(rows[2].sequence, "A0.0");
    assert!(rows[2].hermitian);
    assert_eq!(rows[2].real_basis, Some(1));
}
