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

//! Integration test for inflation extended matrices and the extension suggester

use std::collections::BTreeSet;

use momenta::prelude::*;
use momenta::scenarios::inflation::{
    CausalNetwork, ExtendedMatrixIndex, InflationContext, InflationMatrixSystem,
};

const TOLERANCE: f64 = 1e-12;

fn triangle_system(inflation: usize) -> InflationMatrixSystem {
    let network = CausalNetwork::new(
        &[2, 2, 2],
        vec![
            BTreeSet::from([0, 1]),
            BTreeSet::from([1, 2]),
            BTreeSet::from([0, 2]),
        ],
    )
    .unwrap();
    let context = InflationContext::new(network, inflation).unwrap();
    InflationMatrixSystem::new(context, TOLERANCE).unwrap()
}

// Test the inflated-triangle moment matrix dimension at level 1
#[test]
fn triangle_moment_matrix_dimension() {
    let system = triangle_system(2);
    let matrix = system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    assert_eq!(matrix.dimension(), 13);
    assert!(matrix.is_hermitian());
}

// Test that the factor table tracks non-fundamental moment-matrix symbols
#[test]
fn factor_table_after_moment_matrix() {
    let system = triangle_system(2);
    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();

    system.with_factors(|factors| {
        system.with_symbols(|symbols| {
            assert_eq!(factors.len(), symbols.len());
        });
        // At least one entry factors non-trivially (e.g. A00 · A11).
        assert!(factors.iter().any(|entry| !entry.fundamental()));
        // Fundamental entries factor to themselves.
        for entry in factors.iter().filter(|entry| entry.fundamental()) {
            assert_eq!(entry.canonical_symbols, vec![entry.id]);
        }
        // The index tree round-trips composite factor lists.
        for entry in factors.iter().filter(|entry| !entry.fundamental()) {
            let mut key = entry.canonical_symbols.clone();
            key.sort_unstable();
            assert_eq!(factors.find_by_factors(&key), Some(entry.id));
        }
    });
}

// Test the extension suggester on the inflated triangle
#[test]
fn extension_suggestion() {
    let system = triangle_system(2);
    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();

    let suggested = system.suggest_extensions(1).unwrap();
    assert!(!suggested.is_empty());

    // Every suggested extension is a fundamental single-measurement symbol.
    system.with_factors(|factors| {
        for &extension in &suggested {
            let entry = factors.get(extension).unwrap();
            assert!(entry.fundamental());
        }
    });
    // At least one suggestion is a single-operator (single-copy, single-observable) moment.
    system.with_symbols(|symbols| {
        assert!(suggested.iter().any(|&extension| {
            symbols
                .get(extension)
                .and_then(|symbol| symbol.sequence())
                .map_or(false, |sequence| sequence.len() == 1)
        }));
    });
}

// Test the extended matrix: the top-left block equals the source moment matrix
#[test]
fn extended_matrix_embeds_source() {
    let system = triangle_system(2);
    let source = system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    let suggested = system.suggest_extensions(1).unwrap();

    let index = ExtendedMatrixIndex::new(1, suggested.iter().copied());
    let extended = system
        .extended_matrix(&index, MultithreadPolicy::Never)
        .unwrap();

    assert_eq!(
        extended.dimension(),
        source.dimension() + index.extension_list.len()
    );
    assert!(extended.is_hermitian());

    let source = source.as_monomial().unwrap();
    let extended = extended.as_monomial().unwrap();
    for row in 0..source.dimension() {
        for col in 0..source.dimension() {
            assert_eq!(extended.element(row, col), source.element(row, col));
        }
    }

    // Border entries carry plain symbol references.
    for row in source.dimension()..extended.dimension() {
        for col in 0..extended.dimension() {
            let entry = extended.element(row, col);
            assert!(!entry.conjugated);
            assert_eq!(extended.element(col, row), entry);
        }
    }
}

// Test that extended-matrix construction creates consistent factor records
#[test]
fn extended_matrix_factor_consistency() {
    let system = triangle_system(2);
    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    let suggested = system.suggest_extensions(1).unwrap();
    let index = ExtendedMatrixIndex::new(1, suggested.iter().copied());
    system
        .extended_matrix(&index, MultithreadPolicy::Never)
        .unwrap();

    system.with_factors(|factors| {
        system.with_symbols(|symbols| {
            assert_eq!(factors.len(), symbols.len());
            for entry in factors.iter() {
                for &factor in &entry.canonical_symbols {
                    assert!(factor < symbols.len());
                }
            }
        });
    });
}

// Test that repeated construction yields deterministic symbol assignment
#[test]
fn extended_matrix_deterministic() {
    let build = |policy: MultithreadPolicy| {
        let system = triangle_system(2);
        system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
        let suggested = system.suggest_extensions(1).unwrap();
        let index = ExtendedMatrixIndex::new(1, suggested.iter().copied());
        system.extended_matrix(&index, policy).unwrap();
        system
            .symbol_rows()
            .into_iter()
            .map(|row| (row.base.id, row.base.sequence, row.factor_symbols))
            .collect::<Vec<_>>()
    };

    let serial = build(MultithreadPolicy::Never);
    let parallel_one = build(MultithreadPolicy::Always);
    let parallel_two = build(MultithreadPolicy::Always);
    assert_eq!(serial, parallel_one);
    assert_eq!(parallel_one, parallel_two);
}

// Test that equivalent extension lists share one registry key
#[test]
fn extended_index_normalization() {
    let index_a = ExtendedMatrixIndex::new(1, [5, 3, 5]);
    let index_b = ExtendedMatrixIndex::new(1, [3, 5]);
    assert_eq!(index_a, index_b);

    let system = triangle_system(2);
    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    let suggested = system.suggest_extensions(1).unwrap();
    let index = ExtendedMatrixIndex::new(1, suggested.iter().copied());
    system
        .extended_matrix(&index, MultithreadPolicy::Never)
        .unwrap();

    let before = system.matrix_count();
    system
        .extended_matrix(&index, MultithreadPolicy::Never)
        .unwrap();
    assert_eq!(system.matrix_count(), before);
}

// Test the not-found diagnostics of the extended-matrix registry
#[test]
fn extended_matrix_not_found() {
    let system = triangle_system(2);
    let index = ExtendedMatrixIndex::new(1, [2]);

    let missing = system.get_extended_matrix(&index);
    match missing {
        Err(MomentaError::NotFound { msg }) => {
            assert!(msg.contains("has not yet been generated"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }

    system.moment_matrix(1, MultithreadPolicy::Never).unwrap();
    let missing = system.get_extended_matrix(&index);
    match missing {
        Err(MomentaError::NotFound { msg }) => {
            assert!(msg.contains("extended by symbols #2"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}
