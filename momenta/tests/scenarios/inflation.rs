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

//! Integration test for public API of the inflation scenario

use std::collections::BTreeSet;

use momenta::prelude::*;
use momenta::scenarios::inflation::{CausalNetwork, InflationContext, OVIndex};

/// The triangle: three two-outcome observables, pairwise connected by three sources.
fn triangle() -> CausalNetwork {
    CausalNetwork::new(
        &[2, 2, 2],
        vec![
            BTreeSet::from([0, 1]),
            BTreeSet::from([1, 2]),
            BTreeSet::from([0, 2]),
        ],
    )
    .unwrap()
}

fn inflated_triangle(inflation: usize) -> InflationContext {
    InflationContext::new(triangle(), inflation).unwrap()
}

// Test the validation errors of CausalNetwork and InflationContext
#[test]
fn construction_errors() {
    assert!(matches!(
        CausalNetwork::new(&[], vec![]),
        Err(MomentaError::EmptyObservableList)
    ));
    assert!(matches!(
        CausalNetwork::new(&[2], vec![BTreeSet::from([3])]),
        Err(MomentaError::SourceOutOfRange {
            source_id: 0,
            observable: 3,
        })
    ));
    assert!(matches!(
        InflationContext::new(triangle(), 0),
        Err(MomentaError::ZeroInflationLevel)
    ));
}

// Test that singleton observables receive implicit sources
#[test]
fn singleton_implicit_sources() {
    let network = CausalNetwork::new(&[2, 2], vec![BTreeSet::from([0])]).unwrap();
    assert_eq!(network.explicit_source_count(), 1);
    assert_eq!(network.implicit_source_count(), 1);

    let lonely = &network.observables()[1];
    assert!(lonely.singleton);
    assert_eq!(lonely.sources.len(), 1);
    // Singletons are never replicated by inflation.
    assert_eq!(lonely.count_copies(3), 1);
}

// Test the operator layout of the inflated triangle
#[test]
fn operator_layout() {
    let context = inflated_triangle(2);
    // Each observable has one operator per variant and 2^2 variants.
    assert_eq!(context.operator_count(), 12);
    assert_eq!(context.observable_variant_count(), 12);
    assert_eq!(context.operator_number(0, 0, 0), 0);
    assert_eq!(context.operator_number(1, 0, 0), 4);
    assert_eq!(context.operator_number(2, 3, 0), 11);

    let single = inflated_triangle(1);
    assert_eq!(single.operator_count(), 3);
}

// Test commutation, idempotence and orthogonality of inflation operators
#[test]
fn algebraic_rules() {
    let context = InflationContext::new(
        CausalNetwork::new(&[3, 2], vec![BTreeSet::from([0, 1])]).unwrap(),
        1,
    )
    .unwrap();
    // Observable A has two operators (outcomes 0 and 1).
    let a0 = context.operator_number(0, 0, 0);
    let a1 = context.operator_number(0, 0, 1);
    let b = context.operator_number(1, 0, 0);

    // Operators commute into sorted order.
    let word = context.sequence([b, a0]).unwrap();
    assert_eq!(word.operators(), &[a0, b]);

    // Idempotence.
    let squared = context.sequence([a0, a0]).unwrap();
    assert_eq!(squared.operators(), &[a0]);

    // Orthogonality of distinct outcomes.
    assert!(context.sequence([a0, a1]).unwrap().is_zero());
}

// Test the factorization of A00 · C11 into two source-disjoint factors
#[test]
fn factorize_disjoint_pair() {
    let context = inflated_triangle(2);
    let a00 = context.operator_number(0, 0, 0);
    // C's variant with both source indices 1 has flat index 3.
    let c11 = context.operator_number(2, 3, 0);

    let word = context.sequence([a00, c11]).unwrap();
    let factors = context.factorize(&word);
    assert_eq!(factors.len(), 2);
    assert_eq!(factors[0].operators(), &[a00]);
    assert_eq!(factors[1].operators(), &[c11]);

    // The factors are independent in the source graph.
    let a_variant = &context.observables()[0].variants[0];
    let c_variant = &context.observables()[2].variants[3];
    assert!(a_variant.independent(c_variant));
}

// Test that connected words do not factorize
#[test]
fn factorize_connected_word() {
    let context = inflated_triangle(2);
    let a00 = context.operator_number(0, 0, 0);
    let b00 = context.operator_number(1, 0, 0);

    // A00 and B00 share source 1 (variant 0).
    let word = context.sequence([a00, b00]).unwrap();
    let factors = context.factorize(&word);
    assert_eq!(factors.len(), 1);
    assert_eq!(factors[0].operators(), word.operators());
}

// Test that the factor product spans the input sequence
#[test]
fn factorization_covers_input() {
    let context = inflated_triangle(2);
    let a00 = context.operator_number(0, 0, 0);
    let b11 = context.operator_number(1, 3, 0);
    let c01 = context.operator_number(2, 2, 0);

    let word = context.sequence([a00, b11, c01]).unwrap();
    let factors = context.factorize(&word);

    let mut recovered: Vec<OperatorId> = factors
        .iter()
        .flat_map(|factor| factor.operators().iter().copied())
        .collect();
    recovered.sort_unstable();
    assert_eq!(&recovered[..], word.operators());

    // Any two factors share no source.
    for (first, second) in [(0, 1), (0, 2), (1, 2)] {
        if factors.len() > second {
            let lhs: BTreeSet<_> = factors[first]
                .operators()
                .iter()
                .flat_map(|&oper| {
                    let info = &context.operator_info()[oper as usize];
                    context.observables()[info.observable].variants[info.variant]
                        .connected_sources
                        .iter()
                        .copied()
                        .collect::<Vec<_>>()
                })
                .collect();
            let rhs: BTreeSet<_> = factors[second]
                .operators()
                .iter()
                .flat_map(|&oper| {
                    let info = &context.operator_info()[oper as usize];
                    context.observables()[info.observable].variants[info.variant]
                        .connected_sources
                        .iter()
                        .copied()
                        .collect::<Vec<_>>()
                })
                .collect();
            assert!(lhs.intersection(&rhs).next().is_none());
        }
    }
}

// Test the canonical moment relabelling of source variants
#[test]
fn canonical_moment_relabels_sources() {
    let context = inflated_triangle(2);
    // A single operator on any variant relabels to variant 0.
    for variant in 0..4 {
        let oper = context.operator_number(0, variant, 0);
        let word = context.sequence([oper]).unwrap();
        let moment = context.canonical_moment(&word);
        assert_eq!(moment.operators(), &[context.operator_number(0, 0, 0)]);
    }

    // Canonicalization is idempotent.
    let a01 = context.operator_number(0, 1, 0);
    let b11 = context.operator_number(1, 3, 0);
    let word = context.sequence([a01, b11]).unwrap();
    let once = context.canonical_moment(&word);
    let twice = context.canonical_moment(&once);
    assert_eq!(once, twice);
}

// Test the canonical variant strings
#[test]
fn canonical_variants() {
    let context = inflated_triangle(2);
    let relabelled = context.canonical_variants(&[OVIndex::new(0, 3)]);
    assert_eq!(relabelled, vec![OVIndex::new(0, 0)]);

    // Repeated projective variants collapse.
    let collapsed = context.canonical_variants(&[OVIndex::new(0, 1), OVIndex::new(0, 1)]);
    assert_eq!(collapsed.len(), 1);
}

// Test the formatted output of inflation sequences
#[test]
fn formatting() {
    let context = inflated_triangle(2);
    let a00 = context.operator_number(0, 0, 0);
    let c11 = context.operator_number(2, 3, 0);
    let word = context.sequence([a00, c11]).unwrap();
    assert_eq!(context.format_sequence(&word), "A00;C11");

    let single = inflated_triangle(1);
    let word = single.sequence([0, 1]).unwrap();
    assert_eq!(single.format_sequence(&word), "A;B");
}

// Test the Display summary of the inflated scenario
#[test]
fn display() {
    let context = inflated_triangle(2);
    let rendered = format!("{}", context);
    assert!(rendered.contains("12 operators"));
    assert!(rendered.contains("Inflation level: 2"));
    assert!(rendered.contains("Causal network with 3 observables and 3 sources."));
}
