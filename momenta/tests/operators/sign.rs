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

//! Integration test for public API of SequenceSign

use momenta::operators::SequenceSign;
use num_complex::Complex64;
use serde_test::{assert_tokens, Token};
use test_case::test_case;

// Test the multiplication function of SequenceSign (the cyclic 4-group)
#[test_case(SequenceSign::Positive, SequenceSign::Positive, SequenceSign::Positive; "plus times plus")]
#[test_case(SequenceSign::Imaginary, SequenceSign::Imaginary, SequenceSign::Negative; "i squared")]
#[test_case(SequenceSign::Imaginary, SequenceSign::Negative, SequenceSign::NegativeImaginary; "i times minus")]
#[test_case(SequenceSign::NegativeImaginary, SequenceSign::Imaginary, SequenceSign::Positive; "minus i times i")]
#[test_case(SequenceSign::Negative, SequenceSign::Negative, SequenceSign::Positive; "minus squared")]
fn multiplication(left: SequenceSign, right: SequenceSign, expected: SequenceSign) {
    assert_eq!(left * right, expected);
}

// Test the conjugate function of SequenceSign
#[test]
fn conjugation() {
    assert_eq!(SequenceSign::Positive.conjugate(), SequenceSign::Positive);
    assert_eq!(SequenceSign::Negative.conjugate(), SequenceSign::Negative);
    assert_eq!(SequenceSign::Imaginary.conjugate(), SequenceSign::NegativeImaginary);
    assert_eq!(SequenceSign::NegativeImaginary.conjugate(), SequenceSign::Imaginary);
}

// Test the negate and predicate functions of SequenceSign
#[test]
fn negation_and_predicates() {
    assert_eq!(SequenceSign::Positive.negate(), SequenceSign::Negative);
    assert_eq!(SequenceSign::Imaginary.negate(), SequenceSign::NegativeImaginary);

    assert!(SequenceSign::Imaginary.is_imaginary());
    assert!(SequenceSign::NegativeImaginary.is_imaginary());
    assert!(!SequenceSign::Positive.is_imaginary());

    assert!(SequenceSign::Negative.is_negative());
    assert!(SequenceSign::NegativeImaginary.is_negative());
    assert!(!SequenceSign::Imaginary.is_negative());
}

// Test the complex scalar value of each sign
#[test]
fn as_complex() {
    assert_eq!(SequenceSign::Positive.as_complex(), Complex64::new(1.0, 0.0));
    assert_eq!(SequenceSign::Imaginary.as_complex(), Complex64::new(0.0, 1.0));
    assert_eq!(SequenceSign::Negative.as_complex(), Complex64::new(-1.0, 0.0));
    assert_eq!(
        SequenceSign::NegativeImaginary.as_complex(),
        Complex64::new(0.0, -1.0)
    );
}

// Test the Display implementation of SequenceSign
#[test]
fn display() {
    assert_eq!(format!("{}", SequenceSign::Positive), "");
    assert_eq!(format!("{}", SequenceSign::Imaginary), "i");
    assert_eq!(format!("{}", SequenceSign::Negative), "-");
    assert_eq!(format!("{}", SequenceSign::NegativeImaginary), "-i");
}

// Test the serde serialization of SequenceSign
#[test]
fn serde_tokens() {
    assert_tokens(
        &SequenceSign::Imaginary,
        &[Token::UnitVariant {
            name: "SequenceSign",
            variant: "Imaginary",
        }],
    );
}
