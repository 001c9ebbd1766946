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

use std::cmp::Ordering;
use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::symbols::{Monomial, SymbolTable};
use crate::MomentaError;

/// A symbolic polynomial: an ordered list of monomials over symbol ids.
///
/// The canonical ordering (ascending symbol id, conjugated terms after plain terms) and the
/// numeric-zero pruning are enforced by the [PolynomialFactory] that built the polynomial;
/// polynomials are never mutated directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polynomial {
    terms: Vec<Monomial>,
}

impl Polynomial {
    /// The empty (zero) polynomial.
    pub fn empty() -> Self {
        Self { terms: Vec::new() }
    }

    /// A polynomial consisting of a single monomial.
    pub fn from_monomial(monomial: Monomial) -> Self {
        if monomial.is_zero_symbol() {
            return Self::empty();
        }
        Self {
            terms: vec![monomial],
        }
    }

    /// The ordered terms of the polynomial.
    pub fn terms(&self) -> &[Monomial] {
        &self.terms
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if the polynomial has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterator over the terms.
    pub fn iter(&self) -> std::slice::Iter<'_, Monomial> {
        self.terms.iter()
    }

    pub(crate) fn from_ordered_terms(terms: Vec<Monomial>) -> Self {
        Self { terms }
    }
}

impl Eq for Polynomial {}

/// Implements Ord for Polynomial: term keys first, then coefficients by total order.
///
/// Used where polynomials act as registry keys (polynomial localizing matrix indices); the
/// ordering is total and consistent with equality of canonically ordered polynomials.
impl Ord for Polynomial {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs_keys = self.terms.iter().map(Monomial::key);
        let rhs_keys = other.terms.iter().map(Monomial::key);
        match lhs_keys.cmp(rhs_keys) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        for (lhs, rhs) in self.terms.iter().zip(other.terms.iter()) {
            match lhs
                .factor
                .re
                .total_cmp(&rhs.factor.re)
                .then_with(|| lhs.factor.im.total_cmp(&rhs.factor.im))
            {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Polynomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Implements the format function (Display trait) of Polynomial.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (position, term) in self.terms.iter().enumerate() {
            if position > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// Builder and arithmetic provider for [Polynomial]s, carrying the numeric zero tolerance.
///
/// All polynomial construction funnels through the factory so that the canonical term order
/// and the tolerance-based pruning hold for every polynomial in a matrix system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFactory {
    zero_tolerance: f64,
}

impl PolynomialFactory {
    /// Creates a factory with the given zero tolerance.
    ///
    /// # Arguments
    ///
    /// * `zero_tolerance` - Coefficients with modulus at or below this value are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(PolynomialFactory)` - The new factory.
    /// * `Err(MomentaError::NonPositiveTolerance)` - The tolerance was not strictly positive.
    pub fn new(zero_tolerance: f64) -> Result<Self, MomentaError> {
        if !(zero_tolerance > 0.0) {
            return Err(MomentaError::NonPositiveTolerance {
                tolerance: zero_tolerance,
            });
        }
        Ok(Self { zero_tolerance })
    }

    /// The numeric zero tolerance of the factory.
    pub fn zero_tolerance(&self) -> f64 {
        self.zero_tolerance
    }

    /// True if a coefficient counts as numerically zero.
    pub fn is_zero(&self, factor: Complex64) -> bool {
        factor.norm() <= self.zero_tolerance
    }

    /// Builds a polynomial from arbitrary terms: orders, merges duplicate keys, prunes zeros.
    pub fn from_terms(&self, mut terms: Vec<Monomial>) -> Polynomial {
        terms.retain(|term| !term.is_zero_symbol());
        terms.sort_by_key(Monomial::key);

        let mut merged: Vec<Monomial> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged.last_mut() {
                Some(last) if last.key() == term.key() => last.factor += term.factor,
                _ => merged.push(term),
            }
        }
        merged.retain(|term| !self.is_zero(term.factor));
        Polynomial::from_ordered_terms(merged)
    }

    /// Adds two polynomials.
    pub fn add(&self, lhs: &Polynomial, rhs: &Polynomial) -> Polynomial {
        let mut terms = Vec::with_capacity(lhs.len() + rhs.len());
        terms.extend_from_slice(lhs.terms());
        terms.extend_from_slice(rhs.terms());
        self.from_terms(terms)
    }

    /// Multiplies a polynomial by a scalar.
    pub fn scale(&self, polynomial: &Polynomial, factor: Complex64) -> Polynomial {
        let terms = polynomial
            .iter()
            .map(|term| Monomial::new(term.symbol, term.factor * factor, term.conjugated))
            .collect();
        self.from_terms(terms)
    }

    /// Sums an iterator of polynomials.
    pub fn sum<'a>(&self, polynomials: impl IntoIterator<Item = &'a Polynomial>) -> Polynomial {
        let mut terms = Vec::new();
        for polynomial in polynomials {
            terms.extend_from_slice(polynomial.terms());
        }
        self.from_terms(terms)
    }

    /// Conjugates a polynomial, resolving hermitian symbols through the table.
    pub fn conjugate(&self, polynomial: &Polynomial, symbols: &SymbolTable) -> Polynomial {
        let terms = polynomial
            .iter()
            .map(|term| {
                let hermitian = symbols
                    .get(term.symbol)
                    .map(|symbol| symbol.is_hermitian())
                    .unwrap_or(false);
                let conjugated = if hermitian {
                    term.conjugated
                } else {
                    !term.conjugated
                };
                Monomial::new(term.symbol, term.factor.conj(), conjugated)
            })
            .collect();
        self.from_terms(terms)
    }

    /// True if two polynomials agree within the factory's tolerance.
    pub fn equivalent(&self, lhs: &Polynomial, rhs: &Polynomial) -> bool {
        if lhs.len() != rhs.len() {
            // Differing term counts can still be equivalent when a coefficient straddles the
            // tolerance, so fall back on the difference test.
            return self.difference_is_zero(lhs, rhs);
        }
        lhs.iter().zip(rhs.iter()).all(|(a, b)| {
            a.key() == b.key() && self.is_zero(a.factor - b.factor)
        }) || self.difference_is_zero(lhs, rhs)
    }

    fn difference_is_zero(&self, lhs: &Polynomial, rhs: &Polynomial) -> bool {
        let negated = self.scale(rhs, Complex64::new(-1.0, 0.0));
        self.add(lhs, &negated).is_empty()
    }
}
