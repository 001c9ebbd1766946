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

use num_complex::Complex64;

use crate::operators::{OperatorSequence, SequenceSign};
use crate::symbols::{Monomial, Polynomial, PolynomialFactory, SymbolTable};
use crate::{Context, MomentaError};

/// A 'raw' polynomial: operator sequences with complex weights, before symbols are known.
///
/// This is the pre-symbolic form used while matrices are under construction, where moment
/// aliasing means several raw sequences may resolve to the same symbol. Any sign carried by a
/// pushed sequence is absorbed into its weight, so stored sequences are positive-signed.
#[derive(Debug, Clone, Default)]
pub struct RawPolynomial {
    data: Vec<(OperatorSequence, Complex64)>,
}

impl RawPolynomial {
    /// Creates an empty raw polynomial.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Appends a weighted sequence, folding the sequence's sign tag into the weight.
    ///
    /// Zero sequences contribute nothing and are dropped.
    pub fn push(&mut self, sequence: OperatorSequence, weight: Complex64) {
        if sequence.is_zero() {
            return;
        }
        let weight = weight * sequence.sign().as_complex();
        self.data
            .push((sequence.with_sign(SequenceSign::Positive), weight));
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no terms are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterator over (sequence, weight) pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, (OperatorSequence, Complex64)> {
        self.data.iter()
    }

    /// Reconstructs a raw polynomial from a symbolic polynomial and its symbol table.
    ///
    /// # Returns
    ///
    /// * `Ok(RawPolynomial)` - Sequence/weight pairs for each monomial.
    /// * `Err(MomentaError::UnknownSymbol)` - A referenced symbol does not exist.
    /// * `Err(MomentaError::NoSequenceRealization)` - A term references a sequence-less symbol.
    pub fn from_polynomial(
        polynomial: &Polynomial,
        symbols: &SymbolTable,
    ) -> Result<Self, MomentaError> {
        let mut output = Self::new();
        for term in polynomial.iter() {
            let symbol = symbols
                .get(term.symbol)
                .ok_or(MomentaError::UnknownSymbol {
                    symbol: term.symbol,
                })?;
            let sequence = if term.conjugated {
                symbol.conjugate_sequence()
            } else {
                symbol.sequence()
            }
            .ok_or(MomentaError::NoSequenceRealization {
                symbol: term.symbol,
            })?
            .clone();
            output.push(sequence, term.factor);
        }
        Ok(output)
    }

    /// Resolves every sequence to its symbol and assembles a symbolic polynomial.
    ///
    /// Sequences are simplified as moments before lookup, so aliasing sequences merge onto
    /// their shared symbol.
    ///
    /// # Returns
    ///
    /// * `Ok(Polynomial)` - The symbolic form.
    /// * `Err(MomentaError::UnregisteredOperatorSequence)` - A sequence has no symbol.
    pub fn to_polynomial<C: Context>(
        &self,
        context: &C,
        factory: &PolynomialFactory,
        symbols: &SymbolTable,
    ) -> Result<Polynomial, MomentaError> {
        let mut terms = Vec::with_capacity(self.data.len());
        for (sequence, weight) in &self.data {
            let moment = context.simplify_as_moment(sequence);
            if moment.is_zero() {
                continue;
            }
            let (id, conjugated) = symbols.find(moment.hash()).ok_or_else(|| {
                MomentaError::UnregisteredOperatorSequence {
                    sequence: context.format_sequence(sequence),
                }
            })?;
            terms.push(Monomial::new(
                id,
                weight * moment.sign().as_complex(),
                conjugated,
            ));
        }
        Ok(factory.from_terms(terms))
    }

    /// As [RawPolynomial::to_polynomial], but interning any missing symbols first.
    pub fn to_polynomial_register_symbols<C: Context>(
        &self,
        context: &C,
        factory: &PolynomialFactory,
        symbols: &mut SymbolTable,
    ) -> Polynomial {
        let mut terms = Vec::with_capacity(self.data.len());
        for (sequence, weight) in &self.data {
            let moment = context.simplify_as_moment(sequence);
            if moment.is_zero() {
                continue;
            }
            let (id, conjugated, _) = symbols.intern(context, &moment);
            terms.push(Monomial::new(
                id,
                weight * moment.sign().as_complex(),
                conjugated,
            ));
        }
        factory.from_terms(terms)
    }

    /// Formats the raw polynomial through a context.
    pub fn to_string<C: Context>(&self, context: &C) -> String {
        if self.data.is_empty() {
            return "0".to_string();
        }
        self.data
            .iter()
            .map(|(sequence, weight)| format!("{}*{}", weight, context.format_sequence(sequence)))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Distributes a pairwise sequence product over two raw polynomials.
///
/// Every pair of terms is combined through `product`; pairs whose combined weight falls below
/// the zero tolerance, or whose product vanishes, are dropped.
pub fn distributed_product(
    lhs: &RawPolynomial,
    rhs: &RawPolynomial,
    mut product: impl FnMut(&OperatorSequence, &OperatorSequence) -> OperatorSequence,
    zero_tolerance: f64,
) -> RawPolynomial {
    let mut output = RawPolynomial::new();
    for (lhs_sequence, lhs_weight) in lhs.iter() {
        for (rhs_sequence, rhs_weight) in rhs.iter() {
            let weight = lhs_weight * rhs_weight;
            if weight.norm() <= zero_tolerance {
                continue;
            }
            let sequence = product(lhs_sequence, rhs_sequence);
            output.push(sequence, weight);
        }
    }
    output
}
