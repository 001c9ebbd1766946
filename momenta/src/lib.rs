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

//! momenta
//!
//! Symbolic operator-algebra engine for non-commutative polynomial optimization.
//!
//! A scenario (a set of operators, algebraic relations and symmetries) is described by a
//! [Context]. From a context, moment matrices, localizing matrices and further constraint
//! matrices are assembled whose entries reference interned symbols rather than raw operator
//! strings. The resulting matrices and symbol tables feed downstream semidefinite programs.

use std::fmt;

use thiserror::Error;

pub mod dictionary;
pub mod matrices;
pub mod operators;
pub mod prelude;
pub mod scenarios;
pub mod symbols;
pub mod system;
pub mod utilities;

use crate::dictionary::OperatorSequenceGenerator;
use crate::operators::{OperatorSequence, SequenceSign, SequenceStorage, ShortlexHasher};

/// Name of a single operator within a context; semantically opaque outside its owning context.
pub type OperatorId = u32;

/// Identity of an interned symbol. IDs 0 and 1 are reserved for zero and the identity.
pub type SymbolId = usize;

/// Errors that can occur in momenta.
#[derive(Debug, Error, PartialEq)]
pub enum MomentaError {
    /// Error when a causal network is created without any observables.
    #[error("A causal network requires at least one observable.")]
    EmptyObservableList,
    /// Error when a source of a causal network references an observable that does not exist.
    #[error("Source {source_id:?} maps to out of bound observable {observable:?}.")]
    SourceOutOfRange {
        /// Source whose observable list is out of range.
        source_id: usize,
        /// The offending observable reference.
        observable: usize,
    },
    /// Error when a causal network is inflated zero times.
    #[error("Inflation level must be at least 1.")]
    ZeroInflationLevel,
    /// Error when a Pauli scenario is created without qubits.
    #[error("A Pauli scenario requires at least one qubit.")]
    EmptyQubitRegister,
    /// Error when a measurement of a multi-party scenario declares no outcomes.
    #[error("Measurement {measurement:?} of party {party:?} must have at least one outcome.")]
    ZeroOutcomeMeasurement {
        /// Party the measurement belongs to.
        party: usize,
        /// Index of the measurement within the party.
        measurement: usize,
    },
    /// Error when an operator reference does not exist within its context.
    #[error("Operator {operator:?} is out of range for a context of {operator_count:?} operators.")]
    OperatorOutOfRange {
        /// The offending operator.
        operator: OperatorId,
        /// Number of operators in the context.
        operator_count: usize,
    },
    /// Error when an operator string is too long for the context's hasher.
    #[error("Sequence of length {length:?} exceeds the longest hashable word ({longest_hashable:?}) of this context.")]
    SequenceTooLong {
        /// Length of the rejected sequence.
        length: usize,
        /// Longest word the hasher can represent without overflow.
        longest_hashable: usize,
    },
    /// Error when a polynomial factory is given a non-positive zero tolerance.
    #[error("Zero tolerance must be strictly positive (got {tolerance:?}).")]
    NonPositiveTolerance {
        /// The rejected tolerance.
        tolerance: f64,
    },
    /// Error when a polynomial references an operator sequence with no interned symbol.
    #[error("Operator sequence \"{sequence}\" has not been registered in the symbol table.")]
    UnregisteredOperatorSequence {
        /// Formatted representation of the offending sequence.
        sequence: String,
    },
    /// Error when a symbol reference does not exist in the symbol table.
    #[error("Symbol {symbol:?} does not exist in the symbol table.")]
    UnknownSymbol {
        /// The offending symbol id.
        symbol: SymbolId,
    },
    /// Error when a symbol without an operator-sequence realization is used as a word.
    #[error("Symbol {symbol:?} has no operator-sequence realization.")]
    NoSequenceRealization {
        /// The sequence-less symbol.
        symbol: SymbolId,
    },
    /// Error when a derived table is queried before it has been generated.
    #[error("Component not yet generated: {component}")]
    MissingComponent {
        /// Name of the missing component.
        component: String,
    },
    /// Error when a matrix registry lookup fails.
    #[error("{msg}")]
    NotFound {
        /// Scenario-specific diagnostic message.
        msg: String,
    },
    /// Error when a matrix of one kind is accessed as another.
    #[error("Expected a {expected} matrix, but found a {found} matrix.")]
    BadCast {
        /// The requested matrix kind.
        expected: String,
        /// The actual matrix kind.
        found: String,
    },
    /// Error when a nearest-neighbour restriction is not supported for the requested word length.
    #[error("Nearest-neighbour words of length {word_length:?} are not supported on lattices.")]
    UnsupportedLatticeWords {
        /// The rejected word length.
        word_length: usize,
    },
    /// Error when a next-nearest-neighbour restriction is requested on a lattice.
    #[error("Neighbour radius {neighbours:?} is not supported on lattices; only nearest neighbours are.")]
    UnsupportedLatticeNeighbours {
        /// The rejected neighbour radius.
        neighbours: usize,
    },
    /// Error when matrices of different dimension are combined.
    #[error("Matrix dimension mismatch: expected {expected:?}, found {found:?}.")]
    MismatchedDimension {
        /// Dimension required by the composition.
        expected: usize,
        /// Dimension actually found.
        found: usize,
    },
    /// Gerneric Error in momenta.
    #[error("Error occured: {msg}")]
    GenericError {
        /// Error message
        msg: String,
    },
}

/// Trait for scenarios: canonicalization, commutation, conjugation and hashing of operator
/// sequences all live behind this interface.
///
/// A context is immutable once constructed and is shared read-only between the symbol table,
/// the dictionary and every matrix that refers to it. All scenario rewrite rules are applied
/// through [Context::additional_simplification]; the provided methods drive it.
pub trait Context: fmt::Display + Send + Sync {
    /// Total number of distinct operators in the context.
    fn operator_count(&self) -> usize;

    /// The shortlex hasher attached to this context.
    fn hasher(&self) -> &ShortlexHasher;

    /// Applies the scenario's rewrite rules to a raw operator string, adjusting the sign tag
    /// where the rules move factors of ±1, ±i between the string and its coefficient.
    ///
    /// # Returns
    ///
    /// * `true` - The string simplifies to algebraic zero.
    /// * `false` - The string (now in canonical form) is non-zero.
    fn additional_simplification(
        &self,
        _operators: &mut SequenceStorage,
        _sign: &mut SequenceSign,
    ) -> bool {
        false
    }

    /// True if the context can generate operator strings not equal to their own conjugate.
    fn can_be_nonhermitian(&self) -> bool {
        true
    }

    /// Canonicalizes an already bounds-checked operator string.
    fn canonicalize(&self, mut operators: SequenceStorage, mut sign: SequenceSign) -> OperatorSequence {
        if self.additional_simplification(&mut operators, &mut sign) {
            return OperatorSequence::zero();
        }
        let hash = self.hasher().hash(&operators);
        OperatorSequence::from_raw_parts(operators, hash, sign)
    }

    /// Constructs a canonical operator sequence from raw operator names.
    ///
    /// # Arguments
    ///
    /// * `operators` - The raw operator string, in scenario-specific operator numbering.
    ///
    /// # Returns
    ///
    /// * `Ok(OperatorSequence)` - The canonical form of the input string.
    /// * `Err(MomentaError::OperatorOutOfRange)` - An operator does not exist in this context.
    /// * `Err(MomentaError::SequenceTooLong)` - The string exceeds the hashable word length.
    fn sequence(
        &self,
        operators: impl IntoIterator<Item = OperatorId>,
    ) -> Result<OperatorSequence, MomentaError>
    where
        Self: Sized,
    {
        let storage: SequenceStorage = operators.into_iter().collect();
        if storage.len() > self.hasher().longest_hashable() {
            return Err(MomentaError::SequenceTooLong {
                length: storage.len(),
                longest_hashable: self.hasher().longest_hashable(),
            });
        }
        for &op in storage.iter() {
            if (op as usize) >= self.operator_count() {
                return Err(MomentaError::OperatorOutOfRange {
                    operator: op,
                    operator_count: self.operator_count(),
                });
            }
        }
        Ok(self.canonicalize(storage, SequenceSign::Positive))
    }

    /// Returns the canonical sequence for a raw string only if no rewrite was necessary.
    fn get_if_canonical(&self, raw: &[OperatorId]) -> Option<OperatorSequence> {
        let storage: SequenceStorage = raw.iter().copied().collect();
        let canonical = self.canonicalize(storage, SequenceSign::Positive);
        if !canonical.is_zero()
            && canonical.sign() == SequenceSign::Positive
            && canonical.operators() == raw
        {
            Some(canonical)
        } else {
            None
        }
    }

    /// Multiplies two canonical sequences into a canonical product.
    ///
    /// The default implementation concatenates and re-canonicalizes; scenarios with faster
    /// merge rules override this.
    fn multiply(&self, lhs: &OperatorSequence, rhs: &OperatorSequence) -> OperatorSequence {
        if lhs.is_zero() || rhs.is_zero() {
            return OperatorSequence::zero();
        }
        let mut operators: SequenceStorage = lhs.operators().iter().copied().collect();
        operators.extend(rhs.operators().iter().copied());
        self.canonicalize(operators, lhs.sign() * rhs.sign())
    }

    /// Conjugates a canonical sequence; an involution preserving canonical form.
    fn conjugate(&self, seq: &OperatorSequence) -> OperatorSequence {
        if seq.is_zero() {
            return OperatorSequence::zero();
        }
        let operators: SequenceStorage = seq.operators().iter().rev().copied().collect();
        self.canonicalize(operators, seq.sign().conjugate())
    }

    /// Applies moment-equivalence (e.g. translational symmetry, source relabelling) to a
    /// sequence at the point where it is read as a moment. Default: pass-through.
    fn simplify_as_moment(&self, seq: &OperatorSequence) -> OperatorSequence {
        seq.clone()
    }

    /// Generates a formatted string representation of an operator sequence.
    fn format_sequence(&self, seq: &OperatorSequence) -> String {
        if seq.is_zero() {
            return "0".to_string();
        }
        format!("{}{}", seq.sign(), self.format_raw_sequence(seq.operators()))
    }

    /// Generates a formatted string representation of an untreated operator string.
    fn format_raw_sequence(&self, operators: &[OperatorId]) -> String {
        if operators.is_empty() {
            return "1".to_string();
        }
        operators
            .iter()
            .map(|oper| format!("X{}", oper + 1))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Instantiates a generator over all canonical sequences up to the requested word length.
    ///
    /// The default enumerates every raw string and filters non-canonical ones; scenarios with
    /// more efficient enumerations override this.
    fn new_osg(&self, word_length: usize) -> OperatorSequenceGenerator
    where
        Self: Sized,
    {
        OperatorSequenceGenerator::filtered(self, word_length)
    }
}
