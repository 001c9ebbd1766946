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

use std::fmt;

use crate::dictionary::OperatorSequenceGenerator;
use crate::operators::{OperatorSequence, SequenceSign, SequenceStorage, ShortlexHasher};
use crate::scenarios::pauli::{canonical_moment_sequence, osg};
use crate::symbols::{distributed_product, RawPolynomial};
use crate::{Context, MomentaError, OperatorId};

/// Cayley table of the single-qubit Pauli group, with 0 = I and 1..3 = X, Y, Z.
///
/// Entry (l, r) encodes l·r: 0 for the identity (no phase), +p for +i·σ(p), -p for -i·σ(p).
/// Products involving the identity carry no imaginary phase.
const CAYLEY_IXYZ: [i8; 16] = [0, 1, 2, 3, 1, 0, 3, -2, 2, -3, 0, 1, 3, 2, -1, 0];

/// Multiplies two non-identity Pauli letters (0 = X, 1 = Y, 2 = Z).
///
/// # Returns
///
/// * `0` - The identity, with no phase.
/// * `±p` - The letter p - 1, with phase ±i.
pub(crate) fn multiply_pauli_letters(left: u32, right: u32) -> i8 {
    debug_assert!(left < 3 && right < 3);
    CAYLEY_IXYZ[(((left + 1) << 2) + (right + 1)) as usize]
}

/// Scenario of Pauli operators on a qubit chain or lattice.
///
/// Operator `3·qubit + letter` is the Pauli letter (0 = X, 1 = Y, 2 = Z) acting on `qubit`.
/// Lattice sites are numbered column-major: `qubit = column · column_height + row`. Operators
/// on distinct qubits commute; same-qubit products follow the Pauli group, accumulating ±i
/// phases in the sequence sign.
#[derive(Debug)]
pub struct PauliContext {
    qubit_count: usize,
    column_height: usize,
    row_width: usize,
    wrap: bool,
    translational_symmetry: bool,
    hasher: ShortlexHasher,
}

impl PauliContext {
    /// Creates a qubit chain.
    ///
    /// # Arguments
    ///
    /// * `qubit_count` - Length of the chain.
    /// * `wrap` - True for periodic boundary conditions.
    /// * `translational_symmetry` - True to identify moments related by a shift of all qubits.
    ///
    /// # Returns
    ///
    /// * `Ok(PauliContext)` - The new scenario.
    /// * `Err(MomentaError::EmptyQubitRegister)` - No qubits were requested.
    pub fn new_chain(
        qubit_count: usize,
        wrap: bool,
        translational_symmetry: bool,
    ) -> Result<Self, MomentaError> {
        if qubit_count == 0 {
            return Err(MomentaError::EmptyQubitRegister);
        }
        Ok(Self {
            qubit_count,
            column_height: 0,
            row_width: 0,
            wrap,
            translational_symmetry,
            hasher: ShortlexHasher::new(qubit_count * 3),
        })
    }

    /// Creates a qubit lattice with column-major site numbering.
    ///
    /// # Arguments
    ///
    /// * `column_height` - Number of rows of the lattice.
    /// * `row_width` - Number of columns of the lattice.
    /// * `wrap` - True for periodic boundary conditions in both directions.
    /// * `translational_symmetry` - True to identify moments related by lattice shifts.
    pub fn new_lattice(
        column_height: usize,
        row_width: usize,
        wrap: bool,
        translational_symmetry: bool,
    ) -> Result<Self, MomentaError> {
        let qubit_count = column_height * row_width;
        if qubit_count == 0 {
            return Err(MomentaError::EmptyQubitRegister);
        }
        Ok(Self {
            qubit_count,
            column_height,
            row_width,
            wrap,
            translational_symmetry,
            hasher: ShortlexHasher::new(qubit_count * 3),
        })
    }

    /// Number of qubits in the scenario.
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// True if the qubits form a 2D lattice rather than a chain.
    pub fn is_lattice(&self) -> bool {
        self.column_height != 0
    }

    /// Number of rows of the lattice (0 for a chain).
    pub fn column_height(&self) -> usize {
        self.column_height
    }

    /// Number of columns of the lattice (0 for a chain).
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// True for periodic boundary conditions.
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// True if moments are identified under qubit shifts.
    pub fn translational_symmetry(&self) -> bool {
        self.translational_symmetry
    }

    /// The qubit an operator acts on.
    pub fn qubit_of(&self, operator: OperatorId) -> usize {
        (operator / 3) as usize
    }

    /// The Pauli letter of an operator (0 = X, 1 = Y, 2 = Z).
    pub fn letter_of(&self, operator: OperatorId) -> u32 {
        operator % 3
    }

    fn single(&self, qubit: usize, letter: u32) -> OperatorSequence {
        assert!(qubit < self.qubit_count);
        let operator = (3 * qubit) as OperatorId + letter;
        let mut storage = SequenceStorage::new();
        storage.push(operator);
        OperatorSequence::from_raw_parts(
            storage,
            self.hasher.hash_operator(operator),
            SequenceSign::Positive,
        )
    }

    /// The Pauli X operator on a qubit.
    ///
    /// # Panics
    ///
    /// * If the qubit is out of range.
    pub fn sigma_x(&self, qubit: usize) -> OperatorSequence {
        self.single(qubit, 0)
    }

    /// The Pauli Y operator on a qubit.
    ///
    /// # Panics
    ///
    /// * If the qubit is out of range.
    pub fn sigma_y(&self, qubit: usize) -> OperatorSequence {
        self.single(qubit, 1)
    }

    /// The Pauli Z operator on a qubit.
    ///
    /// # Panics
    ///
    /// * If the qubit is out of range.
    pub fn sigma_z(&self, qubit: usize) -> OperatorSequence {
        self.single(qubit, 2)
    }

    /// The commutator `[lhs, rhs] = lhs·rhs − rhs·lhs`, up to a scalar factor of 2.
    ///
    /// Two Pauli words either commute or anti-commute, so the commutator is zero exactly when
    /// the signed product of the words is real relative to the product of the input signs; the
    /// subtraction is never formed.
    pub fn commutator(&self, lhs: &OperatorSequence, rhs: &OperatorSequence) -> OperatorSequence {
        let prefactor = lhs.sign() * rhs.sign();
        let mut result = self.multiply(lhs, rhs);
        if prefactor.is_imaginary() == result.sign().is_imaginary() {
            result.set_to_zero();
        }
        result
    }

    /// The anti-commutator `{lhs, rhs} = lhs·rhs + rhs·lhs`, up to a scalar factor of 2.
    pub fn anticommutator(
        &self,
        lhs: &OperatorSequence,
        rhs: &OperatorSequence,
    ) -> OperatorSequence {
        let prefactor = lhs.sign() * rhs.sign();
        let mut result = self.multiply(lhs, rhs);
        if prefactor.is_imaginary() != result.sign().is_imaginary() {
            result.set_to_zero();
        }
        result
    }

    /// Distributes the commutator over two raw polynomials.
    pub fn commutator_polynomial(
        &self,
        lhs: &RawPolynomial,
        rhs: &RawPolynomial,
        zero_tolerance: f64,
    ) -> RawPolynomial {
        distributed_product(lhs, rhs, |a, b| self.commutator(a, b), zero_tolerance)
    }

    /// Distributes the anti-commutator over two raw polynomials.
    pub fn anticommutator_polynomial(
        &self,
        lhs: &RawPolynomial,
        rhs: &RawPolynomial,
        zero_tolerance: f64,
    ) -> RawPolynomial {
        distributed_product(lhs, rhs, |a, b| self.anticommutator(a, b), zero_tolerance)
    }
}

impl Context for PauliContext {
    fn operator_count(&self) -> usize {
        self.qubit_count * 3
    }

    fn hasher(&self) -> &ShortlexHasher {
        &self.hasher
    }

    fn can_be_nonhermitian(&self) -> bool {
        // Canonical Pauli words are hermitian; phases live in the sign tag.
        false
    }

    fn additional_simplification(
        &self,
        operators: &mut SequenceStorage,
        sign: &mut SequenceSign,
    ) -> bool {
        if operators.is_empty() {
            return false;
        }

        operators.sort_by_key(|&oper| oper / 3);

        let mut simplified = SequenceStorage::new();
        let mut current_qubit = (operators[0] / 3) as usize;
        // None encodes the identity on the current qubit.
        let mut current_letter = Some(operators[0] % 3);

        let flush = |simplified: &mut SequenceStorage, qubit: usize, letter: Option<u32>| {
            if let Some(letter) = letter {
                simplified.push((3 * qubit) as OperatorId + letter);
            }
        };

        for &oper in operators.iter().skip(1) {
            let qubit = (oper / 3) as usize;
            let letter = oper % 3;
            if qubit != current_qubit {
                flush(&mut simplified, current_qubit, current_letter);
                current_qubit = qubit;
                current_letter = Some(letter);
                continue;
            }
            match current_letter {
                None => current_letter = Some(letter),
                Some(left) => {
                    let product = multiply_pauli_letters(left, letter);
                    if product == 0 {
                        current_letter = None;
                    } else if product > 0 {
                        *sign = *sign * SequenceSign::Imaginary;
                        current_letter = Some(product as u32 - 1);
                    } else {
                        *sign = *sign * SequenceSign::NegativeImaginary;
                        current_letter = Some((-product) as u32 - 1);
                    }
                }
            }
        }
        flush(&mut simplified, current_qubit, current_letter);

        *operators = simplified;

        // Pauli simplification never resolves to zero.
        false
    }

    fn multiply(&self, lhs: &OperatorSequence, rhs: &OperatorSequence) -> OperatorSequence {
        if lhs.is_zero() || rhs.is_zero() {
            return OperatorSequence::zero();
        }
        let mut sign = lhs.sign() * rhs.sign();
        if rhs.is_empty() {
            return lhs.with_sign(sign);
        }
        if lhs.is_empty() {
            return rhs.with_sign(sign);
        }

        // Merge the two canonical words in qubit order, collapsing same-qubit products.
        let mut result = SequenceStorage::new();
        let mut lhs_iter = lhs.operators().iter().peekable();
        let mut rhs_iter = rhs.operators().iter().peekable();
        loop {
            match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(&&left), Some(&&right)) => {
                    let left_qubit = left / 3;
                    let right_qubit = right / 3;
                    if left_qubit < right_qubit {
                        result.push(left);
                        lhs_iter.next();
                    } else if left_qubit > right_qubit {
                        result.push(right);
                        rhs_iter.next();
                    } else {
                        let product = multiply_pauli_letters(left % 3, right % 3);
                        if product > 0 {
                            result.push(3 * left_qubit + product as u32 - 1);
                            sign = sign * SequenceSign::Imaginary;
                        } else if product < 0 {
                            result.push(3 * left_qubit + (-product) as u32 - 1);
                            sign = sign * SequenceSign::NegativeImaginary;
                        }
                        lhs_iter.next();
                        rhs_iter.next();
                    }
                }
                (Some(&&left), None) => {
                    result.push(left);
                    lhs_iter.next();
                }
                (None, Some(&&right)) => {
                    result.push(right);
                    rhs_iter.next();
                }
                (None, None) => break,
            }
        }

        let hash = self.hasher.hash(&result);
        OperatorSequence::from_raw_parts(result, hash, sign)
    }

    fn conjugate(&self, seq: &OperatorSequence) -> OperatorSequence {
        // Pauli words are hermitian; only the phase conjugates.
        seq.with_sign(seq.sign().conjugate())
    }

    fn simplify_as_moment(&self, seq: &OperatorSequence) -> OperatorSequence {
        if !self.translational_symmetry {
            return seq.clone();
        }
        canonical_moment_sequence(self, seq)
    }

    fn format_raw_sequence(&self, operators: &[OperatorId]) -> String {
        if operators.is_empty() {
            return "I".to_string();
        }
        operators
            .iter()
            .map(|&oper| {
                let letter = match oper % 3 {
                    0 => 'X',
                    1 => 'Y',
                    _ => 'Z',
                };
                format!("{}{}", letter, oper / 3 + 1)
            })
            .collect::<String>()
    }

    fn new_osg(&self, word_length: usize) -> OperatorSequenceGenerator {
        osg::full_generator(self, word_length)
    }
}

/// Implements the format function (Display trait) of PauliContext.
impl fmt::Display for PauliContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pauli context of {} {}",
            self.qubit_count,
            if self.qubit_count == 1 { "qubit" } else { "qubits" }
        )?;
        if self.is_lattice() {
            write!(f, " in {} x {} lattice", self.row_width, self.column_height)?;
        } else {
            write!(f, " in chain")?;
        }
        write!(f, " ({} operators)", self.qubit_count * 3)?;
        if self.wrap {
            write!(f, " with wrapping")?;
            if self.translational_symmetry {
                write!(f, " and translational symmetry")?;
            }
        } else if self.translational_symmetry {
            write!(f, " with thermodynamic symmetry")?;
        }
        writeln!(f, ".")
    }
}
