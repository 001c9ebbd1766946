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
use std::ops::Mul;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Sign tag of an operator sequence: the cyclic group {+1, +i, -1, -i}.
///
/// Scenario rewrite rules (e.g. the Pauli Cayley table) move factors of ±1 and ±i between an
/// operator string and its scalar coefficient; the tag records the accumulated factor.
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum SequenceSign {
    /// +1
    #[default]
    Positive,
    /// +i
    Imaginary,
    /// -1
    Negative,
    /// -i
    NegativeImaginary,
}

impl SequenceSign {
    /// Constructs the sign i^exponent.
    pub fn from_exponent(exponent: u8) -> Self {
        match exponent % 4 {
            0 => SequenceSign::Positive,
            1 => SequenceSign::Imaginary,
            2 => SequenceSign::Negative,
            _ => SequenceSign::NegativeImaginary,
        }
    }

    /// The power of i this sign represents.
    pub fn exponent(self) -> u8 {
        match self {
            SequenceSign::Positive => 0,
            SequenceSign::Imaginary => 1,
            SequenceSign::Negative => 2,
            SequenceSign::NegativeImaginary => 3,
        }
    }

    /// Returns the complex conjugate of the sign.
    pub fn conjugate(self) -> Self {
        Self::from_exponent((4 - self.exponent()) % 4)
    }

    /// Returns the sign multiplied by -1.
    pub fn negate(self) -> Self {
        Self::from_exponent(self.exponent() + 2)
    }

    /// True if the sign is +i or -i.
    pub fn is_imaginary(self) -> bool {
        self.exponent() % 2 == 1
    }

    /// True if the sign is -1 or -i.
    pub fn is_negative(self) -> bool {
        matches!(self, SequenceSign::Negative | SequenceSign::NegativeImaginary)
    }

    /// The sign as a complex scalar.
    pub fn as_complex(self) -> Complex64 {
        match self {
            SequenceSign::Positive => Complex64::new(1.0, 0.0),
            SequenceSign::Imaginary => Complex64::new(0.0, 1.0),
            SequenceSign::Negative => Complex64::new(-1.0, 0.0),
            SequenceSign::NegativeImaginary => Complex64::new(0.0, -1.0),
        }
    }
}

/// Implements the group multiplication of sign tags (addition of powers of i).
impl Mul<SequenceSign> for SequenceSign {
    type Output = SequenceSign;

    fn mul(self, rhs: SequenceSign) -> SequenceSign {
        SequenceSign::from_exponent(self.exponent() + rhs.exponent())
    }
}

/// Implements the format function (Display trait) of SequenceSign.
///
/// Positive signs render as the empty string so that sequence formatting can prefix the tag
/// directly.
impl fmt::Display for SequenceSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceSign::Positive => Ok(()),
            SequenceSign::Imaginary => write!(f, "i"),
            SequenceSign::Negative => write!(f, "-"),
            SequenceSign::NegativeImaginary => write!(f, "-i"),
        }
    }
}
