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

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::SymbolId;

/// A scalar multiple of a (possibly conjugated) symbol: one matrix entry, or one polynomial term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Monomial {
    /// The referenced symbol.
    pub symbol: SymbolId,
    /// Scalar coefficient of the symbol.
    pub factor: Complex64,
    /// True if the conjugate of the symbol is referenced.
    pub conjugated: bool,
}

impl Monomial {
    /// A monomial referencing a symbol with unit coefficient.
    pub fn from_symbol(symbol: SymbolId) -> Self {
        Self {
            symbol,
            factor: Complex64::new(1.0, 0.0),
            conjugated: false,
        }
    }

    /// Creates a monomial from its parts.
    pub fn new(symbol: SymbolId, factor: Complex64, conjugated: bool) -> Self {
        Self {
            symbol,
            factor,
            conjugated,
        }
    }

    /// True if the monomial references the reserved zero symbol.
    pub fn is_zero_symbol(&self) -> bool {
        self.symbol == 0
    }

    /// Ordering key within a polynomial: ascending symbol id, conjugated after plain.
    pub(crate) fn key(&self) -> (SymbolId, bool) {
        (self.symbol, self.conjugated)
    }
}

/// Implements the default function (Default trait) of Monomial (the zero symbol).
impl Default for Monomial {
    fn default() -> Self {
        Self {
            symbol: 0,
            factor: Complex64::new(1.0, 0.0),
            conjugated: false,
        }
    }
}

/// Implements the format function (Display trait) of Monomial ("factor#id" notation).
impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.factor, self.symbol)?;
        if self.conjugated {
            write!(f, "*")?;
        }
        Ok(())
    }
}
