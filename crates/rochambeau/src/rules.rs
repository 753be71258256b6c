//! # Conversion Rules
//!
//! The closed cycle: Rock beats Scissors, Scissors beats Paper, Paper beats
//! Rock. Both directions are total functions over [`Kind`].

use rochambeau_core::Kind;

/// Every `(predator, prey)` pair, in the order the resolver runs them.
pub const CONVERSION_CYCLE: [(Kind, Kind); 3] = [
    (Kind::Rock, Kind::Scissors),
    (Kind::Scissors, Kind::Paper),
    (Kind::Paper, Kind::Rock),
];

/// The kind that converts `kind`.
#[inline]
#[must_use]
pub const fn predator_of(kind: Kind) -> Kind {
    kind.predator()
}

/// The kind `kind` converts.
#[inline]
#[must_use]
pub const fn prey_of(kind: Kind) -> Kind {
    kind.prey()
}
