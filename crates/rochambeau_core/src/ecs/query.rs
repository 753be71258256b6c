//! # Typed Queries
//!
//! A query is a tuple of fetch types, e.g. `(Position, Cooldown, Rock)`.
//! Each element both filters (the entity must carry it) and projects (what
//! the caller receives for it):
//!
//! | Element                    | Shared item       | Mutable item          |
//! |----------------------------|-------------------|-----------------------|
//! | `Position`                 | `&Position`       | `&mut Position`       |
//! | `Cooldown`                 | `&Cooldown`       | `&mut Cooldown`       |
//! | `Kind`                     | `Kind`            | `Kind`                |
//! | `Rock`, `Paper`, `Scissors`| marker            | marker                |
//!
//! Kind is read-only through queries. It changes only through
//! [`crate::EntityStore::add`], which replaces the tag bit in one step.

use super::component::{ComponentTag, Cooldown, Kind, Paper, Position, Rock, Scissors, Signature};
use super::sealed::Sealed;

/// Shared borrow of one live entity's row.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    /// Attached components.
    pub(crate) signature: Signature,
    /// Position slot (meaningful only if the signature carries it).
    pub(crate) position: &'a Position,
    /// Cooldown slot (meaningful only if the signature carries it).
    pub(crate) cooldown: &'a Cooldown,
}

/// Mutable borrow of one live entity's row.
///
/// Each column can be handed out once; a query naming a column twice
/// therefore matches nothing.
#[derive(Debug)]
pub struct RowMut<'a> {
    signature: Signature,
    position: Option<&'a mut Position>,
    cooldown: Option<&'a mut Cooldown>,
}

impl<'a> RowMut<'a> {
    pub(crate) fn new(
        signature: Signature,
        position: &'a mut Position,
        cooldown: &'a mut Cooldown,
    ) -> Self {
        Self {
            signature,
            position: Some(position),
            cooldown: Some(cooldown),
        }
    }
}

/// One element of a query.
pub trait Fetch: Sealed + 'static {
    /// What a shared view yields for this element.
    type Ref<'a>;
    /// What a mutable view yields for this element.
    type Mut<'a>;

    /// True if an entity with `signature` carries this element.
    fn matches(signature: Signature) -> bool;

    /// Projects from a shared row.
    fn fetch<'a>(row: &Row<'a>) -> Option<Self::Ref<'a>>;

    /// Projects from a mutable row.
    fn fetch_mut<'a>(row: &mut RowMut<'a>) -> Option<Self::Mut<'a>>;
}

impl Fetch for Position {
    type Ref<'a> = &'a Position;
    type Mut<'a> = &'a mut Position;

    #[inline]
    fn matches(signature: Signature) -> bool {
        signature.contains(ComponentTag::Position)
    }

    #[inline]
    fn fetch<'a>(row: &Row<'a>) -> Option<Self::Ref<'a>> {
        Self::matches(row.signature).then_some(row.position)
    }

    #[inline]
    fn fetch_mut<'a>(row: &mut RowMut<'a>) -> Option<Self::Mut<'a>> {
        if Self::matches(row.signature) {
            row.position.take()
        } else {
            None
        }
    }
}

impl Fetch for Cooldown {
    type Ref<'a> = &'a Cooldown;
    type Mut<'a> = &'a mut Cooldown;

    #[inline]
    fn matches(signature: Signature) -> bool {
        signature.contains(ComponentTag::Cooldown)
    }

    #[inline]
    fn fetch<'a>(row: &Row<'a>) -> Option<Self::Ref<'a>> {
        Self::matches(row.signature).then_some(row.cooldown)
    }

    #[inline]
    fn fetch_mut<'a>(row: &mut RowMut<'a>) -> Option<Self::Mut<'a>> {
        if Self::matches(row.signature) {
            row.cooldown.take()
        } else {
            None
        }
    }
}

impl Fetch for Kind {
    type Ref<'a> = Kind;
    type Mut<'a> = Kind;

    #[inline]
    fn matches(signature: Signature) -> bool {
        signature.kind().is_some()
    }

    #[inline]
    fn fetch<'a>(row: &Row<'a>) -> Option<Self::Ref<'a>> {
        row.signature.kind()
    }

    #[inline]
    fn fetch_mut<'a>(row: &mut RowMut<'a>) -> Option<Self::Mut<'a>> {
        row.signature.kind()
    }
}

macro_rules! kind_filter {
    ($marker:ident) => {
        impl Fetch for $marker {
            type Ref<'a> = $marker;
            type Mut<'a> = $marker;

            #[inline]
            fn matches(signature: Signature) -> bool {
                signature.contains(ComponentTag::$marker)
            }

            #[inline]
            fn fetch<'a>(row: &Row<'a>) -> Option<Self::Ref<'a>> {
                Self::matches(row.signature).then_some($marker)
            }

            #[inline]
            fn fetch_mut<'a>(row: &mut RowMut<'a>) -> Option<Self::Mut<'a>> {
                Self::matches(row.signature).then_some($marker)
            }
        }
    };
}

kind_filter!(Rock);
kind_filter!(Paper);
kind_filter!(Scissors);

/// A tuple of [`Fetch`] elements.
pub trait Query: Sealed + 'static {
    /// Shared projection.
    type Item<'a>;
    /// Mutable projection.
    type ItemMut<'a>;

    /// True if an entity with `signature` carries every element.
    fn matches(signature: Signature) -> bool;

    /// Projects from a shared row.
    fn fetch<'a>(row: &Row<'a>) -> Option<Self::Item<'a>>;

    /// Projects from a mutable row.
    fn fetch_mut(row: RowMut<'_>) -> Option<Self::ItemMut<'_>>;
}

macro_rules! tuple_query {
    ($($element:ident),+) => {
        impl<$($element: Fetch),+> Sealed for ($($element,)+) {}

        impl<$($element: Fetch),+> Query for ($($element,)+) {
            type Item<'a> = ($($element::Ref<'a>,)+);
            type ItemMut<'a> = ($($element::Mut<'a>,)+);

            #[inline]
            fn matches(signature: Signature) -> bool {
                $($element::matches(signature))&&+
            }

            #[inline]
            fn fetch<'a>(row: &Row<'a>) -> Option<Self::Item<'a>> {
                Some(($($element::fetch(row)?,)+))
            }

            #[inline]
            fn fetch_mut(mut row: RowMut<'_>) -> Option<Self::ItemMut<'_>> {
                Some(($($element::fetch_mut(&mut row)?,)+))
            }
        }
    };
}

tuple_query!(A);
tuple_query!(A, B);
tuple_query!(A, B, C);
tuple_query!(A, B, C, D);
