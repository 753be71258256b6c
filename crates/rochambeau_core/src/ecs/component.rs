//! # Component System
//!
//! The component set is closed: `Position`, `Cooldown` and `Kind`.
//! Position and Cooldown live in dense columns. Kind lives in the entity's
//! [`Signature`] as one of three mutually exclusive tag bits, so an entity can
//! never be observed holding two kinds at once.

use std::fmt;

use super::sealed::Sealed;
use super::storage::{Columns, ComponentStorage};

/// Grid position of an entity's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// X coordinate in world space.
    pub x: i32,
    /// Y coordinate in world space.
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the squared Euclidean distance to another position.
    ///
    /// Computed in `u128` so it is exact for any pair of `i32` coordinates.
    /// Ordering by squared distance is the same as ordering by distance.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u128 {
        let dx = u128::from(self.x.abs_diff(other.x));
        let dy = u128::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// Clamps into `[0, max_x] x [0, max_y]`.
    #[inline]
    #[must_use]
    pub fn clamped(self, max_x: i32, max_y: i32) -> Self {
        Self {
            x: self.x.clamp(0, max_x.max(0)),
            y: self.y.clamp(0, max_y.max(0)),
        }
    }
}

/// The Rock/Paper/Scissors tag of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Beats Scissors, loses to Paper.
    Rock,
    /// Beats Rock, loses to Scissors.
    Paper,
    /// Beats Paper, loses to Rock.
    Scissors,
}

impl Kind {
    /// Every kind, in tag order.
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// The kind this one converts on contact.
    #[inline]
    #[must_use]
    pub const fn prey(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }

    /// The kind that converts this one on contact.
    #[inline]
    #[must_use]
    pub const fn predator(self) -> Self {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }

    /// True if `self` converts `other`.
    #[inline]
    #[must_use]
    pub fn beats(self, other: Self) -> bool {
        self.prey() == other
    }

    /// The signature tag carried by entities of this kind.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> ComponentTag {
        match self {
            Self::Rock => ComponentTag::Rock,
            Self::Paper => ComponentTag::Paper,
            Self::Scissors => ComponentTag::Scissors,
        }
    }

    /// Maps a uniform index in `0..3` to a kind (wrapping).
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::Rock,
            1 => Self::Paper,
            _ => Self::Scissors,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Zero-sized view filter selecting Rock entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rock;

/// Zero-sized view filter selecting Paper entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paper;

/// Zero-sized view filter selecting Scissors entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scissors;

/// Simulated time in milliseconds since the simulation started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(pub u64);

impl SimTime {
    /// Time zero.
    pub const ZERO: Self = Self(0);

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is later.
    #[inline]
    #[must_use]
    pub const fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Advances by `millis`.
    #[inline]
    #[must_use]
    pub const fn advanced(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Raw milliseconds.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

/// Default minimum interval between two conversions of the same entity.
pub const DEFAULT_COOLDOWN_MS: u64 = 500;

/// Minimum elapsed time between successful conversions for one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    /// When this entity last took part in a conversion. `None` if never.
    pub last_transition: Option<SimTime>,
    /// Required interval in milliseconds.
    pub duration_ms: u64,
}

impl Cooldown {
    /// Creates an expired cooldown with the given interval.
    #[inline]
    #[must_use]
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            last_transition: None,
            duration_ms,
        }
    }

    /// `now - last_transition > duration`. Never-triggered cooldowns are expired.
    #[inline]
    #[must_use]
    pub fn expired(&self, now: SimTime) -> bool {
        self.last_transition
            .map_or(true, |last| now.since(last) > self.duration_ms)
    }

    /// Restarts the cooldown at `now`.
    #[inline]
    pub fn reset(&mut self, now: SimTime) {
        self.last_transition = Some(now);
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}

/// Stable per-type tag order, used for signatures and debug dumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ComponentTag {
    /// [`Position`] column.
    Position = 0,
    /// [`Cooldown`] column.
    Cooldown = 1,
    /// Kind tag [`Kind::Rock`].
    Rock = 2,
    /// Kind tag [`Kind::Paper`].
    Paper = 3,
    /// Kind tag [`Kind::Scissors`].
    Scissors = 4,
}

impl ComponentTag {
    /// Every tag, in order.
    pub const ALL: [Self; 5] = [
        Self::Position,
        Self::Cooldown,
        Self::Rock,
        Self::Paper,
        Self::Scissors,
    ];

    /// Bit occupied in a [`Signature`].
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Membership bitmask of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature(u8);

impl Signature {
    /// No components.
    pub const EMPTY: Self = Self(0);

    /// Mask of the three mutually exclusive kind bits.
    pub const KIND: Self = Self(
        ComponentTag::Rock.bit() | ComponentTag::Paper.bit() | ComponentTag::Scissors.bit(),
    );

    /// Signature of a complete, well-formed entity of the given kind.
    #[inline]
    #[must_use]
    pub const fn complete(kind: Kind) -> Self {
        Self(ComponentTag::Position.bit() | ComponentTag::Cooldown.bit() | kind.tag().bit())
    }

    /// Checks a single tag.
    #[inline]
    #[must_use]
    pub const fn contains(self, tag: ComponentTag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Sets a tag.
    #[inline]
    #[must_use]
    pub const fn with(self, tag: ComponentTag) -> Self {
        Self(self.0 | tag.bit())
    }

    /// Clears every bit in `other`.
    #[inline]
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Replaces whatever kind bit is set with `kind`, in one step.
    #[inline]
    #[must_use]
    pub const fn with_kind(self, kind: Kind) -> Self {
        Self((self.0 & !Self::KIND.0) | kind.tag().bit())
    }

    /// The kind carried by this signature, if any.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> Option<Kind> {
        if self.contains(ComponentTag::Rock) {
            Some(Kind::Rock)
        } else if self.contains(ComponentTag::Paper) {
            Some(Kind::Paper)
        } else if self.contains(ComponentTag::Scissors) {
            Some(Kind::Scissors)
        } else {
            None
        }
    }

    /// Attached tags in tag order.
    pub fn tags(self) -> impl Iterator<Item = ComponentTag> {
        ComponentTag::ALL
            .into_iter()
            .filter(move |tag| self.contains(*tag))
    }
}

/// One value of the closed component set, used as `create` input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentValue {
    /// A position.
    Position(Position),
    /// A kind.
    Kind(Kind),
    /// A cooldown.
    Cooldown(Cooldown),
}

impl From<Position> for ComponentValue {
    fn from(value: Position) -> Self {
        Self::Position(value)
    }
}

impl From<Kind> for ComponentValue {
    fn from(value: Kind) -> Self {
        Self::Kind(value)
    }
}

impl From<Cooldown> for ComponentValue {
    fn from(value: Cooldown) -> Self {
        Self::Cooldown(value)
    }
}

impl Sealed for Position {}
impl Sealed for Cooldown {}
impl Sealed for Kind {}
impl Sealed for Rock {}
impl Sealed for Paper {}
impl Sealed for Scissors {}

/// A component type the store can attach, read and detach.
///
/// Implemented only for the closed component set. The hooks need the store's
/// `Columns`, so the only way to change a component from outside the crate
/// is through [`crate::EntityStore`].
pub trait Component: Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    /// Signature bits owned by this component type.
    const BITS: Signature;

    /// Writes the value into `columns` and marks it in `signature`.
    fn attach(self, signature: &mut Signature, columns: &mut Columns, index: usize);

    /// Reads the value if `signature` says it is attached.
    fn read(signature: Signature, columns: &Columns, index: usize) -> Option<Self>;

    /// Clears the value and its signature bits.
    fn detach(signature: &mut Signature, columns: &mut Columns, index: usize);
}

/// A component stored in its own dense column, so it can be borrowed mutably.
pub trait ColumnComponent: Component + Default {
    /// Tag of the column.
    const TAG: ComponentTag;

    /// Column holding this component.
    fn column(columns: &Columns) -> &ComponentStorage<Self>;

    /// Mutable column holding this component.
    fn column_mut(columns: &mut Columns) -> &mut ComponentStorage<Self>;
}

macro_rules! column_component {
    ($ty:ty, $tag:ident, $field:ident) => {
        impl ColumnComponent for $ty {
            const TAG: ComponentTag = ComponentTag::$tag;

            #[inline]
            fn column(columns: &Columns) -> &ComponentStorage<Self> {
                &columns.$field
            }

            #[inline]
            fn column_mut(columns: &mut Columns) -> &mut ComponentStorage<Self> {
                &mut columns.$field
            }
        }

        impl Component for $ty {
            const BITS: Signature = Signature::EMPTY.with(ComponentTag::$tag);

            #[inline]
            fn attach(self, signature: &mut Signature, columns: &mut Columns, index: usize) {
                columns.$field.set(index, self);
                *signature = signature.with(ComponentTag::$tag);
            }

            #[inline]
            fn read(signature: Signature, columns: &Columns, index: usize) -> Option<Self> {
                if signature.contains(ComponentTag::$tag) {
                    columns.$field.get(index).copied()
                } else {
                    None
                }
            }

            #[inline]
            fn detach(signature: &mut Signature, columns: &mut Columns, index: usize) {
                columns.$field.reset(index);
                *signature = signature.without(Self::BITS);
            }
        }
    };
}

column_component!(Position, Position, positions);
column_component!(Cooldown, Cooldown, cooldowns);

impl Component for Kind {
    const BITS: Signature = Signature::KIND;

    #[inline]
    fn attach(self, signature: &mut Signature, _columns: &mut Columns, _index: usize) {
        *signature = signature.with_kind(self);
    }

    #[inline]
    fn read(signature: Signature, _columns: &Columns, _index: usize) -> Option<Self> {
        signature.kind()
    }

    #[inline]
    fn detach(signature: &mut Signature, _columns: &mut Columns, _index: usize) {
        *signature = signature.without(Signature::KIND);
    }
}
