//! The 64-bit flag set addressed by 1-based position.

use core::fmt;

/// A set of up to 64 flags packed into an `i64`.
///
/// Positions are 1-indexed: position `i` is raw bit `i - 1`, so position 64
/// is the sign bit. Positions outside `1..=64` are never addressed: `is_set`
/// reports `false` for them and the mutators leave the mask untouched.
///
/// # Example
///
/// ```
/// use bitmask::BitMask;
///
/// let mut mask = BitMask::new(0);
/// mask.set(1);
/// mask.set(3);
/// assert_eq!(mask.raw(), 0b101);
///
/// assert!(mask.is_set(3));
/// mask.unset(3);
/// assert!(!mask.is_set(3));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BitMask(i64);

impl BitMask {
    /// Mask with no bits set.
    pub const EMPTY: BitMask = BitMask(0);

    /// Lowest addressable position.
    pub const MIN_BIT: u32 = 1;

    /// Highest addressable position.
    pub const MAX_BIT: u32 = 64;

    /// Wraps an integer as a mask, bits unchanged.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The underlying integer.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Single-bit mask for `position`, or `None` outside `1..=64`.
    #[inline]
    const fn bit(position: u32) -> Option<i64> {
        if position < Self::MIN_BIT || position > Self::MAX_BIT {
            None
        } else {
            Some(1i64 << (position - 1))
        }
    }

    /// Returns true if the flag at `position` is set.
    #[inline]
    pub const fn is_set(self, position: u32) -> bool {
        match Self::bit(position) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    /// Sets the flag at `position` to 1.
    #[inline]
    pub fn set(&mut self, position: u32) {
        if let Some(bit) = Self::bit(position) {
            self.0 |= bit;
        }
    }

    /// Sets the flag at `position` to 0.
    #[inline]
    pub fn unset(&mut self, position: u32) {
        if let Some(bit) = Self::bit(position) {
            self.0 &= !bit;
        }
    }

    /// Flips the flag at `position`.
    #[inline]
    pub fn toggle(&mut self, position: u32) {
        if let Some(bit) = Self::bit(position) {
            self.0 ^= bit;
        }
    }

    /// Sets the flag at `position` to the given boolean value.
    #[inline]
    pub fn set_to(&mut self, position: u32, enabled: bool) {
        if enabled {
            self.set(position)
        } else {
            self.unset(position)
        }
    }

    /// Number of flags set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the set positions in ascending order.
    #[inline]
    pub fn positions(self) -> Positions {
        Positions {
            remaining: self.0 as u64,
        }
    }
}

impl From<i64> for BitMask {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<BitMask> for i64 {
    #[inline]
    fn from(mask: BitMask) -> Self {
        mask.0
    }
}

impl fmt::Binary for BitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl IntoIterator for BitMask {
    type Item = u32;
    type IntoIter = Positions;

    #[inline]
    fn into_iter(self) -> Positions {
        self.positions()
    }
}

/// Iterator over the set positions of a [`BitMask`], lowest first.
#[derive(Debug, Clone)]
pub struct Positions {
    remaining: u64,
}

impl Iterator for Positions {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let zero_based = self.remaining.trailing_zeros();
        // clear lowest set bit
        self.remaining &= self.remaining - 1;
        Some(zero_based + 1)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Positions {}
