//! Resolving encode sources and decode destinations to a record.
//!
//! Encode and decode accept records behind any number of references, boxes
//! and options. [`Target`] collapses that indirection once, before the field
//! walk starts, into a [`Resolved`] or [`ResolvedMut`] value.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::record::Record;

/// Read-only view of a value after following its indirection.
pub enum Resolved<'a> {
    /// Absent: `None` at some level.
    Nil,
    /// A record.
    Record(&'a dyn Record),
    /// Anything that is not a record.
    Other,
}

/// Writable view of a value after following its indirection.
pub enum ResolvedMut<'a> {
    /// Absent: `None` at some level.
    Nil,
    /// A record reachable through exclusive references only.
    Record(&'a mut dyn Record),
    /// Anything else, including records behind a shared reference.
    Other,
}

/// Values that can be handed to [`encode`](crate::encode) and
/// [`decode`](crate::decode).
///
/// `#[derive(Record)]` implements this alongside [`Record`]. Hand-written
/// records implement it the same way:
///
/// ```
/// use bitmask::{Field, Kind, Record, Resolved, ResolvedMut, Target};
///
/// struct Ready(bool);
///
/// impl Record for Ready {
///     fn fields(&self) -> &'static [Field] {
///         const FIELDS: &[Field] = &[Field::new("0", "1", Some(Kind::Bool))];
///         FIELDS
///     }
///     fn is_truthy(&self, _: usize) -> bool {
///         self.0
///     }
///     fn mark(&mut self, _: usize) {
///         self.0 = true;
///     }
/// }
///
/// impl Target for Ready {
///     fn resolve(&self) -> Resolved<'_> {
///         Resolved::Record(self)
///     }
///     fn resolve_mut(&mut self) -> ResolvedMut<'_> {
///         ResolvedMut::Record(self)
///     }
/// }
///
/// assert_eq!(bitmask::encode(&Ready(true)).unwrap().raw(), 1);
/// ```
pub trait Target {
    /// Follows indirection for reading.
    fn resolve(&self) -> Resolved<'_>;

    /// Follows indirection for writing.
    fn resolve_mut(&mut self) -> ResolvedMut<'_>;
}

impl<'r> Target for dyn Record + 'r {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Record(self)
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Record(self)
    }
}

impl<T: Target> Target for Option<T> {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        match self {
            Some(inner) => inner.resolve(),
            None => Resolved::Nil,
        }
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        match self {
            Some(inner) => inner.resolve_mut(),
            None => ResolvedMut::Nil,
        }
    }
}

impl<T: Target + ?Sized> Target for &T {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        (**self).resolve()
    }

    /// Shared references never grant write access.
    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Other
    }
}

impl<T: Target + ?Sized> Target for &mut T {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        (**self).resolve()
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        (**self).resolve_mut()
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        (**self).resolve()
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        (**self).resolve_mut()
    }
}

macro_rules! impl_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Target for $ty {
                #[inline]
                fn resolve(&self) -> Resolved<'_> {
                    Resolved::Other
                }

                #[inline]
                fn resolve_mut(&mut self) -> ResolvedMut<'_> {
                    ResolvedMut::Other
                }
            }
        )*
    };
}

impl_opaque!(
    (),
    bool,
    char,
    f32,
    f64,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    str,
    String,
);

impl<T> Target for [T] {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Other
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Other
    }
}

impl<T, const N: usize> Target for [T; N] {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Other
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Other
    }
}

impl<T> Target for Vec<T> {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Other
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Other
    }
}

impl<K, V> Target for BTreeMap<K, V> {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Other
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Other
    }
}

#[cfg(feature = "std")]
impl<K, V, S> Target for std::collections::HashMap<K, V, S> {
    #[inline]
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Other
    }

    #[inline]
    fn resolve_mut(&mut self) -> ResolvedMut<'_> {
        ResolvedMut::Other
    }
}
