//! Field tables for records.

use core::marker::PhantomData;

/// Value kinds that take part in a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `bool`: truthy when `true`.
    Bool,
    /// Signed integer of any width: truthy when non-zero.
    Signed,
    /// Unsigned integer of any width: truthy when non-zero.
    Unsigned,
}

/// One declared field of a record.
///
/// `tag` is the raw metadata text exactly as written; an empty tag means the
/// field is not mapped to any bit. `kind` is `None` for field types that never
/// take part in a mask, whatever their tag says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    tag: &'static str,
    kind: Option<Kind>,
}

impl Field {
    /// Describes a field.
    #[inline]
    pub const fn new(name: &'static str, tag: &'static str, kind: Option<Kind>) -> Self {
        Self { name, tag, kind }
    }

    /// Field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Raw tag text, empty when untagged.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Value kind, `None` when the field type is not eligible.
    #[inline]
    pub const fn kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Returns true if the field carries a tag.
    #[inline]
    pub const fn is_tagged(&self) -> bool {
        !self.tag.is_empty()
    }
}

/// Values a mask can be read from and written to.
///
/// Implemented for `bool` and every primitive integer.
pub trait FlagValue {
    /// Kind reported in the field table.
    const KIND: Kind;

    /// Returns true for `true` or any non-zero integer.
    fn is_truthy(&self) -> bool;

    /// The value written for a set bit: `true` or `1`.
    fn truthy() -> Self;
}

impl FlagValue for bool {
    const KIND: Kind = Kind::Bool;

    #[inline]
    fn is_truthy(&self) -> bool {
        *self
    }

    #[inline]
    fn truthy() -> Self {
        true
    }
}

macro_rules! impl_flag_value {
    ($kind:ident => $($ty:ty),*) => {
        $(
            impl FlagValue for $ty {
                const KIND: Kind = Kind::$kind;

                #[inline]
                fn is_truthy(&self) -> bool {
                    *self != 0
                }

                #[inline]
                fn truthy() -> Self {
                    1
                }
            }
        )*
    };
}

impl_flag_value!(Signed => i8, i16, i32, i64, i128, isize);
impl_flag_value!(Unsigned => u8, u16, u32, u64, u128, usize);

/// A struct whose fields can be packed into a [`BitMask`](crate::BitMask).
///
/// Usually derived:
///
/// ```
/// use bitmask::Record;
///
/// #[derive(Record, Default)]
/// struct Perms {
///     #[bitmask = "1"]
///     read: bool,
///     #[bitmask = "2"]
///     write: u8,
///     note: u32, // untagged, ignored
/// }
///
/// let perms = Perms { read: true, write: 0, note: 7 };
/// assert_eq!(bitmask::encode(&perms).unwrap().raw(), 1);
/// ```
///
/// Hand-written impls register fields explicitly. `index` is the position of
/// a field in [`fields`](Record::fields); `is_truthy` and `mark` are only
/// called for fields whose kind is `Some`.
pub trait Record {
    /// Declared fields, in declaration order.
    fn fields(&self) -> &'static [Field];

    /// Returns true if the field at `index` holds a truthy value.
    fn is_truthy(&self, index: usize) -> bool;

    /// Writes the truthy value into the field at `index`.
    fn mark(&mut self, index: usize);
}

/// Classifies a field type by whether it implements [`FlagValue`].
///
/// `KindOf::<T>::KIND`, `KindOf::<T>::is_truthy` and `KindOf::<T>::mark`
/// resolve to the inherent items below when `T: FlagValue` and to the
/// [`Inert`] defaults otherwise, so aliases of `bool` or of an integer are
/// classified by their real type. Used by `#[derive(Record)]`.
#[doc(hidden)]
pub struct KindOf<T: ?Sized>(PhantomData<T>);

impl<T: FlagValue> KindOf<T> {
    /// Kind of `T`.
    pub const KIND: Option<Kind> = Some(T::KIND);

    /// Reads `value` as a flag.
    #[inline]
    pub fn is_truthy(value: &T) -> bool {
        value.is_truthy()
    }

    /// Writes the truthy value into `slot`.
    #[inline]
    pub fn mark(slot: &mut T) {
        *slot = T::truthy();
    }
}

/// Fallback for [`KindOf`] on types that are not [`FlagValue`].
#[doc(hidden)]
pub trait Inert<T: ?Sized> {
    /// Never a flag.
    const KIND: Option<Kind> = None;

    /// Always false.
    #[inline]
    fn is_truthy(_: &T) -> bool {
        false
    }

    /// Writes nothing.
    #[inline]
    fn mark(_: &mut T) {}
}

impl<T: ?Sized> Inert<T> for KindOf<T> {}
