//! Packing records into masks and back.

use alloc::vec::Vec;

use crate::error::Error;
use crate::mask::BitMask;
use crate::record::{Field, Kind, Record};
use crate::target::{Resolved, ResolvedMut, Target};

/// Log macro: field walk events. Compiles to nothing without `logging`.
macro_rules! walk_log {
    ($level:ident, $($arg:tt)+) => {{
        #[cfg(feature = "logging")]
        {
            log::$level!($($arg)+);
        }
    }};
}

/// Validated mapping of one field to a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Field name.
    pub name: &'static str,
    /// 1-based bit position.
    pub bit: u32,
    /// Value kind.
    pub kind: Kind,
}

/// Parses a field's tag.
///
/// Returns `Ok(None)` for untagged fields. Tags are base-10 integers with an
/// optional sign and must lie in `1..=64`.
pub(crate) fn bit_position(field: &Field) -> Result<Option<u32>, Error> {
    let tag = field.tag();
    if tag.is_empty() {
        return Ok(None);
    }

    let value: i64 = match tag.parse() {
        Ok(value) => value,
        Err(_) => {
            walk_log!(debug, "field '{}': rejected tag {:?}", field.name(), tag);
            return Err(Error::InvalidTag {
                field: field.name(),
                tag,
            });
        }
    };

    if value < i64::from(BitMask::MIN_BIT) || value > i64::from(BitMask::MAX_BIT) {
        walk_log!(debug, "field '{}': tag {:?} out of range", field.name(), tag);
        return Err(Error::BitOutOfRange {
            field: field.name(),
            tag,
        });
    }

    Ok(Some(value as u32))
}

/// Walks `fields`, yielding `(index, bit)` for every tagged field of an
/// eligible kind. Stops at the first bad tag.
fn walk(
    fields: &'static [Field],
    mut visit: impl FnMut(usize, u32),
) -> Result<(), Error> {
    for (index, field) in fields.iter().enumerate() {
        let Some(bit) = bit_position(field)? else {
            continue;
        };
        if field.kind().is_some() {
            visit(index, bit);
        }
    }
    Ok(())
}

/// Packs a record into a mask.
///
/// `source` may be a record or any chain of `&`, `&mut`, `Box` and `Option`
/// around one. An absent source (`None` at any level) packs to an empty mask
/// without error. Each tagged `bool` that is `true`, and each tagged integer
/// that is non-zero, sets its bit.
///
/// # Errors
///
/// - [`Error::NotARecord`] if `source` is not a record.
/// - [`Error::InvalidTag`] / [`Error::BitOutOfRange`] for the first bad tag in
///   declaration order. Tags are checked on every field, eligible or not.
///
/// # Example
///
/// ```
/// use bitmask::Record;
///
/// #[derive(Record)]
/// struct Pair {
///     #[bitmask = "1"]
///     a: bool,
///     #[bitmask = "2"]
///     b: bool,
/// }
///
/// let mask = bitmask::encode(&Pair { a: true, b: false }).unwrap();
/// assert_eq!(mask.raw(), 1);
///
/// let absent: Option<Pair> = None;
/// assert_eq!(bitmask::encode(&absent).unwrap().raw(), 0);
/// ```
pub fn encode<T: Target + ?Sized>(source: &T) -> Result<BitMask, Error> {
    let record = match source.resolve() {
        Resolved::Nil => return Ok(BitMask::EMPTY),
        Resolved::Other => return Err(Error::NotARecord),
        Resolved::Record(record) => record,
    };

    let mut mask = BitMask::EMPTY;
    walk(record.fields(), |index, bit| {
        if record.is_truthy(index) {
            mask.set(bit);
        }
    })?;

    walk_log!(trace, "encoded {} fields into {:#x}", record.fields().len(), mask.raw());
    Ok(mask)
}

/// Unpacks a mask into an existing record.
///
/// For every tagged field of an eligible kind whose bit is set, writes `true`
/// or `1`. Fields whose bit is clear are **left as they are**, never reset to
/// zero: decode merges into the destination. Start from a zero-valued
/// destination when the result must mirror the mask exactly.
///
/// `dest` may be the record itself or a chain of `&mut`, `Box` and `Option`
/// around one.
///
/// # Errors
///
/// - [`Error::NotARecordRef`] if `dest` is absent, is not a record, or is
///   only reachable through a shared reference.
/// - [`Error::InvalidTag`] / [`Error::BitOutOfRange`] for the first bad tag in
///   declaration order. Every tag is checked before any field is written, so
///   `dest` is untouched on error.
///
/// # Example
///
/// ```
/// use bitmask::{BitMask, Record};
///
/// #[derive(Record, Default, Debug, PartialEq)]
/// struct Pair {
///     #[bitmask = "1"]
///     a: i32,
///     #[bitmask = "2"]
///     b: u64,
/// }
///
/// let mut pair = Pair::default();
/// bitmask::decode(BitMask::new(1), &mut pair).unwrap();
/// assert_eq!(pair, Pair { a: 1, b: 0 });
/// ```
pub fn decode<T: Target + ?Sized>(mask: BitMask, dest: &mut T) -> Result<(), Error> {
    let record = match dest.resolve_mut() {
        ResolvedMut::Record(record) => record,
        ResolvedMut::Nil | ResolvedMut::Other => return Err(Error::NotARecordRef),
    };

    let fields = record.fields();
    walk(fields, |_, _| {})?;
    walk(fields, |index, bit| {
        if mask.is_set(bit) {
            record.mark(index);
        }
    })?;

    walk_log!(trace, "decoded {:#x} into {} fields", mask.raw(), fields.len());
    Ok(())
}

/// Lists the fields of a record that map to a bit.
///
/// Untagged fields and fields of ineligible kinds are left out. Tags are
/// validated exactly as [`encode`] and [`decode`] do.
pub fn descriptors<R: Record + ?Sized>(record: &R) -> Result<Vec<Descriptor>, Error> {
    let fields = record.fields();
    let mut out = Vec::new();
    walk(fields, |index, bit| {
        let field = &fields[index];
        if let Some(kind) = field.kind() {
            out.push(Descriptor {
                name: field.name(),
                bit,
                kind,
            });
        }
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tag: &'static str) -> Field {
        Field::new("f", tag, Some(Kind::Bool))
    }

    #[test]
    fn bit_position_untagged() {
        assert_eq!(bit_position(&field("")), Ok(None));
    }

    #[test]
    fn bit_position_bounds() {
        assert_eq!(bit_position(&field("1")), Ok(Some(1)));
        assert_eq!(bit_position(&field("64")), Ok(Some(64)));
        assert_eq!(
            bit_position(&field("0")),
            Err(Error::BitOutOfRange { field: "f", tag: "0" })
        );
        assert_eq!(
            bit_position(&field("65")),
            Err(Error::BitOutOfRange { field: "f", tag: "65" })
        );
        assert_eq!(
            bit_position(&field("-3")),
            Err(Error::BitOutOfRange { field: "f", tag: "-3" })
        );
    }

    #[test]
    fn bit_position_signed_prefix() {
        assert_eq!(bit_position(&field("+7")), Ok(Some(7)));
    }

    #[test]
    fn bit_position_not_a_number() {
        for tag in ["one", " 1", "1.0", "0x1", "99999999999999999999"] {
            assert_eq!(
                bit_position(&field(tag)),
                Err(Error::InvalidTag { field: "f", tag }),
                "tag {:?}",
                tag
            );
        }
    }

    #[test]
    fn walk_skips_ineligible_but_validates() {
        const FIELDS: &[Field] = &[
            Field::new("a", "1", Some(Kind::Bool)),
            Field::new("b", "2", None),
            Field::new("c", "", Some(Kind::Signed)),
            Field::new("d", "3", Some(Kind::Unsigned)),
        ];
        let mut seen = Vec::new();
        walk(FIELDS, |index, bit| seen.push((index, bit))).unwrap();
        assert_eq!(seen, [(0usize, 1u32), (3usize, 3u32)]);

        const BAD: &[Field] = &[
            Field::new("a", "1", Some(Kind::Bool)),
            Field::new("b", "x", None),
        ];
        assert_eq!(
            walk(BAD, |_, _| {}),
            Err(Error::InvalidTag { field: "b", tag: "x" })
        );
    }
}
