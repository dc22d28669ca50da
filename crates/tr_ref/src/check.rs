//! The three checks every reference is built from.
//!
//! Each returns the validated value so constructors can chain them with `?`.

use core::ptr;

use tr_ptr::{Access, Strength, Strong, ValPtr, Weak};
use tr_utils::num::IndexInt;

use crate::array::{BackingArray, Domain};
use crate::error::{IndexMismatchError, IndexRangeError, NullPointerError};

/// Wraps `ptr`, rejecting null if `S` is strong.
///
/// # Examples
///
/// ```
/// use tr_ref::{Mutable, Strong, Weak, check_null_pointer};
///
/// let mut x = 5;
/// assert!(check_null_pointer::<i32, Strong, Mutable>(&raw mut x).is_ok());
/// assert!(check_null_pointer::<i32, Strong, Mutable>(core::ptr::null_mut()).is_err());
/// assert!(check_null_pointer::<i32, Weak, Mutable>(core::ptr::null_mut()).is_ok());
/// ```
#[inline]
pub fn check_null_pointer<T, S: Strength, A: Access>(
    ptr: *mut T,
) -> Result<ValPtr<T, S, A>, NullPointerError> {
    ValPtr::new(ptr).ok_or_else(NullPointerError::of::<T>)
}

/// [`ValPtr::upgrade`], failing with [`NullPointerError`].
#[inline]
pub fn upgrade_ptr<T, A: Access>(
    ptr: ValPtr<T, Weak, A>,
) -> Result<ValPtr<T, Strong, A>, NullPointerError> {
    ptr.upgrade().ok_or_else(NullPointerError::of::<T>)
}

/// Requires `index < array.size()`, except for the sentinel of a weak index.
#[inline]
pub(crate) fn check_index_range<T, S, R>(
    array: &R,
    index: T::Index,
) -> Result<T::Index, IndexRangeError>
where
    T: Domain,
    S: Strength,
    R: BackingArray<Item = T> + ?Sized,
{
    if !S::STRONG && index.is_sentinel() {
        return Ok(index);
    }
    match index.to_usize() {
        Some(slot) if slot < array.size() => Ok(index),
        _ => Err(IndexRangeError::of::<T>(index.to_i128(), array.size())),
    }
}

/// Requires `ptr == &array[index]`. `index` must already be in range.
#[inline]
pub(crate) fn check_index_match<T, R>(
    array: &R,
    ptr: *const T,
    index: T::Index,
) -> Result<T::Index, IndexMismatchError>
where
    T: Domain,
    R: BackingArray<Item = T> + ?Sized,
{
    let expect = match index.to_usize() {
        Some(slot) => array.slot_ptr(slot),
        None => ptr::null(),
    };
    if ptr::eq(expect, ptr) {
        Ok(index)
    } else {
        Err(IndexMismatchError::of::<T>(
            index.to_i128(),
            expect.addr(),
            ptr.addr(),
        ))
    }
}

/// Computes the slot `ptr` points at, by address arithmetic.
///
/// Wrapping: a pointer below the table yields a huge slot that fails the
/// range check. A pointer between two slots rounds down and fails the match.
pub(crate) fn resolve_slot<T, R>(array: &R, ptr: *const T) -> usize
where
    R: BackingArray<Item = T> + ?Sized,
{
    let stride = size_of::<T>().max(1);
    let offset = ptr.addr().wrapping_sub(array.base_ptr().addr());
    let slot = offset / stride;
    if offset % stride != 0 && slot < array.size() {
        log::warn!(
            "pointer {ptr:p} is inside a table of {} but not on a slot boundary",
            tr_utils::DebugName::type_name::<T>(),
        );
    }
    slot
}

#[cfg(test)]
mod tests {
    use tr_ptr::{Mutable, Strong, Weak};

    use super::*;

    #[allow(dead_code, reason = "only addresses are used")]
    struct Item(u64);

    static ITEMS: [Item; 4] = [Item(0), Item(1), Item(2), Item(3)];

    impl Domain for Item {
        type Index = u8;
        type Array = [Item; 4];

        fn array() -> &'static Self::Array {
            &ITEMS
        }
    }

    #[test]
    fn null_pointer() {
        assert!(check_null_pointer::<Item, Weak, Mutable>(ptr::null_mut()).is_ok());
        assert!(check_null_pointer::<Item, Strong, Mutable>(ptr::null_mut()).is_err());
    }

    #[test]
    fn upgrade_pointer() {
        let weak = ValPtr::<Item, Weak, Mutable>::weak((&raw const ITEMS[1]).cast_mut());
        assert_eq!(upgrade_ptr(weak).unwrap(), weak);
        assert!(upgrade_ptr(ValPtr::<Item, Weak, Mutable>::null()).is_err());
    }

    #[test]
    fn index_range() {
        assert_eq!(check_index_range::<Item, Weak, _>(&ITEMS, 3), Ok(3));
        assert_eq!(check_index_range::<Item, Weak, _>(&ITEMS, u8::MAX), Ok(u8::MAX));
        assert!(check_index_range::<Item, Weak, _>(&ITEMS, 4).is_err());
        assert!(check_index_range::<Item, Strong, _>(&ITEMS, u8::MAX).is_err());
    }

    #[test]
    fn index_match() {
        let p = &raw const ITEMS[2];
        assert_eq!(check_index_match(&ITEMS, p, 2), Ok(2));
        let e = check_index_match(&ITEMS, p, 1).unwrap_err();
        assert_eq!(e.expect, (&raw const ITEMS[1]).addr());
        assert_eq!(e.actual, p.addr());
    }

    #[test]
    fn slot_from_pointer() {
        for i in 0..ITEMS.len() {
            assert_eq!(resolve_slot(&ITEMS, &raw const ITEMS[i]), i);
        }
        let before = ITEMS.as_ptr().wrapping_sub(1);
        assert!(resolve_slot(&ITEMS, before) >= ITEMS.len());
        let between = ITEMS.as_ptr().cast::<u8>().wrapping_add(3).cast::<Item>();
        assert_eq!(resolve_slot(&ITEMS, between), 0);
    }
}
