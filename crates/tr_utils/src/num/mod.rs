use core::fmt::{Debug, Display};
use core::hash::Hash;

mod seal {
    pub trait Sealed {}
}

/// An integral type usable as the index of an entity table.
///
/// Every index type reserves one value, [`SENTINEL`](IndexInt::SENTINEL), the
/// all-bits-set pattern, to mean "deliberately no entity". For unsigned types
/// this is `MAX`, for signed types it is `-1`.
///
/// Because the sentinel is a real bit pattern of the type, a table indexed by
/// this type must hold fewer than [`MAX_LEN`](IndexInt::MAX_LEN) + 1 elements,
/// otherwise a valid slot would collide with the sentinel.
///
/// ```
/// use tr_utils::num::IndexInt;
///
/// assert_eq!(<u16 as IndexInt>::SENTINEL, u16::MAX);
/// assert_eq!(<i16 as IndexInt>::SENTINEL, -1);
/// assert_eq!(3u16.to_usize(), Some(3));
/// assert_eq!((-5i32).to_usize(), None);
/// ```
pub trait IndexInt:
    seal::Sealed + Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static
{
    /// The reserved "no entity" value.
    const SENTINEL: Self;

    /// The largest table length this type can address without an in-range
    /// index being equal to [`SENTINEL`](IndexInt::SENTINEL).
    const MAX_LEN: u128;

    /// Smallest value of the type, widened.
    const MIN_I128: i128;

    /// Largest value of the type, widened.
    const MAX_I128: i128;

    /// Converts to a slot position, `None` for negative values.
    fn to_usize(self) -> Option<usize>;

    /// Converts a slot position back, `None` if it does not fit.
    fn from_usize(n: usize) -> Option<Self>;

    /// Lossless widening used in error reports.
    fn to_i128(self) -> i128;

    /// Narrowing from a widened value, `None` if it does not fit.
    fn from_i128(v: i128) -> Option<Self>;

    /// Narrowing from a widened value that is known to fit.
    fn wrapping_from_i128(v: i128) -> Self;

    /// Returns `true` if `self` is the reserved sentinel.
    #[inline(always)]
    fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

macro_rules! impl_index_int {
    (unsigned: $($Int:ty),*) => {$(
        impl seal::Sealed for $Int {}

        impl IndexInt for $Int {
            const SENTINEL: Self = !0;
            const MAX_LEN: u128 = <$Int>::MAX as u128;
            const MIN_I128: i128 = <$Int>::MIN as i128;
            const MAX_I128: i128 = <$Int>::MAX as i128;

            #[inline]
            fn to_usize(self) -> Option<usize> {
                usize::try_from(self).ok()
            }

            #[inline]
            fn from_usize(n: usize) -> Option<Self> {
                <$Int>::try_from(n).ok()
            }

            #[inline(always)]
            fn to_i128(self) -> i128 {
                self as i128
            }

            #[inline]
            fn from_i128(v: i128) -> Option<Self> {
                <$Int>::try_from(v).ok()
            }

            #[inline(always)]
            fn wrapping_from_i128(v: i128) -> Self {
                v as $Int
            }
        }
    )*};
    (signed: $($Int:ty),*) => {$(
        impl seal::Sealed for $Int {}

        impl IndexInt for $Int {
            const SENTINEL: Self = !0;
            // `0..=MAX` are all addressable, the sentinel is negative.
            const MAX_LEN: u128 = <$Int>::MAX as u128 + 1;
            const MIN_I128: i128 = <$Int>::MIN as i128;
            const MAX_I128: i128 = <$Int>::MAX as i128;

            #[inline]
            fn to_usize(self) -> Option<usize> {
                usize::try_from(self).ok()
            }

            #[inline]
            fn from_usize(n: usize) -> Option<Self> {
                <$Int>::try_from(n).ok()
            }

            #[inline(always)]
            fn to_i128(self) -> i128 {
                self as i128
            }

            #[inline]
            fn from_i128(v: i128) -> Option<Self> {
                <$Int>::try_from(v).ok()
            }

            #[inline(always)]
            fn wrapping_from_i128(v: i128) -> Self {
                v as $Int
            }
        }
    )*};
}

impl_index_int!(unsigned: u8, u16, u32, u64, usize);
impl_index_int!(signed: i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::IndexInt;

    #[test]
    fn sentinel_is_all_bits_set() {
        assert_eq!(<u8 as IndexInt>::SENTINEL, 0xFF);
        assert_eq!(<u32 as IndexInt>::SENTINEL, u32::MAX);
        assert_eq!(<i8 as IndexInt>::SENTINEL, -1);
        assert_eq!(<isize as IndexInt>::SENTINEL, -1);
        assert!(u16::MAX.is_sentinel());
        assert!(!0u16.is_sentinel());
    }

    #[test]
    fn max_len_excludes_sentinel() {
        assert_eq!(<u8 as IndexInt>::MAX_LEN, 255);
        assert_eq!(<i8 as IndexInt>::MAX_LEN, 128);
        // The last addressable slot is never the sentinel.
        let last = (<u8 as IndexInt>::MAX_LEN - 1) as u8;
        assert!(!last.is_sentinel());
    }

    #[test]
    fn conversions() {
        assert_eq!(7i16.to_usize(), Some(7));
        assert_eq!((-1i16).to_usize(), None);
        assert_eq!(<u8 as IndexInt>::from_usize(256), None);
        assert_eq!(<u8 as IndexInt>::from_usize(255), Some(255));
        assert_eq!(<i16 as IndexInt>::from_i128(-1), Some(-1));
        assert_eq!(<u16 as IndexInt>::from_i128(-1), None);
        assert_eq!(u64::MAX.to_i128(), u64::MAX as i128);
    }
}
