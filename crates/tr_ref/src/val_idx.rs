use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use tr_ptr::{Strength, Strong, Weak};
use tr_utils::num::IndexInt;

use crate::array::{BackingArray, Domain};
use crate::check::{check_index_match, check_index_range};
use crate::constant::Constant;
use crate::error::{IndexRangeError, ValidationError};

// -----------------------------------------------------------------------------
// ValIdx

/// An index into the table of `T`, validated against its bound.
///
/// - `ValIdx<T, Weak>` holds either the sentinel ("no entity") or an index
///   in `[0, size)`. The sentinel is stored without validation.
/// - `ValIdx<T, Strong>` always holds an index in `[0, size)`. The sentinel
///   is rejected like any other out-of-range value.
///
/// The bound is checked once, at construction. Holding an index across a
/// shrink of the table makes it stale; [`ValPtrIdx::upgrade`] re-validates.
///
/// [`ValPtrIdx::upgrade`]: crate::ValPtrIdx::upgrade
pub struct ValIdx<T: Domain, S: Strength = Weak> {
    index: T::Index,
    _marker: PhantomData<fn() -> (T, S)>,
}

impl<T: Domain, S: Strength> ValIdx<T, S> {
    #[inline(always)]
    pub(crate) const fn new_unchecked(index: T::Index) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Validates `index` against `array`.
    ///
    /// # Errors
    ///
    /// [`IndexRangeError`] if `index >= array.size()` or negative, unless
    /// this is a weak index and `index` is the sentinel.
    #[inline]
    pub fn new_in<R>(array: &R, index: T::Index) -> Result<Self, IndexRangeError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        check_index_range::<T, S, R>(array, index).map(Self::new_unchecked)
    }

    /// Validates `index` against the table of `T`.
    #[inline]
    pub fn new(index: T::Index) -> Result<Self, IndexRangeError> {
        Self::new_in(T::array(), index)
    }

    /// Validates `index` against `array`, then checks that `ptr` points at
    /// that slot.
    ///
    /// A weak sentinel index bypasses both checks.
    ///
    /// # Errors
    ///
    /// [`ValidationError::IndexRange`] first, then
    /// [`ValidationError::IndexMismatch`].
    pub fn new_with_ptr_in<R>(
        array: &R,
        ptr: *const T,
        index: T::Index,
    ) -> Result<Self, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        if !S::STRONG && index.is_sentinel() {
            return Ok(Self::new_unchecked(index));
        }
        let index = check_index_range::<T, S, R>(array, index)?;
        let index = check_index_match(array, ptr, index)?;
        Ok(Self::new_unchecked(index))
    }

    /// [`new_with_ptr_in`](ValIdx::new_with_ptr_in) against the table of `T`.
    #[inline]
    pub fn new_with_ptr(ptr: *const T, index: T::Index) -> Result<Self, ValidationError> {
        Self::new_with_ptr_in(T::array(), ptr, index)
    }

    /// The raw index.
    #[inline(always)]
    pub fn get(&self) -> T::Index {
        self.index
    }

    /// The slot position, `None` for the sentinel.
    #[inline]
    pub fn slot(&self) -> Option<usize> {
        if self.index.is_sentinel() {
            None
        } else {
            self.index.to_usize()
        }
    }
}

impl<T: Domain> ValIdx<T, Weak> {
    /// The "no entity" index.
    #[inline(always)]
    pub fn none() -> Self {
        Self::new_unchecked(<T::Index as IndexInt>::SENTINEL)
    }

    /// Returns `true` for the sentinel.
    #[inline(always)]
    pub fn is_none(&self) -> bool {
        self.index.is_sentinel()
    }

    /// Stores the constant's value without validation.
    #[inline(always)]
    pub fn from_constant<const V: i128>(c: Constant<T, V>) -> Self {
        Self::new_unchecked(c.index())
    }

    /// Re-validates against the table of `T`, without the sentinel bypass.
    #[inline]
    pub fn upgrade(self) -> Result<ValIdx<T, Strong>, IndexRangeError> {
        ValIdx::new(self.index)
    }
}

impl<T: Domain> ValIdx<T, Strong> {
    /// Builds a strong index from a named constant.
    ///
    /// When the table has a static size, an out-of-range constant is a
    /// compile error. The runtime check always runs as well.
    #[inline]
    pub fn from_constant<const V: i128>(c: Constant<T, V>) -> Result<Self, IndexRangeError> {
        Constant::<T, V>::assert_static_bound();
        Self::new(c.index())
    }

    /// Forgets the range guarantee.
    #[inline(always)]
    pub fn downgrade(self) -> ValIdx<T, Weak> {
        ValIdx::new_unchecked(self.index)
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl<T: Domain> From<ValIdx<T, Strong>> for ValIdx<T, Weak> {
    #[inline(always)]
    fn from(value: ValIdx<T, Strong>) -> Self {
        value.downgrade()
    }
}

impl<T: Domain, const V: i128> From<Constant<T, V>> for ValIdx<T, Weak> {
    #[inline(always)]
    fn from(value: Constant<T, V>) -> Self {
        Self::from_constant(value)
    }
}

// -----------------------------------------------------------------------------
// Comparison

impl<T: Domain, S: Strength, S2: Strength> PartialEq<ValIdx<T, S2>> for ValIdx<T, S> {
    #[inline(always)]
    fn eq(&self, other: &ValIdx<T, S2>) -> bool {
        self.index == other.index
    }
}

impl<T: Domain, S: Strength> Eq for ValIdx<T, S> {}

impl<T: Domain, const V: i128> PartialEq<Constant<T, V>> for ValIdx<T, Weak> {
    #[inline(always)]
    fn eq(&self, other: &Constant<T, V>) -> bool {
        self.index == other.index()
    }
}

impl<T: Domain, const V: i128> PartialEq<Constant<T, V>> for ValIdx<T, Strong> {
    #[inline(always)]
    fn eq(&self, other: &Constant<T, V>) -> bool {
        Constant::<T, V>::assert_static_bound();
        self.index == other.index()
    }
}

macro_rules! impl_eq_raw_index {
    ($($Int:ty),*) => {$(
        impl<T: Domain<Index = $Int>, S: Strength> PartialEq<$Int> for ValIdx<T, S> {
            #[inline(always)]
            fn eq(&self, other: &$Int) -> bool {
                self.index == *other
            }
        }
    )*};
}

impl_eq_raw_index!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl<T: Domain, S: Strength> Hash for ValIdx<T, S> {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

// -----------------------------------------------------------------------------
// Common traits

impl<T: Domain, S: Strength> Clone for ValIdx<T, S> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Domain, S: Strength> Copy for ValIdx<T, S> {}

impl<T: Domain, S: Strength> fmt::Debug for ValIdx<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index.is_sentinel() {
            write!(f, "{}Idx(none)", S::NAME)
        } else {
            write!(f, "{}Idx({})", S::NAME, self.index)
        }
    }
}

impl<T: Domain, S: Strength> fmt::Display for ValIdx<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.index, f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;

    use tr_ptr::{Strong, Weak};

    use super::ValIdx;
    use crate::array::Domain;
    use crate::constant::Constant;
    use crate::error::ValidationError;

    #[allow(dead_code, reason = "only addresses are used")]
    struct Wall(u32);

    static WALLS: [Wall; 6] = [Wall(0), Wall(1), Wall(2), Wall(3), Wall(4), Wall(5)];

    impl Domain for Wall {
        type Index = u16;
        type Array = [Wall; 6];

        fn array() -> &'static Self::Array {
            &WALLS
        }
    }

    const FIRST: Constant<Wall, 0> = Constant::new();
    const FAR: Constant<Wall, 40> = Constant::new();

    #[test]
    fn in_range() {
        for i in 0..6u16 {
            assert_eq!(ValIdx::<Wall, Weak>::new(i).unwrap().get(), i);
            assert_eq!(ValIdx::<Wall, Strong>::new(i).unwrap().get(), i);
        }
    }

    #[test]
    fn out_of_range() {
        let e = ValIdx::<Wall, Weak>::new(6).unwrap_err();
        assert_eq!((e.index, e.size), (6, 6));
        assert!(ValIdx::<Wall, Strong>::new(6).is_err());
    }

    #[test]
    fn sentinel() {
        let none = ValIdx::<Wall, Weak>::new(u16::MAX).unwrap();
        assert!(none.is_none());
        assert_eq!(none, ValIdx::<Wall, Weak>::none());
        assert_eq!(none.slot(), None);

        let e = ValIdx::<Wall, Strong>::new(u16::MAX).unwrap_err();
        assert_eq!(e.index, u16::MAX as i128);

        // An empty table still accepts the sentinel.
        let empty: [Wall; 0] = [];
        assert!(ValIdx::<Wall, Weak>::new_in(&empty, u16::MAX).is_ok());
        assert!(ValIdx::<Wall, Weak>::new_in(&empty, 0).is_err());
    }

    #[test]
    fn with_pointer() {
        let p = &raw const WALLS[2];
        assert!(ValIdx::<Wall, Strong>::new_with_ptr(p, 2).is_ok());
        assert!(matches!(
            ValIdx::<Wall, Strong>::new_with_ptr(p, 3),
            Err(ValidationError::IndexMismatch(_))
        ));
        assert!(matches!(
            ValIdx::<Wall, Weak>::new_with_ptr(p, 9),
            Err(ValidationError::IndexRange(_))
        ));
        // The sentinel skips the agreement check of a weak index.
        assert!(ValIdx::<Wall, Weak>::new_with_ptr(p, u16::MAX).is_ok());
        assert!(ValIdx::<Wall, Strong>::new_with_ptr(p, u16::MAX).is_err());
    }

    #[test]
    fn constants() {
        let weak = ValIdx::<Wall, Weak>::from_constant(FAR);
        assert_eq!(weak, 40u16);
        assert_eq!(weak, FAR);
        assert!(weak.upgrade().is_err());

        let strong = ValIdx::<Wall, Strong>::from_constant(FIRST).unwrap();
        assert_eq!(strong, FIRST);
        assert_eq!(strong, 0u16);
        assert_ne!(strong, 1u16);
    }

    #[test]
    fn strengths_compare() {
        let strong = ValIdx::<Wall, Strong>::new(4).unwrap();
        let weak: ValIdx<Wall, Weak> = strong.into();
        assert_eq!(weak, strong);
        assert_eq!(strong, weak);
        assert_eq!(weak.upgrade().unwrap(), strong);
    }

    #[test]
    fn formatting() {
        assert_eq!(format!("{:?}", ValIdx::<Wall, Weak>::none()), "WeakIdx(none)");
        assert_eq!(format!("{:?}", ValIdx::<Wall, Strong>::new(3).unwrap()), "StrongIdx(3)");
        assert_eq!(format!("{}", ValIdx::<Wall, Strong>::new(3).unwrap()), "3");
    }
}
