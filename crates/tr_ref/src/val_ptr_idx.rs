use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr;

use tr_ptr::{Access, Mutable, ReadOnly, Strength, Strong, ValPtr, Weak};
use tr_utils::DebugName;
use tr_utils::num::IndexInt;

use crate::array::{BackingArray, Domain};
use crate::check::{
    check_index_match, check_index_range, check_null_pointer, resolve_slot, upgrade_ptr,
};
use crate::constant::Constant;
use crate::error::{IndexRangeError, ValidationError};
use crate::val_idx::ValIdx;

// -----------------------------------------------------------------------------
// ValPtrIdx

/// A pointer and an index that name the same slot of the table of `T`.
///
/// Both halves share one strength `S`:
///
/// - `ValPtrIdx<T, Weak, A>` may be the "no entity" reference: a null
///   pointer with the sentinel index. Otherwise the index is in range and the
///   pointer is the address of that slot.
/// - `ValPtrIdx<T, Strong, A>` is never null, its index is always in range,
///   and the pointer is always the address of that slot.
///
/// Every constructor validates, so the only way to a strong reference from
/// unknown data goes through the same three checks: non-null, in range,
/// pointer and index agree. [`upgrade`](ValPtrIdx::upgrade) is that
/// chokepoint for references that were already built.
///
/// # Examples
///
/// ```
/// use tr_ref::{declare_domain, ValidationError, VPtrIdx, PtrIdx};
///
/// pub struct Object(u32);
///
/// static OBJECTS: [Object; 10] = [const { Object(0) }; 10];
///
/// declare_domain!(Object: u16 => [Object; 10] = OBJECTS);
///
/// let obj = VPtrIdx::<Object>::from_index(3).unwrap();
/// assert_eq!(obj.as_ptr(), &raw const OBJECTS[3]);
///
/// let p = (&raw const OBJECTS[3]).cast_mut();
/// assert!(VPtrIdx::<Object>::from_ptr_and_index(p, 3).is_ok());
/// assert!(matches!(
///     VPtrIdx::<Object>::from_ptr_and_index(p, 4),
///     Err(ValidationError::IndexMismatch(_))
/// ));
///
/// let none = PtrIdx::<Object>::from_index(u16::MAX).unwrap();
/// assert!(none.as_ptr().is_null());
/// assert!(none.upgrade().is_err());
/// ```
pub struct ValPtrIdx<T: Domain, S: Strength = Weak, A: Access = Mutable> {
    ptr: ValPtr<T, S, A>,
    idx: ValIdx<T, S>,
}

impl<T: Domain, S: Strength, A: Access> ValPtrIdx<T, S, A> {
    /// Builds a reference from an index into `array`.
    ///
    /// The index is range checked first. The pointer is then the address of
    /// that slot, or null for the sentinel of a weak reference.
    ///
    /// # Errors
    ///
    /// [`ValidationError::IndexRange`].
    pub fn from_index_in<R>(array: &R, index: T::Index) -> Result<Self, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        let idx = ValIdx::<T, S>::new_in(array, index)?;
        let raw = match idx.slot() {
            Some(slot) => array.slot_ptr(slot).cast_mut(),
            None => ptr::null_mut(),
        };
        let ptr = check_null_pointer::<T, S, A>(raw)?;
        Ok(Self { ptr, idx })
    }

    /// [`from_index_in`](ValPtrIdx::from_index_in) against the table of `T`.
    #[inline]
    pub fn from_index(index: T::Index) -> Result<Self, ValidationError> {
        Self::from_index_in(T::array(), index)
    }

    /// Builds a reference from a pointer and an index into `array`.
    ///
    /// Checks run in order: null (strong only), range, then agreement. A weak
    /// reference with the sentinel index skips the last two.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NullPointer`], [`ValidationError::IndexRange`] or
    /// [`ValidationError::IndexMismatch`], whichever fails first.
    pub fn from_ptr_and_index_in<R>(
        array: &R,
        ptr: *mut T,
        index: T::Index,
    ) -> Result<Self, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        let vptr = check_null_pointer::<T, S, A>(ptr)?;
        let idx = ValIdx::<T, S>::new_with_ptr_in(array, ptr, index)?;
        Ok(Self { ptr: vptr, idx })
    }

    /// [`from_ptr_and_index_in`](ValPtrIdx::from_ptr_and_index_in) against
    /// the table of `T`.
    #[inline]
    pub fn from_ptr_and_index(ptr: *mut T, index: T::Index) -> Result<Self, ValidationError> {
        Self::from_ptr_and_index_in(T::array(), ptr, index)
    }

    /// Builds a reference from a pointer into `array`, computing the index
    /// from the pointer's offset.
    ///
    /// A null pointer gives the "no entity" reference if weak, and fails if
    /// strong. A pointer outside the table fails the range check; a pointer
    /// between two slots fails the agreement check.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NullPointer`], [`ValidationError::IndexRange`] or
    /// [`ValidationError::IndexMismatch`].
    pub fn from_ptr_in<R>(array: &R, ptr: *mut T) -> Result<Self, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        let vptr = check_null_pointer::<T, S, A>(ptr)?;
        if ptr.is_null() {
            return Ok(Self {
                ptr: vptr,
                idx: ValIdx::new_unchecked(<T::Index as IndexInt>::SENTINEL),
            });
        }
        let slot = resolve_slot(array, ptr);
        // A computed slot never takes the sentinel bypass.
        let index = match <T::Index as IndexInt>::from_usize(slot) {
            Some(index) if slot < array.size() && !index.is_sentinel() => index,
            _ => return Err(IndexRangeError::of::<T>(slot as i128, array.size()).into()),
        };
        Self::from_ptr_and_index_in(array, ptr, index)
    }

    /// [`from_ptr_in`](ValPtrIdx::from_ptr_in) against the table of `T`.
    #[inline]
    pub fn from_ptr(ptr: *mut T) -> Result<Self, ValidationError> {
        Self::from_ptr_in(T::array(), ptr)
    }

    /// The pointer half.
    #[inline(always)]
    pub fn ptr(&self) -> ValPtr<T, S, A> {
        self.ptr
    }

    /// The index half.
    #[inline(always)]
    pub fn idx(&self) -> ValIdx<T, S> {
        self.idx
    }

    /// The raw `*const` pointer.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// The raw index.
    #[inline(always)]
    pub fn index(&self) -> T::Index {
        self.idx.get()
    }

    /// The slot position, `None` for the "no entity" reference.
    #[inline(always)]
    pub fn slot(&self) -> Option<usize> {
        self.idx.slot()
    }

    /// Keeps the strength, drops the access flag to [`ReadOnly`].
    #[inline(always)]
    pub fn into_read_only(self) -> ValPtrIdx<T, S, ReadOnly> {
        ValPtrIdx {
            ptr: self.ptr.into_read_only(),
            idx: self.idx,
        }
    }
}

impl<T: Domain, S: Strength> ValPtrIdx<T, S, Mutable> {
    /// The raw `*mut` pointer.
    #[inline(always)]
    pub fn as_mut_ptr(&self) -> *mut T {
        self.ptr.as_mut_ptr()
    }
}

// -----------------------------------------------------------------------------
// Weak

impl<T: Domain, A: Access> ValPtrIdx<T, Weak, A> {
    /// The "no entity" reference: null pointer, sentinel index.
    #[inline(always)]
    pub fn none() -> Self {
        Self {
            ptr: ValPtr::null(),
            idx: ValIdx::none(),
        }
    }

    /// Returns `true` if the index is the sentinel.
    #[inline(always)]
    pub fn is_none(&self) -> bool {
        self.idx.is_none()
    }

    /// Builds a reference from a named constant, against `array`.
    ///
    /// The index is stored unchecked. The pointer is null while the slot is
    /// not populated, that is, outside the table's current size.
    pub fn from_constant_in<R, const V: i128>(array: &R, c: Constant<T, V>) -> Self
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        let raw = match Constant::<T, V>::slot() {
            Some(slot) if slot < array.size() => array.slot_ptr(slot).cast_mut(),
            _ => {
                log::debug!(
                    "{} constant {} is outside a table of size {}, using a null pointer",
                    DebugName::type_name::<T>(),
                    V,
                    array.size(),
                );
                ptr::null_mut()
            }
        };
        Self {
            ptr: ValPtr::weak(raw),
            idx: ValIdx::<T, Weak>::from_constant(c),
        }
    }

    /// [`from_constant_in`](ValPtrIdx::from_constant_in) against the table
    /// of `T`.
    #[inline]
    pub fn from_constant<const V: i128>(c: Constant<T, V>) -> Self {
        Self::from_constant_in(T::array(), c)
    }

    /// Validates against `array` and returns a strong reference.
    ///
    /// Checks, in order: the pointer is non-null, the index is in range (the
    /// sentinel is not exempt), the pointer is the address of that slot.
    ///
    /// # Errors
    ///
    /// The first failing check, as [`ValidationError::NullPointer`],
    /// [`ValidationError::IndexRange`] or [`ValidationError::IndexMismatch`].
    pub fn upgrade_in<R>(self, array: &R) -> Result<ValPtrIdx<T, Strong, A>, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        let result = Self::validate_strong(array, self.ptr, self.idx.get());
        if let Err(e) = &result {
            log::debug!("upgrade of {self:?} failed: {e}");
        }
        result
    }

    /// [`upgrade_in`](ValPtrIdx::upgrade_in) against the table of `T`.
    #[inline]
    pub fn upgrade(self) -> Result<ValPtrIdx<T, Strong, A>, ValidationError> {
        self.upgrade_in(T::array())
    }

    fn validate_strong<R>(
        array: &R,
        ptr: ValPtr<T, Weak, A>,
        index: T::Index,
    ) -> Result<ValPtrIdx<T, Strong, A>, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        let ptr = upgrade_ptr(ptr)?;
        let index = check_index_range::<T, Strong, R>(array, index)?;
        let index = check_index_match(array, ptr.as_ptr(), index)?;
        Ok(ValPtrIdx {
            ptr,
            idx: ValIdx::new_unchecked(index),
        })
    }

    /// Returns `None` for a null pointer, or a shared reference otherwise.
    ///
    /// # Safety
    ///
    /// See [`ValPtr::as_ref`].
    #[inline(always)]
    pub unsafe fn as_ref<'a>(&self) -> Option<&'a T> {
        // SAFETY: Ensured by caller.
        unsafe { self.ptr.as_ref() }
    }
}

// -----------------------------------------------------------------------------
// Strong

impl<T: Domain, A: Access> ValPtrIdx<T, Strong, A> {
    /// Builds a strong reference from a named constant, against `array`.
    ///
    /// When the table has a static size, an out-of-range constant is a
    /// compile error. The runtime check always runs as well.
    ///
    /// # Errors
    ///
    /// [`ValidationError::IndexRange`] if the table is dynamically sized and
    /// the constant is outside it.
    pub fn from_constant_in<R, const V: i128>(
        array: &R,
        c: Constant<T, V>,
    ) -> Result<Self, ValidationError>
    where
        R: BackingArray<Item = T> + ?Sized,
    {
        Constant::<T, V>::assert_static_bound();
        Self::from_index_in(array, c.index())
    }

    /// [`from_constant_in`](ValPtrIdx::from_constant_in) against the table
    /// of `T`.
    #[inline]
    pub fn from_constant<const V: i128>(c: Constant<T, V>) -> Result<Self, ValidationError> {
        Self::from_constant_in(T::array(), c)
    }

    /// The slot position. Always in range of the table at construction.
    #[inline]
    pub fn get(&self) -> usize {
        // In range, so never the sentinel and never negative.
        self.idx.slot().unwrap_or_default()
    }

    /// Forgets the guarantees. Never fails.
    #[inline(always)]
    pub fn downgrade(self) -> ValPtrIdx<T, Weak, A> {
        ValPtrIdx {
            ptr: self.ptr.downgrade(),
            idx: self.idx.downgrade(),
        }
    }

    /// Returns a shared reference to the element.
    ///
    /// # Safety
    ///
    /// See [`ValPtr::as_ref`]. The table must still be alive.
    #[inline(always)]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        // SAFETY: Ensured by caller.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T: Domain> ValPtrIdx<T, Strong, Mutable> {
    /// Returns a unique reference to the element.
    ///
    /// # Safety
    ///
    /// See [`ValPtr::as_mut`]. The table must still be alive and no other
    /// reference to the slot may be used for `'a`.
    #[inline(always)]
    pub unsafe fn as_mut<'a>(&self) -> &'a mut T {
        // SAFETY: Ensured by caller.
        unsafe { self.ptr.as_mut() }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl<T: Domain, A: Access> From<ValPtrIdx<T, Strong, A>> for ValPtrIdx<T, Weak, A> {
    #[inline(always)]
    fn from(value: ValPtrIdx<T, Strong, A>) -> Self {
        value.downgrade()
    }
}

impl<T: Domain, S: Strength> From<ValPtrIdx<T, S, Mutable>> for ValPtrIdx<T, S, ReadOnly> {
    #[inline(always)]
    fn from(value: ValPtrIdx<T, S, Mutable>) -> Self {
        value.into_read_only()
    }
}

impl<T: Domain> From<ValPtrIdx<T, Strong, Mutable>> for ValPtrIdx<T, Weak, ReadOnly> {
    #[inline(always)]
    fn from(value: ValPtrIdx<T, Strong, Mutable>) -> Self {
        value.downgrade().into_read_only()
    }
}

impl<T: Domain, A: Access, const V: i128> From<Constant<T, V>> for ValPtrIdx<T, Weak, A> {
    #[inline(always)]
    fn from(value: Constant<T, V>) -> Self {
        Self::from_constant(value)
    }
}

impl<T: Domain, S: Strength, A: Access> From<ValPtrIdx<T, S, A>> for ValPtr<T, S, A> {
    #[inline(always)]
    fn from(value: ValPtrIdx<T, S, A>) -> Self {
        value.ptr
    }
}

impl<T: Domain, S: Strength, A: Access> From<ValPtrIdx<T, S, A>> for ValIdx<T, S> {
    #[inline(always)]
    fn from(value: ValPtrIdx<T, S, A>) -> Self {
        value.idx
    }
}

// -----------------------------------------------------------------------------
// Comparison

// Both halves are compared, so a pair that bypassed validation never
// compares equal to a validated one that only shares its pointer.
impl<T, S, A, S2, A2> PartialEq<ValPtrIdx<T, S2, A2>> for ValPtrIdx<T, S, A>
where
    T: Domain,
    S: Strength,
    A: Access,
    S2: Strength,
    A2: Access,
{
    #[inline(always)]
    fn eq(&self, other: &ValPtrIdx<T, S2, A2>) -> bool {
        self.ptr == other.ptr && self.idx == other.idx
    }
}

impl<T: Domain, S: Strength, A: Access> Eq for ValPtrIdx<T, S, A> {}

impl<T, S, A, S2, A2> PartialEq<ValPtr<T, S2, A2>> for ValPtrIdx<T, S, A>
where
    T: Domain,
    S: Strength,
    A: Access,
    S2: Strength,
    A2: Access,
{
    #[inline(always)]
    fn eq(&self, other: &ValPtr<T, S2, A2>) -> bool {
        self.ptr == *other
    }
}

impl<T: Domain, S: Strength, A: Access, S2: Strength> PartialEq<ValIdx<T, S2>>
    for ValPtrIdx<T, S, A>
{
    #[inline(always)]
    fn eq(&self, other: &ValIdx<T, S2>) -> bool {
        self.idx == *other
    }
}

impl<T: Domain, S: Strength, A: Access> PartialEq<*const T> for ValPtrIdx<T, S, A> {
    #[inline(always)]
    fn eq(&self, other: &*const T) -> bool {
        self.ptr == *other
    }
}

impl<T: Domain, S: Strength, A: Access> PartialEq<*mut T> for ValPtrIdx<T, S, A> {
    #[inline(always)]
    fn eq(&self, other: &*mut T) -> bool {
        self.ptr == *other
    }
}

impl<T: Domain, A: Access, const V: i128> PartialEq<Constant<T, V>> for ValPtrIdx<T, Weak, A> {
    #[inline(always)]
    fn eq(&self, other: &Constant<T, V>) -> bool {
        self.idx == *other
    }
}

impl<T: Domain, A: Access, const V: i128> PartialEq<Constant<T, V>> for ValPtrIdx<T, Strong, A> {
    #[inline(always)]
    fn eq(&self, other: &Constant<T, V>) -> bool {
        self.idx == *other
    }
}

macro_rules! impl_eq_raw_index {
    ($($Int:ty),*) => {$(
        impl<T: Domain<Index = $Int>, S: Strength, A: Access> PartialEq<$Int> for ValPtrIdx<T, S, A> {
            #[inline(always)]
            fn eq(&self, other: &$Int) -> bool {
                self.idx == *other
            }
        }
    )*};
}

impl_eq_raw_index!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl<T: Domain, S: Strength, A: Access> Hash for ValPtrIdx<T, S, A> {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
        self.idx.hash(state);
    }
}

// -----------------------------------------------------------------------------
// Common traits

impl<T: Domain, S: Strength, A: Access> Clone for ValPtrIdx<T, S, A> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Domain, S: Strength, A: Access> Copy for ValPtrIdx<T, S, A> {}

impl<T: Domain, S: Strength, A: Access> fmt::Debug for ValPtrIdx<T, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValPtrIdx")
            .field("ptr", &self.ptr)
            .field("idx", &self.idx)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
