use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use crate::marker::{Access, Mutable, ReadOnly, Strength, Strong, Weak};

// -----------------------------------------------------------------------------
// ValPtr

/// A pointer to an element of an entity table, tagged with its validity.
///
/// - `ValPtr<T, Weak, A>` stores any pointer, including null. It guarantees
///   nothing, just like a raw pointer.
/// - `ValPtr<T, Strong, A>` is never null. Building one from a null pointer
///   fails.
///
/// The access flag `A` decides whether [`as_mut_ptr`](ValPtr::as_mut_ptr) is
/// available. A [`Mutable`] pointer converts into a [`ReadOnly`] one, never the
/// other way around.
///
/// Pointers only compare with pointers to the same element type, so comparing
/// handles of unrelated entity kinds does not compile.
///
/// # Examples
///
/// ```
/// use tr_ptr::{ValPtr, Weak, Strong, Mutable};
///
/// let mut x = 10;
/// let raw = &raw mut x;
///
/// let weak = ValPtr::<i32, Weak, Mutable>::weak(raw);
/// let strong = weak.upgrade().expect("pointer is null!");
///
/// assert_eq!(unsafe { *strong.as_ref() }, 10);
/// assert!(weak == strong);
///
/// assert!(ValPtr::<i32, Strong, Mutable>::new(core::ptr::null_mut()).is_none());
/// ```
///
/// Comparing with a pointer to another element type does not compile:
///
/// ```compile_fail
/// use tr_ptr::{Mutable, ValPtr, Weak};
///
/// let mut a = 1u32;
/// let b = 2u64;
/// let p = ValPtr::<u32, Weak, Mutable>::weak(&raw mut a);
/// let _ = p == &raw const b;
/// ```
///
/// Neither does taking a `*mut T` out of a read-only pointer:
///
/// ```compile_fail
/// use tr_ptr::{ReadOnly, Strong, ValPtr};
///
/// let x = 1u32;
/// let p = ValPtr::<u32, Strong, ReadOnly>::from_ref(&x);
/// let _ = p.as_mut_ptr();
/// ```
#[repr(transparent)]
pub struct ValPtr<T, S: Strength = Weak, A: Access = Mutable> {
    ptr: *mut T,
    _marker: PhantomData<(S, A)>,
}

impl<T, S: Strength, A: Access> ValPtr<T, S, A> {
    /// Creates a pointer of any strength.
    ///
    /// Returns `None` only if `S` is [`Strong`] and `ptr` is null.
    #[inline]
    pub fn new(ptr: *mut T) -> Option<Self> {
        if S::STRONG && ptr.is_null() {
            None
        } else {
            Some(Self {
                ptr,
                _marker: PhantomData,
            })
        }
    }

    /// Creates a pointer without checking for null.
    ///
    /// # Safety
    ///
    /// If `S` is [`Strong`], `ptr` must be non-null.
    #[inline(always)]
    pub const unsafe fn new_unchecked(ptr: *mut T) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// Acquires the underlying `*const` pointer.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Returns `true` if the pointer is null. Always `false` for [`Strong`].
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Keeps the strength, drops the access flag to [`ReadOnly`].
    #[inline(always)]
    pub const fn into_read_only(self) -> ValPtr<T, S, ReadOnly> {
        ValPtr {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }
}

impl<T, S: Strength> ValPtr<T, S, Mutable> {
    /// Acquires the underlying `*mut` pointer.
    #[inline(always)]
    pub const fn as_mut_ptr(&self) -> *mut T {
        self.ptr
    }
}

impl<T, A: Access> ValPtr<T, Weak, A> {
    /// Wraps `ptr` as-is, null included.
    #[inline(always)]
    pub const fn weak(ptr: *mut T) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// The null pointer.
    #[inline(always)]
    pub const fn null() -> Self {
        Self::weak(ptr::null_mut())
    }

    /// Checks for null and returns a [`Strong`] pointer.
    #[inline]
    pub fn upgrade(self) -> Option<ValPtr<T, Strong, A>> {
        ValPtr::new(self.ptr)
    }

    /// Returns `None` if the pointer is null, or a shared reference otherwise.
    ///
    /// # Safety
    ///
    /// See [`pointer::as_ref`](https://doc.rust-lang.org/std/primitive.pointer.html#method.as_ref).
    #[inline(always)]
    pub unsafe fn as_ref<'a>(&self) -> Option<&'a T> {
        // SAFETY: Ensured by caller.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> ValPtr<T, Weak, Mutable> {
    /// Returns `None` if the pointer is null, or a unique reference otherwise.
    ///
    /// # Safety
    ///
    /// See [`pointer::as_mut`](https://doc.rust-lang.org/std/primitive.pointer.html#method.as_mut).
    #[inline(always)]
    pub unsafe fn as_mut<'a>(&self) -> Option<&'a mut T> {
        // SAFETY: Ensured by caller.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T, A: Access> ValPtr<T, Strong, A> {
    /// Converts a mutable reference to a strong pointer.
    #[inline(always)]
    pub const fn from_mut(r: &mut T) -> Self {
        Self {
            ptr: r,
            _marker: PhantomData,
        }
    }

    /// Returns the pointer as a [`NonNull`].
    #[inline(always)]
    pub const fn as_non_null(&self) -> NonNull<T> {
        // SAFETY: Strong pointers are never null.
        unsafe { NonNull::new_unchecked(self.ptr) }
    }

    /// Forgets the non-null guarantee.
    #[inline(always)]
    pub const fn downgrade(self) -> ValPtr<T, Weak, A> {
        ValPtr::weak(self.ptr)
    }

    /// Returns a shared reference to the element.
    ///
    /// # Safety
    ///
    /// The pointer is non-null, but the element must still be
    /// [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion):
    /// the table must be alive and the slot must not be mutably aliased.
    #[inline(always)]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        // SAFETY: Non-null by construction, the rest is ensured by caller.
        unsafe { &*self.ptr }
    }
}

impl<T> ValPtr<T, Strong, ReadOnly> {
    /// Converts a shared reference to a strong read-only pointer.
    #[inline(always)]
    pub const fn from_ref(r: &T) -> Self {
        Self {
            ptr: ptr::from_ref(r).cast_mut(),
            _marker: PhantomData,
        }
    }
}

impl<T> ValPtr<T, Strong, Mutable> {
    /// Returns a unique reference to the element.
    ///
    /// # Safety
    ///
    /// Same as [`as_ref`](ValPtr::as_ref), and no other reference to the slot
    /// may be alive for `'a`.
    #[inline(always)]
    pub unsafe fn as_mut<'a>(&self) -> &'a mut T {
        // SAFETY: Non-null by construction, the rest is ensured by caller.
        unsafe { &mut *self.ptr }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl<T, A: Access> From<ValPtr<T, Strong, A>> for ValPtr<T, Weak, A> {
    #[inline(always)]
    fn from(value: ValPtr<T, Strong, A>) -> Self {
        value.downgrade()
    }
}

impl<T, S: Strength> From<ValPtr<T, S, Mutable>> for ValPtr<T, S, ReadOnly> {
    #[inline(always)]
    fn from(value: ValPtr<T, S, Mutable>) -> Self {
        value.into_read_only()
    }
}

impl<T> From<ValPtr<T, Strong, Mutable>> for ValPtr<T, Weak, ReadOnly> {
    #[inline(always)]
    fn from(value: ValPtr<T, Strong, Mutable>) -> Self {
        value.downgrade().into_read_only()
    }
}

impl<T, A: Access> From<NonNull<T>> for ValPtr<T, Strong, A> {
    #[inline(always)]
    fn from(value: NonNull<T>) -> Self {
        Self {
            ptr: value.as_ptr(),
            _marker: PhantomData,
        }
    }
}

// -----------------------------------------------------------------------------
// Comparison

impl<T, S: Strength, A: Access, S2: Strength, A2: Access> PartialEq<ValPtr<T, S2, A2>>
    for ValPtr<T, S, A>
{
    #[inline(always)]
    fn eq(&self, other: &ValPtr<T, S2, A2>) -> bool {
        ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T, S: Strength, A: Access> Eq for ValPtr<T, S, A> {}

impl<T, S: Strength, A: Access> PartialEq<*const T> for ValPtr<T, S, A> {
    #[inline(always)]
    fn eq(&self, other: &*const T) -> bool {
        ptr::eq(self.as_ptr(), *other)
    }
}

impl<T, S: Strength, A: Access> PartialEq<*mut T> for ValPtr<T, S, A> {
    #[inline(always)]
    fn eq(&self, other: &*mut T) -> bool {
        ptr::eq(self.as_ptr(), other.cast_const())
    }
}

impl<T, S: Strength, A: Access> Hash for ValPtr<T, S, A> {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
    }
}

// -----------------------------------------------------------------------------
// Common traits

impl<T, S: Strength, A: Access> Clone for ValPtr<T, S, A> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S: Strength, A: Access> Copy for ValPtr<T, S, A> {}

impl<T, S: Strength, A: Access> fmt::Pointer for ValPtr<T, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.ptr, f)
    }
}

impl<T, S: Strength, A: Access> fmt::Debug for ValPtr<T, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Ptr({:p})", S::NAME, self.ptr)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::ptr;

    use super::ValPtr;
    use crate::marker::{Mutable, ReadOnly, Strong, Weak};

    #[test]
    fn weak_keeps_null() {
        let p = ValPtr::<u32, Weak, Mutable>::weak(ptr::null_mut());
        assert!(p.is_null());
        assert!(p == ValPtr::<u32, Weak, Mutable>::null());
        assert!(p.upgrade().is_none());
        assert!(unsafe { p.as_ref() }.is_none());
    }

    #[test]
    fn strong_rejects_null() {
        assert!(ValPtr::<u32, Strong, Mutable>::new(ptr::null_mut()).is_none());
        assert!(ValPtr::<u32, Strong, ReadOnly>::new(ptr::null_mut()).is_none());
        assert!(ValPtr::<u32, Weak, ReadOnly>::new(ptr::null_mut()).is_some());
    }

    #[test]
    fn strong_from_element() {
        let mut table = [1u32, 2, 3];
        for i in 0..table.len() {
            let raw = &raw mut table[i];
            let p = ValPtr::<u32, Strong, Mutable>::new(raw).unwrap();
            assert!(p == raw);
            assert!(p == raw.cast_const());
            assert_eq!(p.as_non_null().as_ptr(), raw);
        }

        let p = ValPtr::<u32, Strong, Mutable>::from_mut(&mut table[1]);
        unsafe { *p.as_mut() = 20 };
        assert_eq!(table[1], 20);
    }

    #[test]
    fn downgrade_then_upgrade() {
        let x = 5u8;
        let strong = ValPtr::<u8, Strong, ReadOnly>::from_ref(&x);
        let weak: ValPtr<u8, Weak, ReadOnly> = strong.into();
        assert!(weak == strong);
        assert!(weak.upgrade().unwrap() == strong);
        assert_eq!(unsafe { *weak.as_ref().unwrap() }, 5);
    }

    #[test]
    fn mutable_to_read_only() {
        let mut x = 0i64;
        let strong = ValPtr::<i64, Strong, Mutable>::from_mut(&mut x);
        let ro: ValPtr<i64, Strong, ReadOnly> = strong.into();
        let weak_ro: ValPtr<i64, Weak, ReadOnly> = strong.into();
        assert!(ro == strong);
        assert!(weak_ro == ro);
        assert!(weak_ro == strong.as_mut_ptr());
    }

    #[test]
    fn distinct_elements_differ() {
        let table = [0u16; 4];
        let a = ValPtr::<u16, Strong, ReadOnly>::from_ref(&table[0]);
        let b = ValPtr::<u16, Strong, ReadOnly>::from_ref(&table[1]);
        assert!(a != b);
        assert!(a == a);
    }
}
