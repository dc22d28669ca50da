use alloc::vec::Vec;

use tr_utils::num::IndexInt;

// -----------------------------------------------------------------------------
// BackingArray

/// A contiguous table that references are validated against.
///
/// The table is owned elsewhere. Validation only reads its current
/// [`size`](BackingArray::size) and the address of its first slot, at the
/// instant a reference is built.
///
/// Implementors must keep element addresses stable for as long as any
/// reference derived from the table is alive.
pub trait BackingArray {
    type Item;

    /// The capacity, when it is known at compile time.
    ///
    /// Symbolic constants are checked against it during compilation.
    const STATIC_SIZE: Option<usize> = None;

    /// Current number of elements.
    fn size(&self) -> usize;

    /// Address of slot `0`.
    fn base_ptr(&self) -> *const Self::Item;

    /// Address of slot `index`. Computing it never dereferences anything.
    #[inline]
    fn slot_ptr(&self, index: usize) -> *const Self::Item {
        self.base_ptr().wrapping_add(index)
    }
}

impl<T, const N: usize> BackingArray for [T; N] {
    type Item = T;

    const STATIC_SIZE: Option<usize> = Some(N);

    #[inline(always)]
    fn size(&self) -> usize {
        N
    }

    #[inline(always)]
    fn base_ptr(&self) -> *const T {
        self.as_ptr()
    }
}

impl<T> BackingArray for [T] {
    type Item = T;

    #[inline(always)]
    fn size(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn base_ptr(&self) -> *const T {
        self.as_ptr()
    }
}

impl<T> BackingArray for Vec<T> {
    type Item = T;

    #[inline(always)]
    fn size(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn base_ptr(&self) -> *const T {
        self.as_ptr()
    }
}

// -----------------------------------------------------------------------------
// Domain

/// Binds an element type to its one global table.
///
/// This is the array accessor: a pure, statically dispatched function from
/// element type to table. Because it is a trait implemented on the element
/// type, declaring a second table for the same type is a conflicting
/// implementation and fails to compile.
///
/// Usually implemented through [`declare_domain!`](crate::declare_domain).
///
/// # Examples
///
/// ```
/// use tr_ref::{BackingArray, Domain};
///
/// struct Segment(u8);
///
/// static SEGMENTS: [Segment; 3] = [Segment(0), Segment(1), Segment(2)];
///
/// impl Domain for Segment {
///     type Index = u16;
///     type Array = [Segment; 3];
///
///     fn array() -> &'static Self::Array {
///         &SEGMENTS
///     }
/// }
///
/// assert_eq!(tr_ref::array_of::<Segment>().size(), 3);
/// ```
pub trait Domain: Sized + 'static {
    /// The integral type used to index the table.
    type Index: IndexInt;

    /// The table type.
    type Array: BackingArray<Item = Self> + ?Sized + 'static;

    /// Returns the table.
    fn array() -> &'static Self::Array;
}

/// Returns the global table of `T`.
#[inline(always)]
pub fn array_of<T: Domain>() -> &'static T::Array {
    T::array()
}

// -----------------------------------------------------------------------------
// Tests
