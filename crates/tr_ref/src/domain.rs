//! Declaring an entity domain, and short names for its reference types.
//!
//! The prefixes follow one scheme: `V` is a strong ("valid") reference, `C`
//! is a read-only ("const") one. No prefix means weak and mutable.
//!
//! | alias           | strength | access   |
//! |-----------------|----------|----------|
//! | [`PtrIdx<T>`]   | weak     | mutable  |
//! | [`VPtrIdx<T>`]  | strong   | mutable  |
//! | [`CPtrIdx<T>`]  | weak     | read-only|
//! | [`VCPtrIdx<T>`] | strong   | read-only|
//!
//! A table too large for its index type, leaving no room for the sentinel,
//! fails to compile:
//!
//! ```compile_fail
//! use tr_ref::declare_domain;
//!
//! pub struct Cell(u8);
//!
//! static CELLS: [Cell; 256] = [const { Cell(0) }; 256];
//!
//! declare_domain!(Cell: u8 => [Cell; 256] = CELLS);
//! ```
//!
//! So does a strong reference to a constant outside a statically sized
//! table:
//!
//! ```compile_fail
//! use tr_ref::{Constant, VIdx, declare_domain};
//!
//! pub struct Cell(u8);
//!
//! static CELLS: [Cell; 4] = [const { Cell(0) }; 4];
//!
//! declare_domain!(Cell: u8 => [Cell; 4] = CELLS);
//!
//! const LAST: Constant<Cell, 4> = Constant::new();
//!
//! let _ = VIdx::<Cell>::from_constant(LAST);
//! ```
//!
//! References to different domains do not compare:
//!
//! ```compile_fail
//! use tr_ref::{PtrIdx, declare_domain};
//!
//! pub struct Wall(u8);
//! pub struct Door(u8);
//!
//! static WALLS: [Wall; 2] = [const { Wall(0) }; 2];
//! static DOORS: [Door; 2] = [const { Door(0) }; 2];
//!
//! declare_domain!(Wall: u8 => [Wall; 2] = WALLS);
//! declare_domain!(Door: u8 => [Door; 2] = DOORS);
//!
//! let wall = PtrIdx::<Wall>::from_index(0).unwrap();
//! let door = PtrIdx::<Door>::from_index(0).unwrap();
//! let _ = wall == door;
//! ```
//!
//! A read-only reference never becomes mutable again:
//!
//! ```compile_fail
//! use tr_ref::{CPtrIdx, PtrIdx, declare_domain};
//!
//! pub struct Wall(u8);
//!
//! static WALLS: [Wall; 2] = [const { Wall(0) }; 2];
//!
//! declare_domain!(Wall: u8 => [Wall; 2] = WALLS);
//!
//! let ro = CPtrIdx::<Wall>::from_index(0).unwrap();
//! let _: PtrIdx<Wall> = ro.into();
//! ```
//!
//! and does not hand out `*mut T`:
//!
//! ```compile_fail
//! use tr_ref::{VCPtrIdx, declare_domain};
//!
//! pub struct Wall(u8);
//!
//! static WALLS: [Wall; 2] = [const { Wall(0) }; 2];
//!
//! declare_domain!(Wall: u8 => [Wall; 2] = WALLS);
//!
//! let ro = VCPtrIdx::<Wall>::from_index(0).unwrap();
//! let _ = ro.as_mut_ptr();
//! ```

use tr_ptr::{Mutable, ReadOnly, Strong, ValPtr, Weak};

use crate::val_idx::ValIdx;
use crate::val_ptr_idx::ValPtrIdx;

/// Implements [`Domain`](crate::Domain) for an element type.
///
/// ```text
/// declare_domain!(Element: IndexType => ArrayType = PLACE);
/// ```
///
/// `PLACE` is a `static` of type `ArrayType`. When the array has a static
/// size, it must leave room for the index type's sentinel.
///
/// # Examples
///
/// ```
/// use tr_ref::{BackingArray, VPtrIdx, declare_domain};
///
/// pub struct Segment {
///     pub sides: [u16; 6],
/// }
///
/// static SEGMENTS: [Segment; 16] = [const { Segment { sides: [0; 6] } }; 16];
///
/// declare_domain!(Segment: u8 => [Segment; 16] = SEGMENTS);
///
/// assert_eq!(tr_ref::array_of::<Segment>().size(), 16);
///
/// let seg = VPtrIdx::<Segment>::from_index(15).unwrap();
/// // SAFETY: `SEGMENTS` is a static.
/// assert_eq!(unsafe { seg.as_ref() }.sides, [0; 6]);
/// ```
#[macro_export]
macro_rules! declare_domain {
    ($elem:ty : $index:ty => $array:ty = $place:expr) => {
        impl $crate::Domain for $elem {
            type Index = $index;
            type Array = $array;

            #[inline(always)]
            fn array() -> &'static Self::Array {
                &$place
            }
        }

        const _: () = {
            if let ::core::option::Option::Some(n) =
                <$array as $crate::BackingArray>::STATIC_SIZE
            {
                assert!(
                    n as u128 <= <$index as $crate::num::IndexInt>::MAX_LEN,
                    "table is too large for its index type",
                );
            }
        };
    };
}

/// Weak, mutable pointer and index.
pub type PtrIdx<T> = ValPtrIdx<T, Weak, Mutable>;
/// Strong, mutable pointer and index.
pub type VPtrIdx<T> = ValPtrIdx<T, Strong, Mutable>;
/// Weak, read-only pointer and index.
pub type CPtrIdx<T> = ValPtrIdx<T, Weak, ReadOnly>;
/// Strong, read-only pointer and index.
pub type VCPtrIdx<T> = ValPtrIdx<T, Strong, ReadOnly>;

/// Weak index.
pub type Idx<T> = ValIdx<T, Weak>;
/// Strong index.
pub type VIdx<T> = ValIdx<T, Strong>;

/// Weak, mutable pointer.
pub type Ptr<T> = ValPtr<T, Weak, Mutable>;
/// Strong, mutable pointer.
pub type VPtr<T> = ValPtr<T, Strong, Mutable>;
/// Weak, read-only pointer.
pub type CPtr<T> = ValPtr<T, Weak, ReadOnly>;
/// Strong, read-only pointer.
pub type VCPtr<T> = ValPtr<T, Strong, ReadOnly>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackingArray, Constant, Domain};

    pub struct Side(u8);

    static SIDES: [Side; 6] = [Side(0), Side(1), Side(2), Side(3), Side(4), Side(5)];

    declare_domain!(Side: i8 => [Side; 6] = SIDES);

    const BOTTOM: Constant<Side, 5> = Constant::new();

    #[test]
    fn declared() {
        assert_eq!(<Side as Domain>::array().size(), 6);
        assert_eq!(<<Side as Domain>::Array as BackingArray>::STATIC_SIZE, Some(6));
    }

    #[test]
    fn signed_sentinel() {
        let none = PtrIdx::<Side>::from_index(-1).unwrap();
        assert!(none.is_none());
        assert!(VPtrIdx::<Side>::from_index(-1).is_err());
        assert!(PtrIdx::<Side>::from_index(-2).is_err());
        assert!(Idx::<Side>::new(-1).is_ok());
        assert!(VIdx::<Side>::new(-1).is_err());
    }

    #[test]
    fn aliases() {
        let v: VCPtrIdx<Side> = VPtrIdx::<Side>::from_constant(BOTTOM).unwrap().into();
        let c: CPtrIdx<Side> = v.downgrade();
        assert_eq!(c, BOTTOM);
        // SAFETY: `SIDES` is a static.
        assert_eq!(unsafe { v.as_ref() }.0, 5);

        let p: VCPtr<Side> = v.ptr();
        assert_eq!(p, &raw const SIDES[5]);
        let mut x = 1u8;
        let _: VPtr<u8> = VPtr::from_mut(&mut x);
        let _: Ptr<u8> = Ptr::null();
        let _: CPtr<u8> = CPtr::null();
    }
}
