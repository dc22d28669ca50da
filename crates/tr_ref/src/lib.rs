#![doc = include_str!("../README.md")]
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod check;
mod constant;
mod domain;
mod val_idx;
mod val_ptr_idx;

#[cfg(feature = "serde")]
mod serde_impls;

pub mod error;

// -----------------------------------------------------------------------------
// Top-level exports

pub use tr_ptr::{Access, Mutable, ReadOnly, Strength, Strong, ValPtr, Weak};
pub use tr_utils::{DebugName, num};

pub use array::{BackingArray, Domain, array_of};
pub use check::{check_null_pointer, upgrade_ptr};
pub use constant::Constant;
pub use domain::{CPtr, CPtrIdx, Idx, Ptr, PtrIdx, VCPtr, VCPtrIdx, VIdx, VPtr, VPtrIdx};
pub use error::{IndexMismatchError, IndexRangeError, NullPointerError, ValidationError};
pub use val_idx::ValIdx;
pub use val_ptr_idx::ValPtrIdx;
