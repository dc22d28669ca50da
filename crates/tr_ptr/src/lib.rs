//! Pointer references into entity tables.
//!
//! A raw pointer into a table says nothing about whether it may be
//! dereferenced. This crate tags the pointer with two type-level flags:
//!
//! **Strength**
//!
//! [`ValPtr<T, Weak, A>`] may be null, exactly like a raw pointer.
//! [`ValPtr<T, Strong, A>`] is checked for null once, at construction, and
//! can then be turned into a reference.
//!
//! **Access**
//!
//! [`ValPtr<T, S, Mutable>`] hands out `*mut T`; [`ValPtr<T, S, ReadOnly>`]
//! only `*const T`. The conversion from mutable to read-only is free, the
//! reverse does not exist.
//!
//! Index validation and the pairing of a pointer with its index live in
//! `tr_ref`, which builds on these types.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod marker;

mod val_ptr;

// -----------------------------------------------------------------------------
// Top-level exports

pub use marker::{Access, Mutable, ReadOnly, Strength, Strong, Weak};
pub use val_ptr::ValPtr;
