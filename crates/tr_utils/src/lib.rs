#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod debug_name;

pub mod num;

// -----------------------------------------------------------------------------
// Top-level exports

pub use debug_name::DebugName;
