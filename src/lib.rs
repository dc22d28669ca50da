#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use tr_ptr;
pub use tr_ref;
pub use tr_utils;
