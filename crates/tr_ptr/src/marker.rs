//! Type-level flags that select the validation rules of a reference.
//!
//! A reference is parameterized by a [`Strength`] and an [`Access`]:
//!
//! - [`Weak`] references may be null or carry the "no entity" sentinel.
//! - [`Strong`] references are non-null and in range once constructed.
//! - [`Mutable`] references may hand out `*mut T`.
//! - [`ReadOnly`] references only hand out `*const T`.
//!
//! Both traits are sealed, so no other strength or access exists.

mod seal {
    pub trait Marker {}
}

use seal::Marker;

/// Whether a reference is guaranteed valid.
pub trait Strength: Marker + 'static {
    const STRONG: bool;
    const NAME: &'static str;
}

/// Whether a reference permits mutable access to its element.
pub trait Access: Marker + 'static {
    const MUTABLE: bool;
}

/// A reference that may be null or hold the sentinel index.
pub struct Weak;

/// A reference that is non-null and in range.
pub struct Strong;

/// A reference through which the element may be written.
pub struct Mutable;

/// A read-only view of a (possibly mutable) table.
pub struct ReadOnly;

impl Marker for Weak {}
impl Marker for Strong {}
impl Marker for Mutable {}
impl Marker for ReadOnly {}

impl Strength for Weak {
    const STRONG: bool = false;
    const NAME: &'static str = "Weak";
}

impl Strength for Strong {
    const STRONG: bool = true;
    const NAME: &'static str = "Strong";
}

impl Access for Mutable {
    const MUTABLE: bool = true;
}

impl Access for ReadOnly {
    const MUTABLE: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert!(!<Weak as Strength>::STRONG);
        assert!(<Strong as Strength>::STRONG);
        assert!(<Mutable as Access>::MUTABLE);
        assert!(!<ReadOnly as Access>::MUTABLE);
    }
}
