use thiserror::Error;
use tr_utils::DebugName;

// -----------------------------------------------------------------------------
// Error

/// A strong reference was built from a null pointer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("NULL pointer used for a strong {elem} reference")]
pub struct NullPointerError {
    pub elem: DebugName,
}

/// An index fell outside `[0, size)` of its table.
///
/// For weak references the sentinel is exempt; strong references reject it
/// like any other out-of-range value.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid index {index} used in {elem} array subscript of size {size}")]
pub struct IndexRangeError {
    pub elem: DebugName,
    pub index: i128,
    pub size: usize,
}

/// A pointer and an index were each valid but named different slots.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("pointer/index mismatch: {elem} index {index} is at {expect:#x}, pointer is {actual:#x}")]
pub struct IndexMismatchError {
    pub elem: DebugName,
    pub index: i128,
    /// Address of the slot named by `index`.
    pub expect: usize,
    /// Address carried by the pointer.
    pub actual: usize,
}

impl NullPointerError {
    #[inline]
    pub(crate) const fn of<T>() -> Self {
        Self {
            elem: DebugName::type_name::<T>(),
        }
    }
}

impl IndexRangeError {
    #[inline]
    pub(crate) const fn of<T>(index: i128, size: usize) -> Self {
        Self {
            elem: DebugName::type_name::<T>(),
            index,
            size,
        }
    }
}

impl IndexMismatchError {
    #[inline]
    pub(crate) const fn of<T>(index: i128, expect: usize, actual: usize) -> Self {
        Self {
            elem: DebugName::type_name::<T>(),
            index,
            expect,
            actual,
        }
    }
}

/// Any failure of reference validation.
///
/// All variants are contract violations: a bug upstream of the reference,
/// not an expected runtime condition. Callers that treat them as fatal use
/// [`handle_error`](ValidationError::handle_error).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Null pointer check failed: {0}")]
    NullPointer(NullPointerError),

    #[error("Index range check failed: {0}")]
    IndexRange(IndexRangeError),

    #[error("Index match check failed: {0}")]
    IndexMismatch(IndexMismatchError),
}

impl ValidationError {
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn handle_error(&self) -> ! {
        panic!("{self}");
    }
}

macro_rules! impl_from {
    ($name:ident, $variant:ident) => {
        impl From<$name> for ValidationError {
            #[inline]
            fn from(value: $name) -> Self {
                ValidationError::$variant(value)
            }
        }

        impl $name {
            #[cold]
            #[inline(never)]
            #[track_caller]
            pub fn handle_error(&self) -> ! {
                panic!("{self}");
            }

            #[inline]
            pub fn promote(self) -> ValidationError {
                ValidationError::$variant(self)
            }
        }
    };
}

impl_from!(NullPointerError, NullPointer);
impl_from!(IndexRangeError, IndexRange);
impl_from!(IndexMismatchError, IndexMismatch);

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    struct Object;

    #[test]
    fn messages() {
        let e = IndexRangeError::of::<Object>(10, 10);
        assert!(e.to_string().contains("invalid index 10"));
        assert!(e.to_string().ends_with("of size 10"));

        let e = IndexMismatchError::of::<Object>(4, 0x40, 0x30);
        assert!(e.to_string().contains("is at 0x40, pointer is 0x30"));

        let e: ValidationError = NullPointerError::of::<Object>().into();
        assert!(e.to_string().starts_with("Null pointer check failed: NULL pointer used"));
    }

    #[test]
    fn promote_keeps_kind() {
        let e = IndexRangeError::of::<Object>(-1, 3).promote();
        assert!(matches!(e, ValidationError::IndexRange(IndexRangeError { index: -1, size: 3, .. })));
    }

    #[test]
    #[should_panic(expected = "invalid index 7")]
    fn handle_error_panics() {
        IndexRangeError::of::<Object>(7, 2).promote().handle_error();
    }
}
