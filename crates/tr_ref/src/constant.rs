use core::fmt;
use core::marker::PhantomData;

use tr_utils::num::IndexInt;

use crate::array::{BackingArray, Domain};

// -----------------------------------------------------------------------------
// Constant

/// A named, well-known slot of a domain's table, fixed at compile time.
///
/// The value lives in the type, so a constant costs nothing at runtime and
/// every check against it can run during compilation:
///
/// - building a `Constant` whose value does not fit `T::Index` fails to
///   compile;
/// - building a *strong* reference from it fails to compile when the table
///   has a static size and the value is outside it.
///
/// # Examples
///
/// ```
/// use tr_ref::{Constant, declare_domain};
///
/// pub struct Object(u32);
///
/// static OBJECTS: [Object; 8] = [const { Object(0) }; 8];
///
/// declare_domain!(Object: u16 => [Object; 8] = OBJECTS);
///
/// /// The player is always slot 0.
/// pub const PLAYER: Constant<Object, 0> = Constant::new();
///
/// assert_eq!(PLAYER.index(), 0u16);
/// assert_eq!(Constant::<Object, 0>::slot(), Some(0));
/// assert!(PLAYER.is_populated());
/// ```
pub struct Constant<T: Domain, const V: i128>(PhantomData<fn() -> T>);

impl<T: Domain, const V: i128> Constant<T, V> {
    /// The value, widened.
    pub const VALUE: i128 = V;

    /// Creates the constant, rejecting at compile time any value that does
    /// not fit the domain's index type.
    #[inline(always)]
    pub const fn new() -> Self {
        const {
            assert!(
                V >= <T::Index as IndexInt>::MIN_I128 && V <= <T::Index as IndexInt>::MAX_I128,
                "constant does not fit the index type of its domain",
            );
        }
        Self(PhantomData)
    }

    /// The value as the domain's index type.
    #[inline(always)]
    pub fn index(self) -> T::Index {
        <T::Index as IndexInt>::wrapping_from_i128(V)
    }

    /// The slot the value names, `None` if negative.
    #[inline]
    pub const fn slot() -> Option<usize> {
        if V < 0 || V > usize::MAX as i128 {
            None
        } else {
            Some(V as usize)
        }
    }

    /// Whether the slot exists in the table's current size.
    #[inline]
    pub fn is_populated(self) -> bool {
        match Self::slot() {
            Some(slot) => slot < T::array().size(),
            None => false,
        }
    }

    /// Fails the build if the table has a static size and the constant is
    /// outside it. A no-op for dynamically sized tables.
    #[inline(always)]
    pub(crate) const fn assert_static_bound() {
        const {
            if let Some(n) = <T::Array as BackingArray>::STATIC_SIZE {
                assert!(V >= 0 && V < n as i128, "invalid index used");
            }
        }
    }
}

impl<T: Domain, const V: i128> Clone for Constant<T, V> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Domain, const V: i128> Copy for Constant<T, V> {}

impl<T: Domain, const V: i128> Default for Constant<T, V> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Domain, const V: i128> fmt::Debug for Constant<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constant<{}>({})", tr_utils::DebugName::type_name::<T>(), V)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::Constant;
    use crate::array::Domain;

    struct Robot;

    static ROBOTS: [Robot; 5] = [const { Robot }; 5];

    impl Domain for Robot {
        type Index = i16;
        type Array = [Robot; 5];

        fn array() -> &'static Self::Array {
            &ROBOTS
        }
    }

    const BOSS: Constant<Robot, 4> = Constant::new();
    const SPARE: Constant<Robot, 9> = Constant::new();
    const NONE: Constant<Robot, -1> = Constant::new();

    #[test]
    fn values() {
        assert_eq!(Constant::<Robot, 4>::VALUE, 4);
        assert_eq!(BOSS.index(), 4i16);
        assert_eq!(NONE.index(), -1i16);
    }

    #[test]
    fn slots() {
        assert_eq!(Constant::<Robot, 4>::slot(), Some(4));
        assert_eq!(Constant::<Robot, -1>::slot(), None);
        assert!(BOSS.is_populated());
        assert!(!SPARE.is_populated());
        assert!(!NONE.is_populated());
    }

    #[test]
    fn debug() {
        let s = format!("{BOSS:?}");
        assert!(s.ends_with("(4)"));
    }
}
