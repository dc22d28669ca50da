use core::fmt;

const ANONYMOUS_NAME: &str = "_unknown_";

// -----------------------------------------------------------------------------
// DebugName

/// The element type name of a table, carried by validation errors.
///
/// The name is only stored when `debug_assertions` are enabled or the `debug`
/// feature is active. Otherwise it displays `_unknown_`, so release builds do
/// not pay for type name strings.
///
/// # Examples
///
/// ```
/// use tr_utils::DebugName;
///
/// struct Segment;
///
/// let name = DebugName::type_name::<Segment>();
/// # #[cfg(debug_assertions)]
/// assert_eq!(format!("{name}"), "Segment");
///
/// let anonymous = DebugName::anonymous();
/// assert_eq!(format!("{anonymous}"), "_unknown_");
/// ```
#[derive(Clone, Copy)]
pub struct DebugName {
    #[cfg(any(debug_assertions, feature = "debug"))]
    name: fn() -> &'static str,
}

impl DebugName {
    /// Creates a `DebugName` that displays the type name of `T`.
    #[inline(always)]
    pub const fn type_name<T: ?Sized>() -> Self {
        #[cfg(any(debug_assertions, feature = "debug"))]
        {
            Self {
                name: core::any::type_name::<T>,
            }
        }
        #[cfg(not(any(debug_assertions, feature = "debug")))]
        {
            Self {}
        }
    }

    /// Creates an anonymous `DebugName` that always displays `_unknown_`.
    #[inline(always)]
    pub const fn anonymous() -> Self {
        #[cfg(any(debug_assertions, feature = "debug"))]
        {
            Self {
                name: || ANONYMOUS_NAME,
            }
        }
        #[cfg(not(any(debug_assertions, feature = "debug")))]
        {
            Self {}
        }
    }
}

/// Shortens a fully-qualified type name, keeping generic syntax intact.
///
/// `game::object::Object` becomes `Object`; `game::Kind::Robot` keeps the
/// uppercase enum segment and becomes `Kind::Robot`.
#[inline(never)]
#[cfg(any(debug_assertions, feature = "debug"))]
fn debug_fmt(full_name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fn collapse_type_name(name: &str) -> &str {
        let mut segments = name.rsplit("::");
        let Some(last) = segments.next() else {
            return name;
        };

        // As heuristic, we assume the enum type to be uppercase.
        if let Some(second_last) = segments.next()
            && second_last.starts_with(char::is_uppercase)
        {
            let index = name.len() - last.len() - second_last.len() - 2;
            &name[index..]
        } else {
            last
        }
    }

    const SPECIAL_CHARS: [char; 9] = [' ', '<', '>', '(', ')', '[', ']', ',', ';'];

    let mut rest = full_name;

    while !rest.is_empty() {
        if let Some(index) = rest.find(|c| SPECIAL_CHARS.contains(&c)) {
            f.write_str(collapse_type_name(&rest[0..index]))?;
            f.write_str(&rest[index..=index])?;
            rest = &rest[(index + 1)..];
        } else {
            return f.write_str(collapse_type_name(rest));
        }
    }

    Ok(())
}

impl fmt::Display for DebugName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(any(debug_assertions, feature = "debug"))]
        {
            debug_fmt((self.name)(), f)
        }
        #[cfg(not(any(debug_assertions, feature = "debug")))]
        {
            f.write_str(ANONYMOUS_NAME)
        }
    }
}

impl fmt::Debug for DebugName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// Names are diagnostics only, they never make two errors different.
impl PartialEq for DebugName {
    #[inline(always)]
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for DebugName {}
