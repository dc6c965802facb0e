//  NAME.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 10:12:56
//  Last edited:
//    21 Aug 2025, 11:50:33
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines fully qualified names for the Karst semantic model.
//

use std::fmt::{Display, Formatter, Result as FResult};


/***** LIBRARY *****/
/// A fully qualified name, i.e., a non-empty list of identifiers.
///
/// The first segment always names a module. A package name is a module segment followed by the
/// path of the package below it; a symbol name is a package name followed by the symbol's
/// identifier.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Name(Vec<String>);

impl Name {
    /// Constructor for a Name from its segments.
    ///
    /// # Arguments
    /// - `segments`: The segments of the name, in order. Must not be empty.
    ///
    /// # Returns
    /// A new Name wrapping the given segments.
    ///
    /// # Panics
    /// This function panics if `segments` is empty.
    #[inline]
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let segments: Vec<String> = segments.into_iter().map(|s| s.into()).collect();
        assert!(!segments.is_empty(), "A Name cannot be empty");
        Self(segments)
    }

    /// Constructor for a single-segment Name.
    #[inline]
    pub fn single(segment: impl Into<String>) -> Self { Self(vec![segment.into()]) }

    /// Returns the module this name lives in, i.e., the first segment.
    #[inline]
    pub fn module(&self) -> &str { &self.0[0] }

    /// Returns the final segment of this name.
    #[inline]
    pub fn identifier(&self) -> &str { &self.0[self.0.len() - 1] }

    /// Returns the name that scopes this one, i.e., this name without its final segment.
    ///
    /// # Returns
    /// The scope as a new Name, or [`None`] if this name is a bare module name.
    #[inline]
    pub fn scope(&self) -> Option<Self> {
        if self.0.len() > 1 {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    /// Returns a new Name that extends this one with the given segment.
    #[inline]
    pub fn sub(&self, segment: impl Into<String>) -> Self {
        let mut segments: Vec<String> = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Returns the segments of this name, in order.
    #[inline]
    pub fn segments(&self) -> &[String] { &self.0 }

    /// Returns the segments joined with the given separator.
    ///
    /// # Arguments
    /// - `sep`: The separator to join with.
    #[inline]
    pub fn joined(&self, sep: &str) -> String { self.0.join(sep) }
}

impl Display for Name {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{}", self.0.join(".")) }
}

impl AsRef<Name> for Name {
    #[inline]
    fn as_ref(&self) -> &Self { self }
}
impl From<&Name> for Name {
    #[inline]
    fn from(value: &Name) -> Self { value.clone() }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accessors() {
        let name: Name = Name::new(["hello", "core", "greet"]);
        assert_eq!(name.module(), "hello");
        assert_eq!(name.identifier(), "greet");
        assert_eq!(name.scope(), Some(Name::new(["hello", "core"])));
        assert_eq!(name.to_string(), "hello.core.greet");
        assert_eq!(name.joined("$"), "hello$core$greet");
    }

    #[test]
    fn test_name_single() {
        let name: Name = Name::single("hello");
        assert_eq!(name.module(), "hello");
        assert_eq!(name.identifier(), "hello");
        assert_eq!(name.scope(), None);
        assert_eq!(name.sub("cli"), Name::new(["hello", "cli"]));
    }
}
