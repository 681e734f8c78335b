//! Alternative lookup paths.

/// One or more paths tried in order by the [`crate::Config`] accessors.
///
/// Implemented for a single path (`&str`, `String`) and for arrays, slices
/// and vectors of paths.
pub trait PathAlternatives {
    /// The paths, in the order they should be tried.
    fn alternatives(&self) -> Vec<&str>;
}

impl PathAlternatives for str {
    fn alternatives(&self) -> Vec<&str> {
        vec![self]
    }
}

impl PathAlternatives for String {
    fn alternatives(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl<P: PathAlternatives + ?Sized> PathAlternatives for &P {
    fn alternatives(&self) -> Vec<&str> {
        (**self).alternatives()
    }
}

impl<S: AsRef<str>> PathAlternatives for [S] {
    fn alternatives(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<S: AsRef<str>, const N: usize> PathAlternatives for [S; N] {
    fn alternatives(&self) -> Vec<&str> {
        self.as_slice().alternatives()
    }
}

impl<S: AsRef<str>> PathAlternatives for Vec<S> {
    fn alternatives(&self) -> Vec<&str> {
        self.as_slice().alternatives()
    }
}
