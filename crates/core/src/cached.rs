//! Explicit load state for cached server data

/// A cached server resource that is either not yet fetched or fetched
///
/// An empty list or an all-zero dashboard is still `Loaded`; only a
/// resource that has never been fetched successfully is `Unloaded`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cached<T> {
    #[default]
    Unloaded,
    Loaded(T),
}

impl<T> Cached<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Borrow the loaded value
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Unloaded => None,
        }
    }

    /// Take the loaded value
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Unloaded => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Cached<U> {
        match self {
            Self::Loaded(value) => Cached::Loaded(f(value)),
            Self::Unloaded => Cached::Unloaded,
        }
    }
}

impl<T: Default> Cached<T> {
    /// The loaded value, or `T::default()` while unloaded
    ///
    /// Lists render as empty before their first fetch.
    pub fn unwrap_or_default(self) -> T {
        self.loaded().unwrap_or_default()
    }
}

impl<T> From<T> for Cached<T> {
    fn from(value: T) -> Self {
        Self::Loaded(value)
    }
}
