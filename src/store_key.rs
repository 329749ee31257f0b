//! Storage key derivation for per-user collections.
//!
//! Keys follow the `<collectionKind>_<userId>` convention so that values written
//! by earlier versions of the catalog are picked up unchanged.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Favorites,
    ViewedCountries,
}

impl CollectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Favorites => "favorites",
            CollectionKind::ViewedCountries => "viewedCountries",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalise a user identifier: blank names count as anonymous.
pub fn signed_in(user: Option<&str>) -> Option<&str> {
    user.filter(|u| !u.trim().is_empty())
}

/// Derive the storage key for `kind` owned by `user`.
///
/// Returns `None` for anonymous users. Callers must treat that as an always-empty
/// collection and skip every write.
pub fn derive_key(kind: CollectionKind, user: Option<&str>) -> Option<String> {
    let user = signed_in(user)?;
    Some(format!("{}_{}", kind.as_str(), user))
}
