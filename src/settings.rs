//! User preferences and the "clear browsing data" action.

use crate::local_store::{read_or_absent, LocalStore, StoreError};
use crate::membership::MembershipStore;
use crate::recency::RecencyStore;
use std::fmt;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored theme; anything unrecognised falls back to light.
pub fn load_theme(store: &dyn LocalStore) -> Theme {
    match read_or_absent(store, THEME_KEY).as_deref() {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    }
}

pub fn save_theme(store: &dyn LocalStore, theme: Theme) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str())
}

/// Remove favorites, then history. Not atomic: if the second removal fails the
/// favorites are already gone.
pub fn clear_user_data(
    favorites: &mut MembershipStore,
    recent: &mut RecencyStore,
) -> Result<(), StoreError> {
    favorites.clear()?;
    recent.clear()?;
    tracing::info!(
        favorites = favorites.key().unwrap_or("-"),
        recent = recent.key().unwrap_or("-"),
        "cleared browsing data"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;
    use std::rc::Rc;

    #[test]
    fn theme_defaults_to_light_and_round_trips() {
        let mem = MemoryStore::new();
        assert_eq!(load_theme(&mem), Theme::Light);
        save_theme(&mem, Theme::Dark).unwrap();
        assert_eq!(load_theme(&mem), Theme::Dark);
        assert_eq!(mem.raw(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn unknown_theme_value_is_light() {
        let mem = MemoryStore::new();
        mem.seed(THEME_KEY, "solarized");
        assert_eq!(load_theme(&mem), Theme::Light);
    }

    #[test]
    fn clear_leaves_other_users_alone() {
        let mem = Rc::new(MemoryStore::new());
        mem.seed("favorites_a", r#"["USA"]"#);
        mem.seed("viewedCountries_a", r#"["USA"]"#);
        mem.seed("favorites_b", r#"["FRA"]"#);
        let mut favs = MembershipStore::favorites(mem.clone(), Some("a"));
        let mut recent = RecencyStore::open(mem.clone(), Some("a"));
        clear_user_data(&mut favs, &mut recent).unwrap();
        assert_eq!(mem.raw("favorites_a"), None);
        assert_eq!(mem.raw("viewedCountries_a"), None);
        assert_eq!(mem.raw("favorites_b").as_deref(), Some(r#"["FRA"]"#));
    }

    #[test]
    fn clear_for_anonymous_is_noop() {
        let mem = Rc::new(MemoryStore::new());
        let mut favs = MembershipStore::favorites(mem.clone(), None);
        let mut recent = RecencyStore::open(mem.clone(), None);
        clear_user_data(&mut favs, &mut recent).unwrap();
        assert_eq!(mem.write_count(), 0);
    }
}
