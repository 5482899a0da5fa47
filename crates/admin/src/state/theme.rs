//! Theme slice.

use std::sync::{PoisonError, RwLock};

use backoffice_core::Theme;

use crate::storage::{SharedStore, THEME_KEY};

/// Holds the light/dark preference and persists it under `theme`.
#[derive(Debug)]
pub struct ThemeSlice {
    storage: SharedStore,
    current: RwLock<Theme>,
}

impl ThemeSlice {
    /// Restore the persisted theme. Missing or unreadable values give light.
    #[must_use]
    pub fn rehydrate(storage: SharedStore) -> Self {
        let stored = storage.get(THEME_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read stored theme");
            None
        });
        Self {
            storage,
            current: RwLock::new(Theme::from_stored(stored.as_deref())),
        }
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the dark theme is active.
    pub fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }

    /// Class for the application root element.
    pub fn root_class(&self) -> &'static str {
        self.theme().root_class()
    }

    /// Flip between light and dark and persist the result.
    pub fn toggle(&self) -> Theme {
        let next = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = current.toggled();
            *current
        };
        self.persist(next);
        next
    }

    /// Set the theme and persist it.
    pub fn set(&self, theme: Theme) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = theme;
        self.persist(theme);
    }

    fn persist(&self, theme: Theme) {
        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(error = %e, "Failed to persist theme");
        }
    }
}
