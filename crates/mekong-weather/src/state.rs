//! Process-wide weather state shared by the panel and the refresh flow.

use std::sync::Arc;

use mekong_core::{DefaultLocation, Language};
use parking_lot::RwLock;

use crate::types::WeatherSnapshot;

#[derive(Debug)]
struct Inner {
    snapshot: Option<Arc<WeatherSnapshot>>,
    loading: bool,
    language: Language,
}

/// Holds the current snapshot and loading flag.
///
/// Every mutation is a single assignment under the write lock, so readers
/// never see a snapshot without its matching loading flag.
#[derive(Debug)]
pub struct WeatherState {
    inner: RwLock<Inner>,
    default_location: DefaultLocation,
}

impl WeatherState {
    /// Loading starts `true`: the panel shows a spinner until the first refresh concludes.
    pub fn new(language: Language, default_location: DefaultLocation) -> Self {
        Self {
            inner: RwLock::new(Inner {
                snapshot: None,
                loading: true,
                language,
            }),
            default_location,
        }
    }

    pub fn snapshot(&self) -> Option<Arc<WeatherSnapshot>> {
        self.inner.read().snapshot.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    pub fn language(&self) -> Language {
        self.inner.read().language
    }

    /// Mark a refresh as started and return the language to render in.
    pub fn begin_refresh(&self) -> Language {
        let mut inner = self.inner.write();
        inner.loading = true;
        inner.language
    }

    /// Replace the snapshot and clear the loading flag together.
    ///
    /// A snapshot rendered in a language the user has since switched away
    /// from is re-localized before it is stored.
    pub fn install(&self, snapshot: WeatherSnapshot) -> Arc<WeatherSnapshot> {
        let mut inner = self.inner.write();
        let snapshot = if snapshot.language == inner.language {
            snapshot
        } else {
            snapshot.relocalized(inner.language, &self.default_location)
        };
        let snapshot = Arc::new(snapshot);
        inner.snapshot = Some(snapshot.clone());
        inner.loading = false;
        snapshot
    }

    /// Switch language, re-rendering the held snapshot without refetching.
    pub fn set_language(&self, language: Language) {
        let mut inner = self.inner.write();
        if inner.language == language {
            return;
        }
        inner.language = language;
        if let Some(current) = inner.snapshot.take() {
            inner.snapshot = Some(Arc::new(
                current.relocalized(language, &self.default_location),
            ));
        }
        tracing::debug!("Weather language set to {}", language);
    }

    /// Drop the held snapshot (logout).
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.snapshot = None;
        inner.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_snapshot;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_starts_loading_without_snapshot() {
        let state = WeatherState::new(Language::Vi, DefaultLocation::default());
        assert!(state.is_loading());
        assert!(state.snapshot().is_none());
        assert_eq!(state.language(), Language::Vi);
    }

    #[test]
    fn test_install_clears_loading() {
        let state = WeatherState::new(Language::En, DefaultLocation::default());
        state.begin_refresh();
        let installed = state.install(fallback_snapshot(Language::En, today()));
        assert!(!state.is_loading());
        assert_eq!(state.snapshot().as_deref(), Some(installed.as_ref()));
    }

    #[test]
    fn test_install_relocalizes_stale_language() {
        let state = WeatherState::new(Language::En, DefaultLocation::default());
        let lang = state.begin_refresh();
        state.set_language(lang.toggle());
        let installed = state.install(fallback_snapshot(lang, today()));
        assert_eq!(installed.language, Language::Vi);
        assert_eq!(installed.location, "Đồng Bằng Sông Cửu Long, Việt Nam");
    }

    #[test]
    fn test_set_language_relocalizes_held_snapshot() {
        let state = WeatherState::new(Language::Vi, DefaultLocation::default());
        state.install(fallback_snapshot(Language::Vi, today()));
        state.set_language(Language::En);
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.location, "Mekong Delta, Vietnam");
        assert_eq!(snapshot.alerts[1].kind, "Irrigation Reminder");
    }

    #[test]
    fn test_clear_drops_snapshot() {
        let state = WeatherState::new(Language::Vi, DefaultLocation::default());
        state.install(fallback_snapshot(Language::Vi, today()));
        state.clear();
        assert!(state.snapshot().is_none());
        assert!(!state.is_loading());
    }
}
