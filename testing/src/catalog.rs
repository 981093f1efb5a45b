//! Fixed film catalog for tests.

use cinema_core::store::{FilmCatalog, StoreFuture};
use cinema_core::types::FilmId;
use std::collections::HashMap;

/// Film catalog with a fixed set of films and their running times.
///
/// # Example
///
/// ```
/// use cinema_testing::StaticFilmCatalog;
/// use cinema_core::store::FilmCatalog;
/// use cinema_core::types::FilmId;
///
/// # tokio_test::block_on(async {
/// let film = FilmId::new();
/// let catalog = StaticFilmCatalog::new().with_film(film, 120);
///
/// assert!(catalog.exists(film).await.unwrap_or(false));
/// assert_eq!(catalog.duration_of(film).await.ok().flatten(), Some(120));
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticFilmCatalog {
    durations: HashMap<FilmId, u32>,
}

impl StaticFilmCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a film running `duration_minutes`
    #[must_use]
    pub fn with_film(mut self, film_id: FilmId, duration_minutes: u32) -> Self {
        self.durations.insert(film_id, duration_minutes);
        self
    }

    /// Add a new film running `duration_minutes` and return its id
    pub fn add_film(&mut self, duration_minutes: u32) -> FilmId {
        let film_id = FilmId::new();
        self.durations.insert(film_id, duration_minutes);
        film_id
    }
}

impl FilmCatalog for StaticFilmCatalog {
    fn exists(&self, film_id: FilmId) -> StoreFuture<'_, bool> {
        Box::pin(async move { Ok(self.durations.contains_key(&film_id)) })
    }

    fn duration_of(&self, film_id: FilmId) -> StoreFuture<'_, Option<u32>> {
        Box::pin(async move { Ok(self.durations.get(&film_id).copied()) })
    }
}
