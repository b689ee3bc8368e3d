use std::path::PathBuf;
use thiserror::Error;

/// Błędy biblioteki (zapis/odczyt stanu, widżety, konfiguracja).
///
/// Ładowanie granic krajów nigdy nie zwraca błędu do wywołującego:
/// zepsuty zbiór danych daje pustą mapę, a nie awarię aplikacji.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AtlasError {
    #[error("nie można odczytać {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("nie można zapisać {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("błąd serializacji JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("niepoprawny GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("zbiór danych nie jest kolekcją obiektów (FeatureCollection)")]
    NotAFeatureCollection,

    #[error("nieznany cel: {0}")]
    UnknownGoal(u64),

    #[error("niepoprawny cel: {0}")]
    InvalidGoal(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
