//! Terramark: mapa odwiedzonych krajów.
//!
//! Rdzeń to wczytanie granic krajów z GeoJSON ([`data`]) i odpowiedź na
//! pytanie „który kraj jest pod kliknięciem” ([`hit_test`]). Reszta to stan
//! użytkownika zbudowany na tym rdzeniu: statusy, statystyki, cele i migawki
//! dla widżetów.

pub mod atlas;
pub mod config;
pub mod data;
pub mod error;
pub mod goals;
pub mod logging;
pub mod search;
pub mod stats;
pub mod status;
pub mod widget;

pub use atlas::{Atlas, AtlasHandle};
pub use config::{AppConfig, Projection};
pub use data::{CountryDirectory, Dataset, PolygonRecord};
pub use error::{AtlasError, Result};
pub use hit_test::{hit_test, OverlayIndex};
pub use status::{CountryStatus, StatusStore};
