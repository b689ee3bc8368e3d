use geo::{BoundingRect, Coord, Rect};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::Projection;
use crate::data::{CountryDirectory, Dataset, PolygonRecord};
use crate::hit_test::OverlayIndex;

/// Niezmienna migawka wczytanych granic. Odbiorcy porównują `revision`,
/// żeby wiedzieć, czy trzeba przerysować mapę.
///
/// Geometria, słownik i indeks są współdzielone, więc klon migawki
/// z nową rewizją nie kopiuje wielokątów.
#[derive(Clone, Debug, Default)]
pub struct Atlas {
    revision: u64,
    records: Arc<[PolygonRecord]>,
    directory: Arc<CountryDirectory>,
    index: Arc<OverlayIndex>,
    bounds: Option<Rect<f64>>,
}

impl Atlas {
    fn from_dataset(dataset: Dataset, revision: u64) -> Self {
        let index = OverlayIndex::build(&dataset.records);
        let bounds = dataset
            .records
            .iter()
            .filter_map(|r| r.polygon.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            });
        Self {
            revision,
            records: dataset.records.into(),
            directory: Arc::new(dataset.directory),
            index: Arc::new(index),
            bounds,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn records(&self) -> &[PolygonRecord] {
        &self.records
    }

    pub fn directory(&self) -> &CountryDirectory {
        &self.directory
    }

    /// Prostokąt obejmujący wszystkie wielokąty; `None` dla pustej mapy.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    pub fn hit_test(&self, point: Coord<f64>) -> Option<&str> {
        self.index.hit_test(point, &self.records)
    }
}

/// Właściciel bieżącej migawki. Tylko on ją podmienia, czytelnicy dostają `Arc`.
#[derive(Debug)]
pub struct AtlasHandle {
    current: Arc<Atlas>,
    revision: u64,
}

impl Default for AtlasHandle {
    fn default() -> Self {
        Self {
            current: Arc::new(Atlas::default()),
            revision: 0,
        }
    }
}

impl AtlasHandle {
    pub fn load_file<P: AsRef<Path>>(path: P, projection: Projection) -> Self {
        let mut handle = Self::default();
        handle.replace(Dataset::load_file(path, projection));
        handle
    }

    pub fn current(&self) -> Arc<Atlas> {
        Arc::clone(&self.current)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Podmienia całą migawkę naraz; kto trzyma starą, widzi ją bez zmian.
    pub fn replace(&mut self, dataset: Dataset) -> Arc<Atlas> {
        self.revision += 1;
        self.current = Arc::new(Atlas::from_dataset(dataset, self.revision));
        info!(
            revision = self.revision,
            countries = self.current.directory.len(),
            "nowa migawka mapy"
        );
        self.current()
    }

    /// Styl się zmienił (np. schemat kolorów), geometria nie.
    pub fn touch(&mut self) -> Arc<Atlas> {
        self.revision += 1;
        self.current = Arc::new(Atlas {
            revision: self.revision,
            ..Atlas::clone(&self.current)
        });
        self.current()
    }
}
