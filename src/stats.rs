use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::CountryDirectory;
use crate::status::{CountryStatus, StatusStore};

/// Kraje bez kontynentu trafiają tutaj.
pub const OTHER_CONTINENT: &str = "Other";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContinentStat {
    pub name: String,
    pub total: usize,
    pub visited: usize,
}

impl ContinentStat {
    /// Ułamek 0..=1.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.visited as f64 / self.total as f64
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TravelStats {
    pub total_countries: usize,
    pub visited_count: usize,
    pub want_to_visit_count: usize,
    pub continents: Vec<ContinentStat>,
}

impl TravelStats {
    pub fn compute(directory: &CountryDirectory, statuses: &StatusStore) -> Self {
        Self {
            total_countries: directory.len(),
            visited_count: statuses.visited_count(),
            want_to_visit_count: statuses.want_to_visit_count(),
            continents: continent_stats(directory, statuses),
        }
    }

    /// Ułamek 0..=1; dla pustej mapy 0.
    pub fn visited_percentage(&self) -> f64 {
        if self.total_countries == 0 {
            return 0.0;
        }
        self.visited_count as f64 / self.total_countries as f64
    }
}

/// Kontynenty z co najmniej jednym odwiedzonym krajem, od najlepiej pokrytego.
pub fn continent_stats(directory: &CountryDirectory, statuses: &StatusStore) -> Vec<ContinentStat> {
    let mut by_continent: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for id in directory.ids() {
        let continent = directory.continent(id).unwrap_or(OTHER_CONTINENT);
        let entry = by_continent.entry(continent).or_default();
        entry.0 += 1;
        if statuses.status(id) == CountryStatus::Visited {
            entry.1 += 1;
        }
    }

    let mut stats: Vec<ContinentStat> = by_continent
        .into_iter()
        .filter(|(_, (_, visited))| *visited > 0)
        .map(|(name, (total, visited))| ContinentStat {
            name: name.to_string(),
            total,
            visited,
        })
        .collect();
    // BTreeMap daje już porządek po nazwie, sortowanie stabilne go zachowa przy remisach.
    stats.sort_by(|a, b| b.percentage().total_cmp(&a.percentage()));
    stats
}
