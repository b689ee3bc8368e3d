//! Statusy krajów ustawione przez użytkownika i kolejka „chcę odwiedzić”.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::data::CountryDirectory;
use crate::error::{AtlasError, Result};

pub const STATUSES_FILE: &str = "statuses.json";
pub const WANT_TO_VISIT_ORDER_FILE: &str = "want_to_visit_order.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CountryStatus {
    #[default]
    None,
    Visited,
    WantToVisit,
}

impl CountryStatus {
    pub const ALL: [CountryStatus; 3] = [CountryStatus::None, CountryStatus::Visited, CountryStatus::WantToVisit];

    pub fn title(self) -> &'static str {
        match self {
            CountryStatus::None => "Nie ustawiono",
            CountryStatus::Visited => "Odwiedzony lub zamieszkany",
            CountryStatus::WantToVisit => "Chcę odwiedzić",
        }
    }

    /// Odczyt zapisanej wartości; stare „lived” to dziś „visited”.
    fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "visited" | "lived" => Some(CountryStatus::Visited),
            "wantToVisit" => Some(CountryStatus::WantToVisit),
            _ => None,
        }
    }
}

/// Statusy po `country_id`. Bez wpisu znaczy `None`.
#[derive(Debug, Default)]
pub struct StatusStore {
    statuses: BTreeMap<String, CountryStatus>,
    want_to_visit_order: Vec<String>,
    revision: u64,
    dir: Option<PathBuf>,
}

impl StatusStore {
    /// Sklep bez zapisu na dysk (testy, tryb tylko do odczytu).
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Wczytuje stan z katalogu. Brak albo uszkodzony plik to pusty stan.
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let statuses = read_json::<BTreeMap<String, String>>(&dir.join(STATUSES_FILE))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(id, raw)| CountryStatus::from_stored(&raw).map(|s| (id, s)))
            .collect::<BTreeMap<_, _>>();

        let want_to_visit_order = read_json::<Vec<String>>(&dir.join(WANT_TO_VISIT_ORDER_FILE))
            .unwrap_or_default()
            .into_iter()
            .filter(|id| statuses.get(id) == Some(&CountryStatus::WantToVisit))
            .collect();

        debug!(countries = statuses.len(), dir = %dir.display(), "wczytano statusy");
        Self {
            revision: u64::from(!statuses.is_empty()),
            statuses,
            want_to_visit_order,
            dir: Some(dir),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn status(&self, country_id: &str) -> CountryStatus {
        self.statuses.get(country_id).copied().unwrap_or_default()
    }

    pub fn statuses(&self) -> &BTreeMap<String, CountryStatus> {
        &self.statuses
    }

    pub fn visited_count(&self) -> usize {
        self.count(CountryStatus::Visited)
    }

    pub fn want_to_visit_count(&self) -> usize {
        self.count(CountryStatus::WantToVisit)
    }

    fn count(&self, status: CountryStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }

    pub fn want_to_visit_order(&self) -> &[String] {
        &self.want_to_visit_order
    }

    pub fn update_status(&mut self, status: CountryStatus, country_id: &str) -> Result<()> {
        match status {
            CountryStatus::None => {
                self.statuses.remove(country_id);
                self.want_to_visit_order.retain(|id| id != country_id);
            }
            CountryStatus::WantToVisit => {
                self.statuses.insert(country_id.to_string(), status);
                if !self.want_to_visit_order.iter().any(|id| id == country_id) {
                    self.want_to_visit_order.push(country_id.to_string());
                }
            }
            CountryStatus::Visited => {
                self.statuses.insert(country_id.to_string(), status);
                self.want_to_visit_order.retain(|id| id != country_id);
            }
        }
        self.revision += 1;
        self.save()
    }

    pub fn set_want_to_visit_order(&mut self, ids: Vec<String>) -> Result<()> {
        self.want_to_visit_order = ids;
        self.revision += 1;
        self.save()
    }

    /// Przesuwa kraj o jedno miejsce w kolejce „chcę odwiedzić”.
    /// `false`, gdy kraju nie ma w kolejce albo stoi już na jej brzegu.
    pub fn move_want_to_visit(&mut self, directory: &CountryDirectory, country_id: &str, up: bool) -> Result<bool> {
        let mut ids = self.want_to_visit_ids(directory);
        let Some(pos) = ids.iter().position(|id| id == country_id) else {
            return Ok(false);
        };
        let target = if up {
            pos.checked_sub(1)
        } else {
            Some(pos + 1).filter(|t| *t < ids.len())
        };
        let Some(target) = target else {
            return Ok(false);
        };
        ids.swap(pos, target);
        self.set_want_to_visit_order(ids)?;
        Ok(true)
    }

    /// Kraje „chcę odwiedzić”: najpierw w kolejności użytkownika, reszta po nazwie.
    pub fn want_to_visit_ids(&self, directory: &CountryDirectory) -> Vec<String> {
        let wanted: HashSet<&str> = self
            .statuses
            .iter()
            .filter(|(_, s)| **s == CountryStatus::WantToVisit)
            .map(|(id, _)| id.as_str())
            .collect();

        let mut ordered: Vec<String> = Vec::with_capacity(wanted.len());
        for id in &self.want_to_visit_order {
            if wanted.contains(id.as_str()) && !ordered.contains(id) {
                ordered.push(id.clone());
            }
        }

        let mut rest: Vec<&str> = wanted
            .into_iter()
            .filter(|id| !ordered.iter().any(|o| o.as_str() == *id))
            .collect();
        rest.sort_by_cached_key(|id| directory.display_name(id).to_lowercase());
        ordered.extend(rest.into_iter().map(str::to_string));
        ordered
    }

    fn save(&self) -> Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        write_json(&dir.join(STATUSES_FILE), &self.statuses)?;
        write_json(&dir.join(WANT_TO_VISIT_ORDER_FILE), &self.want_to_visit_order)
    }
}

/// `None` gdy pliku nie ma albo nie da się go sparsować (to drugie logujemy).
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = fs::read(path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "pomijam uszkodzony plik stanu");
            None
        }
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AtlasError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(path, bytes).map_err(|source| AtlasError::Write {
        path: path.to_path_buf(),
        source,
    })
}
