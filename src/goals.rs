//! Cele podróżnicze i ich postęp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AtlasError, Result};
use crate::stats::TravelStats;
use crate::status::{read_json, write_json, CountryStatus, StatusStore};

pub const GOALS_FILE: &str = "goals.json";

/// Zapis jak `{"countries": 10}`, `{"percentage": 25.0}`, `{"specificCountries": ["POL"]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalKind {
    Countries(u32),
    Percentage(f64),
    SpecificCountries(Vec<String>),
}

impl GoalKind {
    pub fn label(&self) -> String {
        match self {
            GoalKind::Countries(n) => format!("Odwiedź {n} krajów"),
            GoalKind::Percentage(p) => format!("Zobacz {p:.1}% świata"),
            GoalKind::SpecificCountries(ids) => format!("Odwiedź {} wybranych krajów", ids.len()),
        }
    }

    /// Co najmniej jeden kraj, procent w przedziale (0, 100].
    pub fn validate(&self) -> Result<()> {
        match self {
            GoalKind::Countries(0) => Err(AtlasError::InvalidGoal("liczba krajów musi być dodatnia".into())),
            GoalKind::Percentage(p) if !(*p > 0.0 && *p <= 100.0) => {
                Err(AtlasError::InvalidGoal(format!("procent spoza zakresu (0, 100]: {p}")))
            }
            GoalKind::SpecificCountries(ids) if ids.is_empty() => {
                Err(AtlasError::InvalidGoal("lista krajów jest pusta".into()))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u64,
    pub kind: GoalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalProgress {
    pub description: String,
    pub is_complete: bool,
}

impl Goal {
    pub fn progress(&self, stats: &TravelStats, statuses: &StatusStore) -> GoalProgress {
        match &self.kind {
            GoalKind::Countries(target) => {
                let current = stats.visited_count;
                GoalProgress {
                    description: format!("{current}/{target}"),
                    is_complete: current >= *target as usize,
                }
            }
            GoalKind::Percentage(target) => {
                let current = stats.visited_percentage() * 100.0;
                GoalProgress {
                    description: format!("{current:.1}%/{target:.1}%"),
                    is_complete: current >= *target,
                }
            }
            GoalKind::SpecificCountries(ids) => {
                let visited = ids
                    .iter()
                    .filter(|id| statuses.status(id) == CountryStatus::Visited)
                    .count();
                GoalProgress {
                    description: format!("{visited}/{}", ids.len()),
                    is_complete: visited >= ids.len(),
                }
            }
        }
    }
}

/// Cele posortowane od najnowszego.
#[derive(Debug, Default)]
pub struct GoalStore {
    goals: Vec<Goal>,
    path: Option<PathBuf>,
}

impl GoalStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        let path = dir.as_ref().join(GOALS_FILE);
        let mut goals = read_json::<Vec<Goal>>(&path).unwrap_or_default();
        sort_newest_first(&mut goals);
        debug!(goals = goals.len(), "wczytano cele");
        Self {
            goals,
            path: Some(path),
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Tworzy cel z nowym identyfikatorem i zwraca ten identyfikator.
    /// Niepoprawny cel nie trafia do sklepu.
    pub fn add(
        &mut self,
        kind: GoalKind,
        title: Option<String>,
        target_date: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Result<u64> {
        kind.validate()?;
        let id = self.goals.iter().map(|g| g.id).max().map_or(1, |max| max + 1);
        let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        self.goals.push(Goal {
            id,
            kind,
            title,
            target_date,
            created_at,
        });
        sort_newest_first(&mut self.goals);
        self.save()?;
        Ok(id)
    }

    pub fn remove(&mut self, id: u64) -> Result<Goal> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(AtlasError::UnknownGoal(id))?;
        let goal = self.goals.remove(pos);
        self.save()?;
        Ok(goal)
    }

    fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => write_json(path, &self.goals),
            None => Ok(()),
        }
    }
}

/// Przy równych datach nowszy jest cel o większym id.
fn sort_newest_first(goals: &mut [Goal]) {
    goals.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
