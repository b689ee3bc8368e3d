//! Migawki dla widżetów: statystyki i cele zapisane jako JSON we wspólnym
//! katalogu, z którego czyta proces widżetu.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::goals::GoalStore;
use crate::stats::TravelStats;
use crate::status::{read_json, write_json, StatusStore};

pub const WIDGET_STATS_FILE: &str = "widget_stats.json";
pub const WIDGET_GOALS_FILE: &str = "widget_goals.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStatsSnapshot {
    pub total_countries: usize,
    pub visited_count: usize,
    pub want_to_visit_count: usize,
    pub visited_percentage: f64,
    /// Ta sama kolejność co w panelu statystyk.
    pub continent_stats: Vec<ContinentStatEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinentStatEntry {
    pub name: String,
    pub percentage: f64,
}

impl WidgetStatsSnapshot {
    pub fn placeholder() -> Self {
        Self {
            total_countries: 0,
            visited_count: 0,
            want_to_visit_count: 0,
            visited_percentage: 0.0,
            continent_stats: Vec::new(),
        }
    }

    pub fn from_stats(stats: &TravelStats) -> Self {
        Self {
            total_countries: stats.total_countries,
            visited_count: stats.visited_count,
            want_to_visit_count: stats.want_to_visit_count,
            visited_percentage: stats.visited_percentage(),
            continent_stats: stats
                .continents
                .iter()
                .map(|c| ContinentStatEntry {
                    name: c.name.clone(),
                    percentage: c.percentage(),
                })
                .collect(),
        }
    }

    /// Odczyt po stronie widżetu; brak danych to zera.
    pub fn read(dir: &Path) -> Self {
        read_json(&dir.join(WIDGET_STATS_FILE)).unwrap_or_else(Self::placeholder)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetGoalEntry {
    pub label: String,
    pub progress_description: String,
    pub is_complete: bool,
    /// Sekundy od epoki Unix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetGoalsSnapshot {
    pub goals: Vec<WidgetGoalEntry>,
}

impl WidgetGoalsSnapshot {
    pub fn build(goals: &GoalStore, stats: &TravelStats, statuses: &StatusStore) -> Self {
        let goals = goals
            .goals()
            .iter()
            .map(|goal| {
                let progress = goal.progress(stats, statuses);
                WidgetGoalEntry {
                    label: goal.kind.label(),
                    progress_description: progress.description,
                    is_complete: progress.is_complete,
                    target_date: goal.target_date.map(|d| d.timestamp()),
                    custom_title: goal.title.clone(),
                }
            })
            .collect();
        Self { goals }
    }

    pub fn read(dir: &Path) -> Self {
        read_json(&dir.join(WIDGET_GOALS_FILE)).unwrap_or_default()
    }
}

/// Zapisuje obie migawki. Wołane po każdej zmianie statusów, kolejki albo celów.
pub fn publish(dir: &Path, stats: &TravelStats, statuses: &StatusStore, goals: &GoalStore) -> Result<()> {
    write_json(&dir.join(WIDGET_STATS_FILE), &WidgetStatsSnapshot::from_stats(stats))?;
    write_json(
        &dir.join(WIDGET_GOALS_FILE),
        &WidgetGoalsSnapshot::build(goals, stats, statuses),
    )?;
    debug!(dir = %dir.display(), "zapisano migawki widżetów");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalKind;
    use crate::stats::ContinentStat;
    use crate::status::CountryStatus;
    use chrono::{TimeZone, Utc};

    fn stats() -> TravelStats {
        TravelStats {
            total_countries: 4,
            visited_count: 1,
            want_to_visit_count: 0,
            continents: vec![ContinentStat {
                name: "Europe".into(),
                total: 2,
                visited: 1,
            }],
        }
    }

    #[test]
    fn stats_snapshot_uses_camel_case() {
        let value = serde_json::to_value(WidgetStatsSnapshot::from_stats(&stats())).unwrap();
        assert_eq!(value["totalCountries"], 4);
        assert_eq!(value["visitedPercentage"], 0.25);
        assert_eq!(value["continentStats"][0]["name"], "Europe");
        assert_eq!(value["continentStats"][0]["percentage"], 0.5);
    }

    #[test]
    fn missing_files_read_as_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(WidgetStatsSnapshot::read(tmp.path()), WidgetStatsSnapshot::placeholder());
        assert!(WidgetGoalsSnapshot::read(tmp.path()).goals.is_empty());
    }

    #[test]
    fn publish_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut statuses = StatusStore::in_memory();
        statuses.update_status(CountryStatus::Visited, "POL").unwrap();

        let mut goals = GoalStore::in_memory();
        let deadline = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        goals
            .add(GoalKind::SpecificCountries(vec!["POL".into()]), Some("Dom".into()), Some(deadline), deadline)
            .unwrap();

        publish(tmp.path(), &stats(), &statuses, &goals).unwrap();

        let read = WidgetGoalsSnapshot::read(tmp.path());
        assert_eq!(read.goals.len(), 1);
        let entry = &read.goals[0];
        assert_eq!(entry.progress_description, "1/1");
        assert!(entry.is_complete);
        assert_eq!(entry.target_date, Some(deadline.timestamp()));
        assert_eq!(entry.custom_title.as_deref(), Some("Dom"));

        assert_eq!(WidgetStatsSnapshot::read(tmp.path()).visited_count, 1);
    }
}
