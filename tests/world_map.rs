use geo::{coord, Coord};
use std::path::PathBuf;
use terramark::data::MISSING_CODE;
use terramark::stats::TravelStats;
use terramark::widget::{self, WidgetStatsSnapshot};
use terramark::{hit_test, AtlasHandle, CountryStatus, Dataset, Projection, StatusStore};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/countries.geojson")
}

fn at(projection: Projection, lon: f64, lat: f64) -> Coord<f64> {
    let (x, y) = projection.project(lon, lat);
    coord! { x: x, y: y }
}

#[test]
fn sample_dataset_loads_every_country() {
    let ds = Dataset::load_file(sample_path(), Projection::Mercator);
    assert_eq!(ds.directory.len(), 8);
    // Francja to dwa wielokąty
    assert_eq!(ds.records.len(), 9);
    for record in &ds.records {
        assert!(!record.country_id.is_empty());
        assert_ne!(record.country_id, MISSING_CODE);
    }
}

#[test]
fn identifiers_fall_back_through_fields() {
    let ds = Dataset::load_file(sample_path(), Projection::Mercator);
    let dir = &ds.directory;

    assert!(dir.contains("FRA"));
    assert!(dir.contains("KOS"));
    assert!(dir.contains("Bir Tawil"));
    assert_eq!(dir.display_name("POL"), "Poland");

    assert_eq!(dir.iso_alpha2("POL"), Some("PL"));
    assert_eq!(dir.iso_alpha2("FRA"), Some("FR"));
    assert_eq!(dir.iso_alpha2("KOS"), Some("XK"));
    assert_eq!(dir.iso_alpha2("Bir Tawil"), None);
    assert_eq!(dir.flag_emoji("POL"), "🇵🇱");
    assert_eq!(dir.continent("Bir Tawil"), None);
}

#[test]
fn clicks_resolve_to_countries_in_both_projections() {
    for projection in [Projection::Mercator, Projection::Equirectangular] {
        let handle = AtlasHandle::load_file(sample_path(), projection);
        let atlas = handle.current();

        assert_eq!(atlas.hit_test(at(projection, 21.0, 52.2)), Some("POL"));
        assert_eq!(atlas.hit_test(at(projection, 2.3, 48.8)), Some("FRA"));
        // Korsyka
        assert_eq!(atlas.hit_test(at(projection, 9.1, 42.1)), Some("FRA"));
        assert_eq!(atlas.hit_test(at(projection, 139.7, 35.7)), Some("JPN"));
        // Lesotho leży w dziurze RPA
        assert_eq!(atlas.hit_test(at(projection, 28.2, -29.6)), Some("LSO"));
        assert_eq!(atlas.hit_test(at(projection, 18.4, -33.9)), Some("ZAF"));
        // Atlantyk
        assert_eq!(atlas.hit_test(at(projection, -30.0, 30.0)), None);

        // Indeks i pełne przeszukanie zgadzają się
        for (lon, lat) in [(21.0, 52.2), (28.2, -29.6), (-30.0, 30.0), (9.1, 42.1)] {
            let p = at(projection, lon, lat);
            assert_eq!(atlas.hit_test(p), hit_test(p, atlas.records()));
        }
    }
}

#[test]
fn hole_without_covering_country_returns_none() {
    let ds = Dataset::load_file(sample_path(), Projection::Equirectangular);
    let without_lesotho: Vec<_> = ds.records.into_iter().filter(|r| r.country_id != "LSO").collect();
    assert_eq!(hit_test(coord! { x: 28.2, y: -29.6 }, &without_lesotho), None);
    assert_eq!(hit_test(coord! { x: 18.4, y: -33.9 }, &without_lesotho), Some("ZAF"));
}

#[test]
fn marking_countries_updates_stats_and_widgets() {
    let state = tempfile::tempdir().unwrap();
    let widgets = tempfile::tempdir().unwrap();
    let handle = AtlasHandle::load_file(sample_path(), Projection::Mercator);
    let atlas = handle.current();

    let mut statuses = StatusStore::open(state.path());
    let clicked = atlas.hit_test(at(Projection::Mercator, 21.0, 52.2)).unwrap().to_string();
    statuses.update_status(CountryStatus::Visited, &clicked).unwrap();
    statuses.update_status(CountryStatus::Visited, "ZAF").unwrap();
    statuses.update_status(CountryStatus::WantToVisit, "JPN").unwrap();

    let stats = TravelStats::compute(atlas.directory(), &statuses);
    assert_eq!(stats.visited_count, 2);
    assert_eq!(stats.total_countries, 8);
    let names: Vec<&str> = stats.continents.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Africa", "Europe"]);

    let goals = terramark::goals::GoalStore::open(state.path());
    widget::publish(widgets.path(), &stats, &statuses, &goals).unwrap();
    let snapshot = WidgetStatsSnapshot::read(widgets.path());
    assert_eq!(snapshot.visited_count, 2);
    assert_eq!(snapshot.want_to_visit_count, 1);
    assert!((snapshot.visited_percentage - 0.25).abs() < 1e-12);

    let reopened = StatusStore::open(state.path());
    assert_eq!(reopened.status("POL"), CountryStatus::Visited);
    assert_eq!(reopened.want_to_visit_ids(atlas.directory()), ["JPN"]);
}
