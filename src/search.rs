use crate::data::CountryDirectory;
use crate::stats::OTHER_CONTINENT;

/// Stała kolejność sekcji; nieznane kontynenty idą na koniec alfabetycznie.
pub const CONTINENT_ORDER: [&str; 8] = [
    "Africa",
    "Antarctica",
    "Asia",
    "Europe",
    "North America",
    "Oceania",
    "South America",
    OTHER_CONTINENT,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryRow {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContinentGroup {
    pub continent: String,
    pub countries: Vec<CountryRow>,
}

/// Szuka po nazwie, identyfikatorze i kontynencie, bez rozróżniania wielkości liter.
pub fn search(directory: &CountryDirectory, query: &str) -> Vec<ContinentGroup> {
    let query = query.trim().to_lowercase();
    let continent_of = |id: &str| directory.continent(id).unwrap_or(OTHER_CONTINENT);

    let mut groups: Vec<ContinentGroup> = Vec::new();
    for (id, name) in directory.entries() {
        let continent = continent_of(id);
        let matches = query.is_empty()
            || name.to_lowercase().contains(&query)
            || id.to_lowercase().contains(&query)
            || continent.to_lowercase().contains(&query);
        if !matches {
            continue;
        }
        let row = CountryRow {
            id: id.to_string(),
            name: name.to_string(),
        };
        match groups.iter_mut().find(|g| g.continent == continent) {
            Some(group) => group.countries.push(row),
            None => groups.push(ContinentGroup {
                continent: continent.to_string(),
                countries: vec![row],
            }),
        }
    }

    for group in &mut groups {
        group.countries.sort_by_cached_key(|row| row.name.to_lowercase());
    }
    groups.sort_by(|a, b| section_key(&a.continent).cmp(&section_key(&b.continent)));
    groups
}

fn section_key(continent: &str) -> (usize, &str) {
    let rank = CONTINENT_ORDER
        .iter()
        .position(|c| *c == continent)
        .unwrap_or(CONTINENT_ORDER.len());
    (rank, continent)
}

/// Wyniki spłaszczone do jednej listy, w kolejności wyświetlania.
pub fn flatten(groups: &[ContinentGroup]) -> Vec<CountryRow> {
    groups.iter().flat_map(|g| g.countries.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Projection;
    use crate::data::Dataset;

    fn directory() -> CountryDirectory {
        let bytes = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ISO_A3":"POL","NAME":"Poland","CONTINENT":"Europe"},"geometry":null},
            {"type":"Feature","properties":{"ISO_A3":"AUT","NAME":"austria","CONTINENT":"Europe"},"geometry":null},
            {"type":"Feature","properties":{"ISO_A3":"KEN","NAME":"Kenya","CONTINENT":"Africa"},"geometry":null},
            {"type":"Feature","properties":{"ISO_A3":"SGS","NAME":"South Georgia","CONTINENT":"Seven seas (open ocean)"},"geometry":null},
            {"type":"Feature","properties":{"ISO_A3":"XKX","NAME":"Nowhere"},"geometry":null}
        ]}"#;
        Dataset::load(bytes, Projection::Equirectangular).directory
    }

    #[test]
    fn empty_query_groups_everything_in_fixed_order() {
        let groups = search(&directory(), "   ");
        let sections: Vec<&str> = groups.iter().map(|g| g.continent.as_str()).collect();
        assert_eq!(sections, ["Africa", "Europe", "Other", "Seven seas (open ocean)"]);

        let europe: Vec<&str> = groups[1].countries.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(europe, ["austria", "Poland"]);
    }

    #[test]
    fn matches_name_id_and_continent() {
        let dir = directory();
        assert_eq!(flatten(&search(&dir, "POLA")).len(), 1);
        assert_eq!(flatten(&search(&dir, "ken"))[0].id, "KEN");
        assert_eq!(flatten(&search(&dir, "europe")).len(), 2);
        assert_eq!(flatten(&search(&dir, "other"))[0].id, "XKX");
        assert!(search(&dir, "atlantyda").is_empty());
    }
}
