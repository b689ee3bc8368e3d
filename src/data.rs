use geo::{Coord, Geometry, MapCoords, Polygon};
use geojson::{Feature, GeoJson, JsonObject, JsonValue};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::{debug, info, warn};

use crate::config::Projection;
use crate::error::{AtlasError, Result};

/// Wartość-wartownik Natural Earth dla „brak kodu”.
pub const MISSING_CODE: &str = "-99";

const NAME_FIELDS: [&str; 4] = ["name", "NAME", "ADMIN", "NAME_LONG"];
const ALPHA3_FIELDS: [&str; 7] = ["ISO_A3", "iso_a3", "ADM0_A3", "SOV_A3", "GU_A3", "SU_A3", "BRK_A3"];
const ALPHA2_FIELDS: [&str; 3] = ["ISO_A2", "iso_a2", "ISO_A2_EH"];
const CONTINENT_FIELDS: [&str; 2] = ["CONTINENT", "REGION_UN"];

/// Kraje, dla których zbiór Natural Earth podaje ISO_A2 = -99, choć kod istnieje.
/// Klucz: alpha-3, wartość: alpha-2. Tylko znane wyjątki, nic więcej.
const ALPHA2_EXCEPTIONS: [(&str, &str); 3] = [("FRA", "FR"), ("NOR", "NO"), ("KOS", "XK")];

/// Jeden wielokąt na mapie. Kraj z wyspami ma ich kilka, wszystkie z tym samym `country_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonRecord {
    pub country_id: String,
    pub display_name: String,
    /// Pierścień zewnętrzny i dziury, już w przestrzeni mapy.
    pub polygon: Polygon<f64>,
}

impl PolygonRecord {
    pub fn new(country_id: impl Into<String>, display_name: impl Into<String>, polygon: Polygon<f64>) -> Self {
        Self {
            country_id: country_id.into(),
            display_name: display_name.into(),
            polygon,
        }
    }
}

/// Słownik krajów: nazwa, kod alpha-2 i kontynent po `country_id`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryDirectory {
    names: BTreeMap<String, String>,
    alpha2: BTreeMap<String, String>,
    continents: BTreeMap<String, String>,
}

impl CountryDirectory {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, country_id: &str) -> bool {
        self.names.contains_key(country_id)
    }

    /// Identyfikatory w porządku leksykograficznym.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Pary (id, nazwa).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Nieznany identyfikator wyświetla się jako on sam.
    pub fn display_name<'a>(&'a self, country_id: &'a str) -> &'a str {
        self.names.get(country_id).map(String::as_str).unwrap_or(country_id)
    }

    pub fn iso_alpha2(&self, country_id: &str) -> Option<&str> {
        self.alpha2
            .get(country_id)
            .or_else(|| self.alpha2.get(&country_id.to_uppercase()))
            .map(String::as_str)
            .or_else(|| alpha2_exception(country_id))
    }

    pub fn continent(&self, country_id: &str) -> Option<&str> {
        self.continents.get(country_id).map(String::as_str)
    }

    /// Flaga z dwóch regionalnych symboli Unicode, albo pusty napis.
    pub fn flag_emoji(&self, country_id: &str) -> String {
        let Some(code) = self.iso_alpha2(country_id) else {
            return String::new();
        };
        if code.chars().count() != 2 {
            return String::new();
        }
        code.to_uppercase()
            .chars()
            .filter(char::is_ascii_uppercase)
            .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
            .collect()
    }

    /// Pierwsze wystąpienie wygrywa dla każdego z pól.
    fn record(&mut self, id: &str, name: &str, alpha2: Option<&str>, continent: Option<&str>) {
        self.names.entry(id.to_string()).or_insert_with(|| name.to_string());
        if let Some(code) = alpha2 {
            self.alpha2.entry(id.to_string()).or_insert_with(|| code.to_string());
        }
        if let Some(continent) = continent {
            self.continents
                .entry(id.to_string())
                .or_insert_with(|| continent.to_string());
        }
    }
}

fn alpha2_exception(country_id: &str) -> Option<&'static str> {
    let upper = country_id.to_uppercase();
    ALPHA2_EXCEPTIONS
        .iter()
        .find(|(alpha3, _)| *alpha3 == upper)
        .map(|(_, alpha2)| *alpha2)
}

/// Wynik ładowania: wielokąty w kolejności ze zbioru i słownik krajów.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub records: Vec<PolygonRecord>,
    pub directory: CountryDirectory,
}

impl Dataset {
    /// Parsuje GeoJSON. Każdy błąd daje pusty zbiór, nigdy panikę.
    pub fn load(bytes: &[u8], projection: Projection) -> Self {
        match Self::try_load(bytes, projection) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!(error = %err, "nie udało się wczytać granic krajów, mapa będzie pusta");
                Self::default()
            }
        }
    }

    pub fn load_file<P: AsRef<Path>>(path: P, projection: Projection) -> Self {
        let path = path.as_ref();
        match Self::try_load_file(path, projection) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "nie udało się wczytać granic krajów");
                Self::default()
            }
        }
    }

    pub fn try_load_file(path: &Path, projection: Projection) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| AtlasError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::try_load(&bytes, projection)
    }

    pub fn try_load(bytes: &[u8], projection: Projection) -> Result<Self> {
        let value: JsonValue = serde_json::from_slice(bytes)?;
        let GeoJson::FeatureCollection(fc) = GeoJson::from_json_value(value)? else {
            return Err(AtlasError::NotAFeatureCollection);
        };

        let mut dataset = Self::default();
        for feature in fc.features {
            dataset.push_feature(feature, projection)?;
        }

        info!(
            countries = dataset.directory.len(),
            polygons = dataset.records.len(),
            "wczytano granice krajów"
        );
        Ok(dataset)
    }

    fn push_feature(&mut self, feature: Feature, projection: Projection) -> Result<()> {
        let props = feature
            .properties
            .as_ref()
            .map(string_properties)
            .unwrap_or_default();

        let name = extract_name(&props);
        let id = extract_id(&props, &name);
        let alpha2 = extract_alpha2(&props);
        let continent = CONTINENT_FIELDS
            .iter()
            .find_map(|k| props.get(*k).filter(|c| !c.is_empty()));

        self.directory.record(&id, &name, alpha2.as_deref(), continent.map(String::as_str));

        let Some(gj) = feature.geometry else {
            debug!(country = %id, "obiekt bez geometrii");
            return Ok(());
        };
        let geom: Geometry<f64> = gj.value.try_into()?;
        self.push_geometry(geom, &id, &name, projection);
        Ok(())
    }

    fn push_geometry(&mut self, geom: Geometry<f64>, id: &str, name: &str, projection: Projection) {
        let project = |c: Coord<f64>| {
            let (x, y) = projection.project(c.x, c.y);
            Coord { x, y }
        };
        match geom {
            Geometry::Polygon(p) => {
                self.records.push(PolygonRecord::new(id, name, p.map_coords(project)));
            }
            Geometry::MultiPolygon(mp) => {
                for p in mp {
                    self.records.push(PolygonRecord::new(id, name, p.map_coords(project)));
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc {
                    self.push_geometry(g, id, name, projection);
                }
            }
            _ => debug!(country = %id, "pominięto geometrię inną niż wielokąt"),
        }
    }
}

/// Spłaszcza właściwości do napisów; liczby zamieniane na tekst, reszta pomijana.
fn string_properties(props: &JsonObject) -> BTreeMap<String, String> {
    props
        .iter()
        .filter_map(|(k, v)| match v {
            JsonValue::String(s) => Some((k.clone(), s.clone())),
            JsonValue::Number(n) => Some((k.clone(), n.to_string())),
            _ => None,
        })
        .collect()
}

fn extract_name(props: &BTreeMap<String, String>) -> String {
    NAME_FIELDS
        .iter()
        .find_map(|k| props.get(*k).filter(|n| !n.is_empty()))
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string())
}

fn valid_code(value: Option<&String>, len: usize) -> Option<String> {
    value
        .filter(|v| v.as_str() != MISSING_CODE && v.chars().count() == len)
        .cloned()
}

fn extract_id(props: &BTreeMap<String, String>, fallback_name: &str) -> String {
    if let Some(id) = ALPHA3_FIELDS.iter().find_map(|k| valid_code(props.get(*k), 3)) {
        return id;
    }
    if let Some(id) = props.get("id").filter(|v| !v.is_empty() && v.as_str() != MISSING_CODE) {
        return id.clone();
    }
    if fallback_name.is_empty() || fallback_name == MISSING_CODE {
        return "Unknown".to_string();
    }
    fallback_name.to_string()
}

fn extract_alpha2(props: &BTreeMap<String, String>) -> Option<String> {
    let raw = ALPHA2_FIELDS.iter().find_map(|k| props.get(*k));
    valid_code(raw, 2)
}
