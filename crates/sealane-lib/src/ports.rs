//! Port catalog loading and nearest-port resolution.
//!
//! Ports are the "last mile" endpoints a user picks. They are distinct from the
//! sea-lane nodes: a resolved port is later snapped to its nearest node before
//! searching.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

const EMBEDDED_PORTS_CSV: &str = include_str!("../data/ports.csv");

static EMBEDDED_PORTS: OnceCell<PortCatalog> = OnceCell::new();

/// A named real-world port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub country: String,
    pub region: String,
    pub coordinate: Coordinate,
}

impl Port {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            region: region.into(),
            coordinate,
        }
    }
}

/// Non-empty collection of ports.
#[derive(Debug, Clone)]
pub struct PortCatalog {
    ports: Vec<Port>,
    by_name: HashMap<String, usize>,
    source: Option<PathBuf>,
}

impl PortCatalog {
    /// Build a catalog from a list of ports.
    ///
    /// Fails when the list is empty or a port has an invalid coordinate; a
    /// catalog that exists always resolves a coordinate to some port.
    pub fn new(ports: Vec<Port>) -> Result<Self> {
        if ports.is_empty() {
            return Err(Error::EmptyPortCatalog);
        }
        if let Some(bad) = ports.iter().find(|port| !port.coordinate.is_valid()) {
            return Err(Error::InvalidCoordinate {
                lon: bad.coordinate.lon,
                lat: bad.coordinate.lat,
            });
        }

        let by_name = ports
            .iter()
            .enumerate()
            .map(|(index, port)| (port.name.to_lowercase(), index))
            .collect();

        Ok(Self {
            ports,
            by_name,
            source: None,
        })
    }

    /// Load a catalog from a CSV file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        info!(path = %path.display(), ports = catalog.len(), "loaded port catalog");
        Ok(catalog)
    }

    /// Load a catalog from CSV with `name`, `country`, `region`, `longitude`
    /// and `latitude` columns. Common header spellings (`lon`, `lng`, `lat`,
    /// `port`) are accepted.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::PortCatalog {
                message: format!("failed to read headers: {err}"),
            })?
            .clone();

        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        };
        let normalized_headers: Vec<String> = headers.iter().map(normalize).collect();

        let synonyms: &[(&str, &[&str])] = &[
            ("name", &["name", "port", "port_name", "portname"]),
            ("country", &["country", "country_name"]),
            ("region", &["region", "area", "zone"]),
            ("longitude", &["longitude", "lon", "lng", "long", "x"]),
            ("latitude", &["latitude", "lat", "y"]),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alternatives) in synonyms {
            if let Some(position) = alternatives
                .iter()
                .find_map(|alt| normalized_headers.iter().position(|h| h == alt))
            {
                index_map.insert(*canon, position);
            }
        }

        let missing: Vec<&str> = ["name", "longitude", "latitude"]
            .into_iter()
            .filter(|column| !index_map.contains_key(column))
            .collect();
        if !missing.is_empty() {
            return Err(Error::PortCatalog {
                message: format!(
                    "missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut ports = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let field = |column: &str| {
                index_map
                    .get(column)
                    .and_then(|&i| record.get(i))
                    .unwrap_or("")
            };
            let number = |column: &str| -> Result<f64> {
                field(column).parse::<f64>().map_err(|err| Error::PortCatalog {
                    message: format!("row {}: invalid {column} '{}': {err}", row + 1, field(column)),
                })
            };

            let name = field("name");
            if name.is_empty() {
                return Err(Error::PortCatalog {
                    message: format!("row {}: port name is empty", row + 1),
                });
            }

            ports.push(Port::new(
                name,
                field("country"),
                field("region"),
                Coordinate::new(number("longitude")?, number("latitude")?),
            ));
        }

        Self::new(ports)
    }

    /// The catalog compiled into the library.
    pub fn embedded() -> Result<Self> {
        EMBEDDED_PORTS
            .get_or_try_init(|| Self::from_reader(EMBEDDED_PORTS_CSV.as_bytes()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always `false` for a constructed catalog; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    /// File the catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Case-insensitive lookup by port name.
    pub fn get(&self, name: &str) -> Option<&Port> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.ports[index])
    }

    /// Resolve a port by name, suggesting close matches on failure.
    pub fn resolve_name(&self, name: &str) -> Result<&Port> {
        self.get(name).ok_or_else(|| Error::UnknownPort {
            name: name.to_string(),
            suggestions: self.fuzzy_matches(name, 3),
        })
    }

    /// Port names similar to `name`, most similar first.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        const MIN_SIMILARITY: f64 = 0.75;
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .ports
            .iter()
            .map(|port| {
                (
                    strsim::jaro_winkler(&needle, &port.name.to_lowercase()),
                    port.name.as_str(),
                )
            })
            .filter(|(score, _)| *score >= MIN_SIMILARITY)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Ports whose name, country or region contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&Port> {
        let needle = query.to_lowercase();
        self.ports
            .iter()
            .filter(|port| {
                port.name.to_lowercase().contains(&needle)
                    || port.country.to_lowercase().contains(&needle)
                    || port.region.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Nearest port to `coordinate`, skipping ports named in `exclude`.
    ///
    /// Exclusion is case-insensitive. When every port is excluded the
    /// exclusion is ignored so a port is always returned.
    pub fn nearest(&self, coordinate: &Coordinate, exclude: &[&str]) -> &Port {
        let closest = |skip: &[&str]| {
            self.ports
                .iter()
                .filter(|port| !skip.iter().any(|name| port.name.eq_ignore_ascii_case(name)))
                .min_by(|a, b| {
                    a.coordinate
                        .distance_nm(coordinate)
                        .total_cmp(&b.coordinate.distance_nm(coordinate))
                })
        };

        closest(exclude)
            .or_else(|| closest(&[]))
            .unwrap_or(&self.ports[0])
    }
}
