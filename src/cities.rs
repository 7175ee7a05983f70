//! Fixed city coordinates, grouped by country.

use crate::{AstrologyError, Location, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A city entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub country: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Country {
    name: String,
    cities: Vec<(String, Location)>,
}

/// Country and city lookup preserving insertion order, so the first
/// country and the first city of each country act as defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gazetteer {
    countries: Vec<Country>,
}

const BUILTIN: &[(&str, &[(&str, f64, f64)])] = &[
    (
        "USA",
        &[
            ("New York", 40.7128, -74.0060),
            ("Los Angeles", 34.0522, -118.2437),
            ("Chicago", 41.8781, -87.6298),
            ("Houston", 29.7604, -95.3698),
        ],
    ),
    (
        "India",
        &[
            ("Delhi", 28.7041, 77.1025),
            ("Mumbai", 19.0760, 72.8777),
            ("Bangalore", 12.9716, 77.5946),
            ("Chennai", 13.0827, 80.2707),
        ],
    ),
];

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl Gazetteer {
    pub fn builtin() -> Self {
        let mut gazetteer = Gazetteer::default();
        for (country, cities) in BUILTIN {
            for &(city, latitude, longitude) in cities.iter() {
                gazetteer.countries_entry(country).cities.push((
                    city.to_string(),
                    Location {
                        latitude,
                        longitude,
                    },
                ));
            }
        }
        gazetteer
    }

    /// Built-in cities plus `extra`, where an extra city replaces a
    /// built-in one of the same name.
    pub fn with_extra(extra: &[CityEntry]) -> Result<Self> {
        let mut gazetteer = Gazetteer::builtin();
        for entry in extra {
            let location = Location::new(entry.latitude, entry.longitude).map_err(|e| {
                AstrologyError::Config(format!("city '{}': {e}", entry.name))
            })?;
            gazetteer.insert(&entry.country, &entry.name, location);
        }
        Ok(gazetteer)
    }

    pub fn insert(&mut self, country: &str, city: &str, location: Location) {
        let entry = self.countries_entry(country);
        match entry.cities.iter_mut().find(|(name, _)| same_name(name, city)) {
            Some(existing) => {
                debug!(country, city, "replacing built-in city");
                existing.1 = location;
            }
            None => entry.cities.push((city.trim().to_string(), location)),
        }
    }

    fn countries_entry(&mut self, country: &str) -> &mut Country {
        let index = match self
            .countries
            .iter()
            .position(|c| same_name(&c.name, country))
        {
            Some(index) => index,
            None => {
                self.countries.push(Country {
                    name: country.trim().to_string(),
                    cities: Vec::new(),
                });
                self.countries.len() - 1
            }
        };
        &mut self.countries[index]
    }

    fn country(&self, country: &str) -> Result<&Country> {
        self.countries
            .iter()
            .find(|c| same_name(&c.name, country))
            .ok_or_else(|| AstrologyError::UnknownLocation(format!("country '{country}'")))
    }

    pub fn countries(&self) -> Vec<&str> {
        self.countries.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn cities(&self, country: &str) -> Result<Vec<&str>> {
        Ok(self
            .country(country)?
            .cities
            .iter()
            .map(|(name, _)| name.as_str())
            .collect())
    }

    pub fn lookup(&self, country: &str, city: &str) -> Result<Location> {
        self.country(country)?
            .cities
            .iter()
            .find(|(name, _)| same_name(name, city))
            .map(|(_, location)| *location)
            .ok_or_else(|| AstrologyError::UnknownLocation(format!("city '{city}' in {country}")))
    }
}
