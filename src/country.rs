//! Country records as served by the REST Countries v3.1 API.
//!
//! Only the fields the catalog reads are typed; the full upstream record is kept
//! verbatim in `payload` and never modified.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub official_name: Option<String>,
    pub region: String,
    pub subregion: Option<String>,
    pub population: u64,
    pub capital: Option<String>,
    #[serde(skip)]
    pub payload: Value,
}

#[derive(Deserialize)]
struct RawName {
    common: String,
    #[serde(default)]
    official: Option<String>,
}

#[derive(Deserialize)]
struct RawCountry {
    cca3: String,
    name: RawName,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    subregion: Option<String>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    capital: Option<Vec<String>>,
}

impl Country {
    /// Build from an upstream JSON record. Records without `cca3` or `name.common`
    /// are rejected; every other field is optional.
    pub fn from_value(value: Value) -> Option<Self> {
        let raw: RawCountry = serde_json::from_value(value.clone()).ok()?;
        if raw.cca3.trim().is_empty() || raw.name.common.trim().is_empty() {
            return None;
        }
        Some(Self {
            code: raw.cca3,
            name: raw.name.common,
            official_name: raw.name.official,
            region: raw.region.unwrap_or_default(),
            subregion: raw.subregion.filter(|s| !s.is_empty()),
            population: raw.population.unwrap_or(0),
            capital: raw.capital.and_then(|c| c.into_iter().next()),
            payload: value,
        })
    }

    /// Parse a JSON array of upstream records, skipping malformed entries.
    pub fn many_from_value(value: Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.into_iter().filter_map(Self::from_value).collect(),
            other => Self::from_value(other).into_iter().collect(),
        }
    }

    /// Top-level domain, currencies, languages and borders read from the payload.
    pub fn top_level_domain(&self) -> Option<&str> {
        self.payload.get("tld")?.get(0)?.as_str()
    }

    pub fn currencies(&self) -> Vec<String> {
        let Some(map) = self.payload.get("currencies").and_then(Value::as_object) else {
            return Vec::new();
        };
        map.iter()
            .map(|(code, cur)| {
                let name = cur.get("name").and_then(Value::as_str).unwrap_or(code.as_str());
                match cur.get("symbol").and_then(Value::as_str) {
                    Some(symbol) => format!("{name} ({symbol})"),
                    None => name.to_string(),
                }
            })
            .collect()
    }

    pub fn languages(&self) -> Vec<String> {
        self.payload
            .get("languages")
            .and_then(Value::as_object)
            .map(|m| {
                m.values()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn borders(&self) -> Vec<String> {
        self.payload
            .get("borders")
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) fn sample(code: &str, name: &str, region: &str, population: u64) -> Country {
    Country::from_value(serde_json::json!({
        "cca3": code,
        "name": { "common": name, "official": format!("Official {name}") },
        "region": region,
        "population": population,
        "capital": [format!("{name} City")],
    }))
    .expect("valid sample")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_upstream_record_and_keeps_payload() {
        let value = json!({
            "cca3": "CAN",
            "name": { "common": "Canada", "official": "Canada" },
            "region": "Americas",
            "subregion": "North America",
            "population": 38005238,
            "capital": ["Ottawa"],
            "tld": [".ca"],
            "flags": { "png": "can.png" },
            "currencies": { "CAD": { "name": "Canadian dollar", "symbol": "$" } },
            "languages": { "eng": "English", "fra": "French" },
            "borders": ["USA"]
        });
        let country = Country::from_value(value.clone()).unwrap();
        assert_eq!(country.code, "CAN");
        assert_eq!(country.name, "Canada");
        assert_eq!(country.capital.as_deref(), Some("Ottawa"));
        assert_eq!(country.population, 38005238);
        assert_eq!(country.payload, value);
        assert_eq!(country.top_level_domain(), Some(".ca"));
        assert_eq!(country.currencies(), vec!["Canadian dollar ($)"]);
        assert_eq!(country.languages(), vec!["English", "French"]);
        assert_eq!(country.borders(), vec!["USA"]);
    }

    #[test]
    fn missing_optional_fields_default() {
        let country = Country::from_value(json!({
            "cca3": "ATA",
            "name": { "common": "Antarctica" }
        }))
        .unwrap();
        assert_eq!(country.region, "");
        assert_eq!(country.population, 0);
        assert_eq!(country.capital, None);
        assert!(country.borders().is_empty());
    }

    #[test]
    fn records_without_code_or_name_are_rejected() {
        assert!(Country::from_value(json!({ "name": { "common": "X" } })).is_none());
        assert!(Country::from_value(json!({ "cca3": "XXX" })).is_none());
        assert!(Country::from_value(json!({ "cca3": " ", "name": { "common": "X" } })).is_none());
        assert!(Country::from_value(json!({ "cca3": "XXX", "name": { "common": "  " } })).is_none());
    }

    #[test]
    fn many_skips_bad_entries() {
        let list = Country::many_from_value(json!([
            { "cca3": "USA", "name": { "common": "United States" } },
            { "oops": true },
            { "cca3": "MEX", "name": { "common": "Mexico" } }
        ]));
        let codes: Vec<_> = list.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["USA", "MEX"]);
    }
}
