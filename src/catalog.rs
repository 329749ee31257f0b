//! Catalog queries over the bulk-loaded country list: search, region filter and
//! the summary figures shown on the dashboard and statistics views.

use crate::country::Country;
use clap::ValueEnum;
use std::collections::BTreeMap;

/// Countries at or below this population are ignored for "least populated".
const LEAST_POPULATED_FLOOR: u64 = 1000;
pub const TOP_BY_POPULATION: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }
}

/// Case-insensitive name substring match, then exact region match.
pub fn filter<'c>(
    countries: &'c [Country],
    search: Option<&str>,
    region: Option<Region>,
) -> Vec<&'c Country> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    countries
        .iter()
        .filter(|c| match &needle {
            Some(n) => c.name.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .filter(|c| match region {
            Some(r) => c.region == r.as_str(),
            None => true,
        })
        .collect()
}

/// Country count per region; records without a region count as "Unknown".
pub fn region_counts(countries: &[Country]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for country in countries {
        let region = if country.region.is_empty() {
            "Unknown".to_string()
        } else {
            country.region.clone()
        };
        *counts.entry(region).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStats<'c> {
    pub total_countries: usize,
    pub continents: BTreeMap<String, usize>,
    pub most_populated: Option<&'c Country>,
    pub least_populated: Option<&'c Country>,
}

pub fn dashboard_stats(countries: &[Country]) -> DashboardStats<'_> {
    let most_populated = countries.iter().max_by_key(|c| c.population);
    let least_populated = countries
        .iter()
        .filter(|c| c.population > LEAST_POPULATED_FLOOR)
        .min_by_key(|c| c.population);
    DashboardStats {
        total_countries: countries.len(),
        continents: region_counts(countries),
        most_populated,
        least_populated,
    }
}

#[derive(Debug, Clone, Default)]
pub struct PopulationStats<'c> {
    pub total: u64,
    pub average: u64,
    pub top: Vec<&'c Country>,
}

pub fn population_stats(countries: &[Country]) -> PopulationStats<'_> {
    if countries.is_empty() {
        return PopulationStats::default();
    }
    let total: u64 = countries.iter().map(|c| c.population).sum();
    let average = (total as f64 / countries.len() as f64).round() as u64;
    let mut top: Vec<&Country> = countries.iter().collect();
    top.sort_by(|a, b| b.population.cmp(&a.population));
    top.truncate(TOP_BY_POPULATION);
    PopulationStats {
        total,
        average,
        top,
    }
}

/// 1_234_000 -> "1.23 million".
pub fn format_large_number(n: u64) -> String {
    let n_f = n as f64;
    if n >= 1_000_000_000 {
        format!("{:.2} billion", n_f / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.2} million", n_f / 1e6)
    } else if n >= 1_000 {
        format!("{:.2} thousand", n_f / 1e3)
    } else {
        n.to_string()
    }
}

/// 331000000 -> "331,000,000".
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
