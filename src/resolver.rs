//! Resolve stored codes into full country records.
//!
//! Lookups run in parallel and are gathered back in input order. A code that
//! fails or no longer exists is dropped; the batch itself never fails.

use crate::country::Country;
use crate::data_source::CountryDataSource;
use rayon::prelude::*;
use std::collections::HashMap;

pub struct EntityResolver<'a> {
    source: &'a dyn CountryDataSource,
}

impl<'a> EntityResolver<'a> {
    pub fn new(source: &'a dyn CountryDataSource) -> Self {
        Self { source }
    }

    pub fn resolve(&self, codes: &[String]) -> Vec<Country> {
        let source = self.source;
        codes
            .par_iter()
            .map(|code| match source.fetch_by_code(code) {
                Ok(Some(country)) => Some(country),
                Ok(None) => {
                    tracing::debug!(code = code.as_str(), "dropping code with no matching country");
                    None
                }
                Err(err) => {
                    tracing::warn!(code = code.as_str(), error = %err, "lookup failed, dropping code");
                    None
                }
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Resolve against an already-loaded catalog without touching the data source.
pub fn resolve_from(codes: &[String], catalog: &[Country]) -> Vec<Country> {
    let index: HashMap<&str, &Country> = catalog.iter().map(|c| (c.code.as_str(), c)).collect();
    codes
        .iter()
        .filter_map(|code| index.get(code.as_str()).map(|c| (*c).clone()))
        .collect()
}
