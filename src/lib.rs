//! Country catalog core: per-user favorites and recently viewed collections over a
//! local key/value store, plus the country data sources and catalog queries the
//! views are built on.

pub mod catalog;
pub mod collection;
pub mod country;
pub mod data_source;
pub mod list_codec;
pub mod local_store;
pub mod membership;
pub mod recency;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod sqlite_store;
pub mod store_key;
pub mod view_state;
