//! Client for the Fuel Track API.
//!
//! Besides the HTTP client this crate carries the dashboard's state logic:
//! the request-deduplicating query cache, mutation wrappers that invalidate
//! it, client-side table sorting, URL-bound filters with a search debouncer
//! and trip form validation.

pub mod client;
pub mod error;
pub mod form;
pub mod mutations;
pub mod query;
pub mod search;
pub mod table;
pub mod token;
pub mod types;

pub use client::FuelTrackClient;
pub use error::{ClientError, Result};
pub use form::{FormErrors, TripForm};
pub use mutations::{Notifier, TripMutations};
pub use query::{QueryCache, QueryKey, TripQueries, DEFAULT_STALE_TIME};
pub use search::{DashboardQuery, SearchDebouncer, StatusTab, SEARCH_DEBOUNCE};
pub use table::{SortConfig, SortDirection, SortField};
pub use token::{MemoryTokenStore, TokenStore};
pub use types::*;
