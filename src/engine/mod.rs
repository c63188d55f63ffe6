#[cfg(test)]
pub(crate) mod fixtures;
mod pokeapi;

pub use pokeapi::PokeApiClient;

use crate::model::{LookupError, LookupResult, Query};
use std::future::Future;

/// Where lookups come from. The controller only sees this trait, so the
/// lifecycle logic can be driven by a scripted source in tests.
pub trait CreatureSource: Send + Sync + 'static {
    fn fetch(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<LookupResult, LookupError>> + Send;
}

impl CreatureSource for PokeApiClient {
    fn fetch(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<LookupResult, LookupError>> + Send {
        self.fetch_pokemon(query)
    }
}
