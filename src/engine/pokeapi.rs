use crate::model::{LookupConfig, LookupError, LookupResult, Query, StatEntry};
use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

/// Thin PokéAPI client. Timeouts are owned by the controller, not by reqwest.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PokeApiClient {
    pub fn new(cfg: &LookupConfig) -> Result<Self> {
        let base_url = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid base URL: {}", cfg.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("base URL cannot carry a path: {}", cfg.base_url);
        }
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("build HTTP client")?;
        Ok(Self { http, base_url })
    }

    /// `{base}/api/v2/pokemon/{query}` with the query as one percent-encoded segment.
    pub fn pokemon_url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v2", "pokemon", query.as_str()]);
        }
        url
    }

    pub async fn fetch_pokemon(&self, query: &Query) -> Result<LookupResult, LookupError> {
        let url = self.pokemon_url(query);
        debug!(%url, "requesting pokemon");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::HttpError(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;
        parse_pokemon(&body)
    }
}

#[derive(Debug, Deserialize)]
struct PokemonPayload {
    id: u32,
    height: u32,
    weight: u32,
    base_experience: Option<u32>,
    abilities: Vec<AbilitySlot>,
    types: Vec<TypeSlot>,
    stats: Vec<StatSlot>,
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    front_default: Option<String>,
    #[serde(default)]
    other: OtherSprites,
}

#[derive(Debug, Default, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Artwork,
}

#[derive(Debug, Default, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

/// Parse a response body. A body without a non-empty `name` is invalid even
/// if everything else is present.
pub fn parse_pokemon(body: &[u8]) -> Result<LookupResult, LookupError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| LookupError::InvalidPayload(format!("malformed JSON: {e}")))?;

    let name = match value.get("name").and_then(|v| v.as_str()) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => return Err(LookupError::InvalidPayload("missing name field".into())),
    };

    let payload: PokemonPayload = serde_json::from_value(value)
        .map_err(|e| LookupError::InvalidPayload(e.to_string()))?;

    Ok(LookupResult {
        name,
        id: payload.id,
        height: payload.height,
        weight: payload.weight,
        base_experience: payload.base_experience,
        abilities: payload
            .abilities
            .into_iter()
            .map(|a| a.ability.name)
            .collect(),
        types: payload.types.into_iter().map(|t| t.kind.name).collect(),
        stats: payload
            .stats
            .into_iter()
            .map(|s| StatEntry {
                name: s.stat.name,
                value: s.base_stat,
            })
            .collect(),
        sprite_url: payload.sprites.front_default,
        artwork_url: payload.sprites.other.official_artwork.front_default,
    })
}
