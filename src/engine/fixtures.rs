//! Canned PokéAPI data shared by unit tests.

use crate::model::{LookupResult, StatEntry};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Trimmed `GET /api/v2/pokemon/pikachu` body; unused fields removed.
pub const PIKACHU_JSON: &str = r#"{
  "abilities": [
    {"ability": {"name": "static", "url": "https://pokeapi.co/api/v2/ability/9/"}, "is_hidden": false, "slot": 1},
    {"ability": {"name": "lightning-rod", "url": "https://pokeapi.co/api/v2/ability/31/"}, "is_hidden": true, "slot": 3}
  ],
  "base_experience": 112,
  "height": 4,
  "id": 25,
  "name": "pikachu",
  "sprites": {
    "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png",
    "other": {
      "official-artwork": {
        "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/25.png"
      }
    }
  },
  "stats": [
    {"base_stat": 35, "effort": 0, "stat": {"name": "hp"}},
    {"base_stat": 55, "effort": 0, "stat": {"name": "attack"}},
    {"base_stat": 40, "effort": 0, "stat": {"name": "defense"}},
    {"base_stat": 50, "effort": 0, "stat": {"name": "special-attack"}},
    {"base_stat": 50, "effort": 0, "stat": {"name": "special-defense"}},
    {"base_stat": 90, "effort": 2, "stat": {"name": "speed"}}
  ],
  "types": [
    {"slot": 1, "type": {"name": "electric"}}
  ],
  "weight": 60
}"#;

pub fn pikachu() -> LookupResult {
    let stat = |name: &str, value| StatEntry {
        name: name.to_string(),
        value,
    };
    LookupResult {
        name: "pikachu".into(),
        id: 25,
        height: 4,
        weight: 60,
        base_experience: Some(112),
        abilities: vec!["static".into(), "lightning-rod".into()],
        types: vec!["electric".into()],
        stats: vec![
            stat("hp", 35),
            stat("attack", 55),
            stat("defense", 40),
            stat("special-attack", 50),
            stat("special-defense", 50),
            stat("speed", 90),
        ],
        sprite_url: Some(
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
                .into(),
        ),
        artwork_url: Some(
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/25.png"
                .into(),
        ),
    }
}

/// Serve one canned HTTP response on a local port. Returns the base URL and a
/// handle yielding the request head.
pub async fn serve_once(response: String) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = sock.read(&mut buf).await.unwrap();
        let head = String::from_utf8_lossy(&buf[..n]).to_string();
        sock.write_all(response.as_bytes()).await.unwrap();
        let _ = sock.shutdown().await;
        head
    });
    (format!("http://{addr}"), handle)
}

pub fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}
