//! CLI command implementations.

pub mod key;
pub mod role;
pub mod token;

use anyhow::{Context, bail};
use sigil_core::{Claims, SigilConfig, StorageBackend};
use sigil_engine::Engine;

/// Build an engine over the configured storage.
pub async fn open_engine(config: &SigilConfig) -> anyhow::Result<Engine> {
    if config.storage.backend == StorageBackend::Memory {
        tracing::warn!("Using in-memory storage; nothing will persist after this command");
    }
    let storage = sigil_storage::create_storage(&config.storage).with_context(|| {
        format!(
            "Failed to open storage at {}",
            config.storage.path.display()
        )
    })?;
    Engine::new(storage, config)
        .await
        .context("Failed to initialise engine")
}

/// Parse a duration like "90s", "10m", "24h" or "7d" into seconds. A bare
/// number is taken as seconds.
pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
    let s = s.trim().to_lowercase();

    let (digits, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s.as_str(), 's'),
    };
    let value: u64 = digits
        .parse()
        .with_context(|| format!("Invalid duration '{}'", s))?;
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        other => bail!("Unknown duration unit '{}' (expected s, m, h or d)", other),
    };
    value
        .checked_mul(multiplier)
        .with_context(|| format!("Duration '{}' is too large", s))
}

/// Parse repeated `name=value` arguments into a claim map.
pub fn parse_pairs(pairs: &[String]) -> anyhow::Result<Claims> {
    pairs
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .with_context(|| format!("Expected name=value, got '{}'", pair))?;
            if name.is_empty() {
                bail!("Empty name in '{}'", pair);
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}
