//! Key management commands.
//!
//! `sigil key put` - Create or replace a signing key.
//! `sigil key show` / `list` / `delete`.

use super::parse_pairs;
use anyhow::Context;
use sigil_core::{KeyEntry, SigningAlgorithm};
use sigil_engine::Engine;

pub async fn put(
    engine: &Engine,
    name: String,
    algorithm: SigningAlgorithm,
    params: Vec<String>,
) -> anyhow::Result<()> {
    let key = KeyEntry {
        name,
        algorithm,
        params: parse_pairs(&params)?,
    };
    let key = engine
        .admin()
        .put_key(key)
        .await
        .context("Failed to store key")?;

    println!("✔ Stored key: {}", key.name);
    println!("  Algorithm: {}", key.algorithm);
    if let Some(kid) = key.kid() {
        println!("  Key id:    {}", kid);
    }
    Ok(())
}

pub async fn show(engine: &Engine, name: &str) -> anyhow::Result<()> {
    let key = engine.admin().get_key(name).await?;
    println!("{}", serde_json::to_string_pretty(&key)?);
    Ok(())
}

pub async fn list(engine: &Engine) -> anyhow::Result<()> {
    let names = engine.admin().list_keys().await?;
    if names.is_empty() {
        println!("No keys defined.");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub async fn delete(engine: &Engine, name: &str) -> anyhow::Result<()> {
    engine
        .admin()
        .delete_key(name)
        .await
        .with_context(|| format!("Failed to delete key '{}'", name))?;
    println!("✔ Deleted key: {}", name);
    Ok(())
}
