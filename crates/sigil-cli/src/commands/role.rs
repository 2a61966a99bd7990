//! Role management commands.
//!
//! `sigil role create` - Create a role and print its role id.
//! `sigil role update` - Change a role's claims, TTLs or key.
//! `sigil role show` - Print a role's stored configuration.
//! `sigil role list` - List role names.
//! `sigil role delete` - Delete a role and its secret.
//! `sigil role rotate-id` - Replace a role's role id.

use super::{parse_duration, parse_pairs};
use anyhow::Context;
use sigil_engine::{Engine, RoleDefinition};

/// Role settings shared by `create` and `update`.
#[derive(Debug, Clone)]
pub struct RoleArgs {
    pub name: String,
    pub key: Option<String>,
    pub claims: Vec<String>,
    pub allow_custom_claims: bool,
    pub default_ttl: String,
    pub max_ttl: String,
    pub secret_ttl: Option<String>,
}

impl RoleArgs {
    fn definition(&self) -> anyhow::Result<RoleDefinition> {
        Ok(RoleDefinition {
            name: self.name.clone(),
            key: self.key.clone(),
            default_claims: parse_pairs(&self.claims)?,
            allow_custom_claims: self.allow_custom_claims,
            default_ttl: parse_duration(&self.default_ttl).context("Invalid --default-ttl")?,
            max_ttl: parse_duration(&self.max_ttl).context("Invalid --max-ttl")?,
            secret_ttl: self
                .secret_ttl
                .as_deref()
                .map(parse_duration)
                .transpose()
                .context("Invalid --secret-ttl")?,
        })
    }
}

pub async fn create(engine: &Engine, args: RoleArgs) -> anyhow::Result<String> {
    let created = engine
        .admin()
        .create_role(args.definition()?)
        .await
        .with_context(|| format!("Failed to create role '{}'", args.name))?;

    println!("✔ Created role: {}", created.role.name);
    println!("  Default TTL: {}s", created.role.default_ttl);
    println!("  Max TTL:     {}s", created.role.max_ttl);
    if let Some(key) = &created.role.key {
        println!("  Key:         {}", key);
    }
    println!();
    println!("Role id (shown once, store it securely):");
    println!("{}", created.role_id);

    Ok(created.role_id)
}

pub async fn update(engine: &Engine, args: RoleArgs) -> anyhow::Result<()> {
    let role = engine
        .admin()
        .update_role(args.definition()?)
        .await
        .with_context(|| format!("Failed to update role '{}'", args.name))?;

    println!("✔ Updated role: {}", role.name);
    Ok(())
}

pub async fn show(engine: &Engine, name: &str) -> anyhow::Result<()> {
    let role = engine.admin().get_role(name).await?;
    println!("{}", serde_json::to_string_pretty(&role)?);
    Ok(())
}

pub async fn list(engine: &Engine) -> anyhow::Result<()> {
    let names = engine.admin().list_roles().await?;
    if names.is_empty() {
        println!("No roles defined.");
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub async fn delete(engine: &Engine, name: &str) -> anyhow::Result<()> {
    engine
        .admin()
        .delete_role(name)
        .await
        .with_context(|| format!("Failed to delete role '{}'", name))?;
    println!("✔ Deleted role: {}", name);
    Ok(())
}

pub async fn rotate_id(engine: &Engine, name: &str) -> anyhow::Result<String> {
    let role_id = engine
        .admin()
        .rotate_role_id(name)
        .await
        .with_context(|| format!("Failed to rotate role id for '{}'", name))?;

    println!("✔ Rotated role id for: {}", name);
    println!("  The previous role id no longer authorizes issuance.");
    println!();
    println!("{}", role_id);
    Ok(role_id)
}
