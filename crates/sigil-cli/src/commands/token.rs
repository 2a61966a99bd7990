//! Token commands.
//!
//! `sigil token issue` - Issue a token for a role.
//! `sigil token validate` - Check a token against its role's current secret.

use super::{parse_duration, parse_pairs};
use anyhow::Context;
use sigil_engine::{Engine, TokenCreateRequest, TokenValidateRequest};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct IssueArgs {
    pub role: String,
    pub role_id: Option<String>,
    pub ttl: Option<String>,
    pub claims: Vec<String>,
    pub token_type: Option<String>,
    pub output: Option<PathBuf>,
}

pub async fn issue(engine: &Engine, args: IssueArgs) -> anyhow::Result<String> {
    let request = TokenCreateRequest {
        role_name: args.role.clone(),
        role_id: args.role_id,
        claims: parse_pairs(&args.claims)?,
        ttl: args
            .ttl
            .as_deref()
            .map(parse_duration)
            .transpose()
            .context("Invalid --ttl")?
            .unwrap_or(0),
        token_type: args.token_type,
    };
    let issued = engine
        .issue(&request)
        .await
        .with_context(|| format!("Failed to issue token for role '{}'", args.role))?;

    if let Some(output_path) = args.output {
        fs::write(&output_path, &issued.token)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Role: {}", args.role);
        println!("  TTL:  {}s", issued.ttl);
        if let Some(expires_at) = issued.expires_at() {
            println!("  Expires: {}", expires_at.to_rfc3339());
        }
    } else {
        println!("{}", issued.token);
    }

    Ok(issued.token)
}

/// Validate a token given inline or as a path to a file containing it.
pub async fn validate(engine: &Engine, token: &str, role: Option<String>) -> anyhow::Result<bool> {
    let token = match fs::read_to_string(token) {
        Ok(contents) => contents.trim().to_string(),
        Err(_) => token.trim().to_string(),
    };

    let mut request = TokenValidateRequest::new(token);
    request.role_name = role;
    let outcome = engine.validate(&request).await?;

    if outcome.is_valid {
        println!("✔ Token is valid");
    } else {
        println!("✘ Token is not valid");
    }
    Ok(outcome.is_valid)
}
