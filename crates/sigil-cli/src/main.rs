mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::role::RoleArgs;
use commands::token::IssueArgs;
use sigil_core::{SigilConfig, SigningAlgorithm};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sigil", version, about = "Sigil role, key and token administration")]
struct Cli {
    /// Configuration file (defaults to $SIGIL_CONFIG, then ./sigil.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Role management
    Role {
        #[command(subcommand)]
        cmd: RoleCommand,
    },

    /// Signing-key management
    Key {
        #[command(subcommand)]
        cmd: KeyCommand,
    },

    /// Token issuance and validation
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(clap::Args, Debug)]
struct RoleSettings {
    /// Role name
    name: String,

    /// Signing key bound to the role (defaults to tokens.default_algorithm)
    #[arg(long)]
    key: Option<String>,

    /// Default claim, as name=value (repeatable)
    #[arg(long = "claim")]
    claims: Vec<String>,

    /// Let callers add or override claims
    #[arg(long, default_value_t = false)]
    allow_custom_claims: bool,

    /// Token lifetime when none is requested (e.g. 600, 10m, 1h)
    #[arg(long, default_value = "1h")]
    default_ttl: String,

    /// Longest token lifetime a caller may request
    #[arg(long, default_value = "24h")]
    max_ttl: String,

    /// Lifetime of the role's signing secret (defaults to secrets.default_ttl_secs)
    #[arg(long)]
    secret_ttl: Option<String>,
}

impl From<RoleSettings> for RoleArgs {
    fn from(s: RoleSettings) -> Self {
        Self {
            name: s.name,
            key: s.key,
            claims: s.claims,
            allow_custom_claims: s.allow_custom_claims,
            default_ttl: s.default_ttl,
            max_ttl: s.max_ttl,
            secret_ttl: s.secret_ttl,
        }
    }
}

#[derive(Subcommand, Debug)]
enum RoleCommand {
    /// Create a role and print its role id
    Create(RoleSettings),

    /// Replace a role's claims, TTLs and key
    Update(RoleSettings),

    /// Show a role
    Show { name: String },

    /// List roles
    List,

    /// Delete a role and its secret
    Delete { name: String },

    /// Issue a new role id, revoking the old one
    RotateId { name: String },
}

#[derive(Subcommand, Debug)]
enum KeyCommand {
    /// Create or replace a key
    Put {
        name: String,

        /// HS256, HS384 or HS512
        #[arg(long, default_value = "HS256")]
        algorithm: SigningAlgorithm,

        /// Key parameter, as name=value (repeatable); `kid` goes into token headers
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// Show a key
    Show { name: String },

    /// List keys
    List,

    /// Delete a key no role uses
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a token for a role
    Issue {
        /// Role name
        role: String,

        /// Role id proving access to the role
        #[arg(long, env = "SIGIL_ROLE_ID")]
        role_id: Option<String>,

        /// Requested lifetime; 0 or unset uses the role default
        #[arg(long)]
        ttl: Option<String>,

        /// Custom claim, as name=value (repeatable)
        #[arg(long = "claim")]
        claims: Vec<String>,

        /// Token type (only "jwt" is supported)
        #[arg(long = "type")]
        token_type: Option<String>,

        /// Write the token to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate a token (inline or a path to a file containing it)
    Validate {
        token: String,

        /// Role to validate against (defaults to the token's role_name claim)
        #[arg(long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = SigilConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("Invalid logging.filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let engine = commands::open_engine(&config).await?;

    match cli.cmd {
        Command::Role { cmd } => match cmd {
            RoleCommand::Create(settings) => {
                commands::role::create(&engine, settings.into()).await?;
            }
            RoleCommand::Update(settings) => commands::role::update(&engine, settings.into()).await?,
            RoleCommand::Show { name } => commands::role::show(&engine, &name).await?,
            RoleCommand::List => commands::role::list(&engine).await?,
            RoleCommand::Delete { name } => commands::role::delete(&engine, &name).await?,
            RoleCommand::RotateId { name } => {
                commands::role::rotate_id(&engine, &name).await?;
            }
        },

        Command::Key { cmd } => match cmd {
            KeyCommand::Put {
                name,
                algorithm,
                params,
            } => commands::key::put(&engine, name, algorithm, params).await?,
            KeyCommand::Show { name } => commands::key::show(&engine, &name).await?,
            KeyCommand::List => commands::key::list(&engine).await?,
            KeyCommand::Delete { name } => commands::key::delete(&engine, &name).await?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Issue {
                role,
                role_id,
                ttl,
                claims,
                token_type,
                output,
            } => {
                commands::token::issue(
                    &engine,
                    IssueArgs {
                        role,
                        role_id,
                        ttl,
                        claims,
                        token_type,
                        output,
                    },
                )
                .await?;
            }
            TokenCommand::Validate { token, role } => {
                if !commands::token::validate(&engine, &token, role).await? {
                    std::process::exit(1);
                }
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_role_create() {
        let cli = Cli::try_parse_from([
            "sigil",
            "--config",
            "sigil.toml",
            "role",
            "create",
            "billing",
            "--claim",
            "scope=read",
            "--claim",
            "tier=gold",
            "--max-ttl",
            "2h",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("sigil.toml")));
        match cli.cmd {
            Command::Role {
                cmd: RoleCommand::Create(settings),
            } => {
                assert_eq!(settings.name, "billing");
                assert_eq!(settings.claims.len(), 2);
                assert_eq!(settings.default_ttl, "1h");
                assert_eq!(settings.max_ttl, "2h");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_key_algorithm() {
        let cli = Cli::try_parse_from(["sigil", "key", "put", "primary", "--algorithm", "hs512"])
            .unwrap();
        match cli.cmd {
            Command::Key {
                cmd: KeyCommand::Put { algorithm, .. },
            } => assert_eq!(algorithm, SigningAlgorithm::HS512),
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["sigil", "key", "put", "primary", "--algorithm", "RS256"]).is_err());
    }
}
