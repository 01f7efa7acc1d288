//! keygate-mint - issue a token pair from the command line
//!
//! Reads the same JWT_* variables as the server, so a pair minted here
//! verifies against a running instance with the same keys.

use clap::Parser;
use std::sync::Arc;

use keygate::auth::{KeyStore, SubjectId, TokenService};
use keygate::config::TokenArgs;

/// Mint an access/refresh token pair for a subject
#[derive(Parser, Debug)]
#[command(name = "keygate-mint")]
struct MintArgs {
    /// Subject the tokens are issued to
    #[arg(long)]
    subject: String,

    #[command(flatten)]
    tokens: TokenArgs,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = MintArgs::parse();

    let config = Arc::new(args.tokens.token_config()?);
    let keys = Arc::new(KeyStore::load(&config)?);
    let service = TokenService::with_system_clock(keys, config);

    let pair = service.issue(&SubjectId::new(args.subject))?;
    println!("{}", serde_json::to_string_pretty(&pair)?);

    Ok(())
}
