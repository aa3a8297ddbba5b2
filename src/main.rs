//! # cart-orchestrator
//!
//! Command-line front end for [`CartService`].
//!
//! ```bash
//! cart-orchestrator --user 1 add --sku 1001 --count 2
//! cart-orchestrator --user 1 show
//! printf 'add --sku 1001 --count 2\nshow\n' | cart-orchestrator --user 1 script
//! ```
//!
//! Exit codes: `0` success, `2` product not found, `1` anything else.

use cart_orchestrator::config::{load_env_file, CartConfig, ConfigError};
use cart_orchestrator::lifecycle::{setup_tracing, CartSystem, ShutdownError, StartupError};
use cart_orchestrator::model::{SkuId, UserId};
use cart_orchestrator::validation::{parse_count, parse_sku_id, parse_user_id};
use cart_orchestrator::{CartError, CartService};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info, Instrument};

#[derive(Debug, Parser)]
#[command(name = "cart-orchestrator", version, about = "Shopping carts priced by the product service")]
struct Cli {
    /// Cart owner
    #[arg(long, env = "CART_USER", value_parser = parse_user_id)]
    user: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Add units of a product to the cart
    Add {
        #[arg(long, value_parser = parse_sku_id)]
        sku: u64,
        #[arg(long, value_parser = parse_count)]
        count: u64,
    },
    /// Remove one product from the cart
    Delete {
        #[arg(long, value_parser = parse_sku_id)]
        sku: u64,
    },
    /// Remove every product from the cart
    Clear,
    /// Print the priced cart as JSON
    Show,
    /// Read one command per line from stdin, all against the same store
    Script,
}

/// One line of a script.
#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
struct ScriptLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },
    #[error("Output error: {0}")]
    Output(String),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Cart(e) if e.is_not_found() => 2,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();
    // `.env` may supply CART_USER, so it has to be loaded before clap reads the environment
    load_env_file();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = CartConfig::from_env()?;
    let system = CartSystem::from_config(&config).await?;
    let user_id = UserId(cli.user);

    let interrupt = system.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling requests");
            interrupt.cancel();
        }
    });

    let result = match cli.command {
        Command::Script => run_script(&system, user_id, BufReader::new(tokio::io::stdin())).await,
        command => execute(&system, user_id, command).await,
    };

    system.shutdown().await?;
    result
}

async fn run_script<R>(system: &CartSystem, user_id: UserId, input: R) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut line_no = 0;
    loop {
        line_no += 1;
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                return Err(AppError::Script {
                    line: line_no,
                    message: e.to_string(),
                })
            }
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() || words[0].starts_with('#') {
            continue;
        }

        let parsed = ScriptLine::try_parse_from(words).map_err(|e| AppError::Script {
            line: line_no,
            message: e.to_string(),
        })?;
        if matches!(parsed.command, Command::Script) {
            return Err(AppError::Script {
                line: line_no,
                message: "scripts cannot be nested".into(),
            });
        }

        let span = tracing::info_span!("script", line = line_no);
        execute(system, user_id, parsed.command).instrument(span).await?;
    }
    Ok(())
}

async fn execute(system: &CartSystem, user_id: UserId, command: Command) -> Result<(), AppError> {
    let service: &CartService = &system.service;
    let ctx = system.request_context();

    match command {
        Command::Add { sku, count } => {
            service.add_to_cart(&ctx, user_id, SkuId(sku), count).await?;
            info!(%user_id, sku, count, "Added");
        }
        Command::Delete { sku } => {
            service.delete_item(&ctx, user_id, SkuId(sku)).await?;
            info!(%user_id, sku, "Deleted");
        }
        Command::Clear => {
            service.clear_cart(&ctx, user_id).await?;
            info!(%user_id, "Cleared");
        }
        Command::Show => {
            let view = service.get_cart(&ctx, user_id).await?;
            let json = serde_json::to_string_pretty(&view).map_err(|e| AppError::Output(e.to_string()))?;
            println!("{json}");
        }
        Command::Script => {
            return Err(AppError::Script {
                line: 0,
                message: "scripts cannot be nested".into(),
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cart_orchestrator::context::RequestContext;
    use cart_orchestrator::model::Product;
    use cart_orchestrator::product::{LookupError, ProductLookup};
    use std::sync::Arc;

    struct Mugs;

    #[async_trait]
    impl ProductLookup for Mugs {
        async fn get_product(&self, _ctx: &RequestContext, sku_id: SkuId) -> Result<Product, LookupError> {
            match sku_id.0 {
                1002 => Ok(Product::new("Coffee Mug", 900)),
                _ => Err(LookupError::NotFound(sku_id)),
            }
        }
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from(["cart-orchestrator", "--user", "7", "add", "--sku", "1001", "--count", "2"]).unwrap();
        assert_eq!(cli.user, 7);
        assert!(matches!(cli.command, Command::Add { sku: 1001, count: 2 }));
    }

    #[test]
    fn test_cli_rejects_invalid_input() {
        assert!(Cli::try_parse_from(["cart-orchestrator", "--user", "0", "show"]).is_err());
        assert!(Cli::try_parse_from(["cart-orchestrator", "--user", "1", "add", "--sku", "5", "--count", "60001"]).is_err());
        assert!(Cli::try_parse_from(["cart-orchestrator", "--user", "1", "delete", "--sku", "x"]).is_err());
    }

    #[test]
    fn test_script_line_parses_without_binary_name() {
        let line = ScriptLine::try_parse_from(["delete", "--sku", "1002"]).unwrap();
        assert!(matches!(line.command, Command::Delete { sku: 1002 }));
    }

    #[test]
    fn test_user_can_come_from_env_file() {
        dotenvy::from_read("CART_USER=77\n".as_bytes()).unwrap();
        let cli = Cli::try_parse_from(["cart-orchestrator", "show"]).unwrap();
        assert_eq!(cli.user, 77);
    }

    #[tokio::test]
    async fn test_script_runs_every_line_against_one_store() {
        let system = CartSystem::new(Arc::new(Mugs), 2, 2);
        let script: &[u8] = b"# warm up\nadd --sku 1002 --count 2\n\nadd --sku 1002 --count 1\n";

        run_script(&system, UserId(1), script).await.unwrap();

        let view = system
            .service
            .get_cart(&RequestContext::new(), UserId(1))
            .await
            .unwrap();
        assert_eq!(view.total_price, 2700);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_script_stops_at_first_bad_line() {
        let system = CartSystem::new(Arc::new(Mugs), 2, 2);
        let script: &[u8] = b"add --sku 1002 --count 1\nadd --sku 1001 --count 1\nclear\n";

        let result = run_script(&system, UserId(1), script).await;

        assert!(matches!(&result, Err(AppError::Cart(e)) if e.is_not_found()));
        let view = system
            .service
            .get_cart(&RequestContext::new(), UserId(1))
            .await
            .unwrap();
        assert_eq!(view.total_price, 900);

        let nested = run_script(&system, UserId(1), &b"script\n"[..]).await;
        assert!(matches!(nested, Err(AppError::Script { line: 1, .. })));
        system.shutdown().await.unwrap();
    }

    #[test]
    fn test_not_found_exit_code() {
        let not_found = AppError::Cart(CartError::ProductNotFound(SkuId(1)));
        let other = AppError::Output("x".into());
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(other.exit_code(), 1);
    }
}
