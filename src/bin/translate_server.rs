use std::collections::BTreeMap;

use mod_translator::TranslationHandler;
use mod_translator::catalog::export_catalog_json;
use mod_translator::config::{
    BIND_ADDR_ENV, MODEL_ENV, PROVIDER_ENV, ServerConfig, TranslatorConfig,
};
use mod_translator::server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "mod_translator=info,translate_server=info,tower_http=info";

enum CliCommand {
    Serve(BTreeMap<&'static str, String>),
    ListProviders,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let overrides = match parse_args(std::env::args().skip(1).collect())? {
        CliCommand::ListProviders => {
            println!("{}", export_catalog_json()?);
            return Ok(());
        }
        CliCommand::Serve(overrides) => overrides,
    };

    let lookup = |name: &str| {
        overrides
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    };
    let translator_config = TranslatorConfig::from_lookup(lookup)?;
    let server_config = ServerConfig::from_lookup(lookup)?;

    info!(config = ?translator_config, "loaded translator configuration");
    if !translator_config.has_api_key() {
        warn!(
            env_var = translator_config.profile().api_key_env,
            "provider API key is not set; translation requests will fail until it is configured"
        );
    }

    let handler = TranslationHandler::from_config(&translator_config)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    server::serve(listener, handler).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_args(args: Vec<String>) -> Result<CliCommand, Box<dyn std::error::Error>> {
    let mut overrides = BTreeMap::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--provider" => {
                let value = args
                    .get(i + 1)
                    .ok_or("missing value for --provider (deepseek|together|vsegpt)")?;
                overrides.insert(PROVIDER_ENV, value.clone());
                i += 2;
            }
            "--model" => {
                let value = args
                    .get(i + 1)
                    .ok_or("missing value for --model")?
                    .trim()
                    .to_string();
                if value.is_empty() {
                    return Err("--model must be non-empty".into());
                }
                overrides.insert(MODEL_ENV, value);
                i += 2;
            }
            "--bind" => {
                let value = args.get(i + 1).ok_or("missing value for --bind")?;
                overrides.insert(BIND_ADDR_ENV, value.clone());
                i += 2;
            }
            "--list-providers" => return Ok(CliCommand::ListProviders),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                return Err(format!("unknown argument: {other}").into());
            }
        }
    }

    Ok(CliCommand::Serve(overrides))
}

fn print_help() {
    println!(
        "translate_server: English to Russian game-mod translation endpoint

Usage: translate_server [--provider deepseek|together|vsegpt] [--model ID] [--bind ADDR]
       translate_server --list-providers

Environment:
  {PROVIDER_ENV}      provider id (default deepseek)
  {MODEL_ENV}         model override
  TRANSLATOR_BASE_URL      base URL override
  TRANSLATOR_MAX_TOKENS    completion token ceiling override
  TRANSLATOR_TIMEOUT_MS    upstream timeout override
  {BIND_ADDR_ENV}     listen address (default 0.0.0.0:8080)
  DEEPSEEK_API_KEY | TOGETHER_API_KEY | VSEGPT_API_KEY
  RUST_LOG                 tracing filter"
    );
}
