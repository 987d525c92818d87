use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use kit_core::logging;
use kit_core::{
    AlchemyAccountsConfig, FileStorage, KitSettings, StateUpdate, Storage, create_config,
    create_default_account_state, get_bundler_client, get_chain, get_connection,
    get_signer_status, set_chain,
};
use kit_infra::chain_by_id;
use kit_ui::{MintCardActionButtonsProps, render_mint_card_action_buttons};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "account-kit", version, about = "Load, rehydrate and print the account kit state")]
struct Cli {
    /// Settings file (defaults to ~/.account-kit/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Switch to this chain id after rehydrating
    #[arg(long)]
    chain: Option<u64>,

    /// Render the mint card in its post-transfer state
    #[arg(long)]
    minted: bool,
}

// ---------------------------------------------------------------------------
// Store setup
// ---------------------------------------------------------------------------

async fn init_store(settings: KitSettings) -> Result<AlchemyAccountsConfig> {
    let storage_dir = settings.resolved_storage_dir()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&storage_dir));
    info!("Persisting account state under {}", storage_dir.display());

    let config = create_config(settings.into_props(storage)?)?;
    config.store.rehydrate().await?;

    let chains: Vec<_> = config.store.get_state().chains().cloned().collect();
    config
        .store
        .set_state(StateUpdate::new().accounts(create_default_account_state(&chains)))
        .await?;
    Ok(config)
}

fn print_summary(config: &AlchemyAccountsConfig) -> Result<()> {
    let state = config.store.get_state();
    let connection = get_connection(config)?;
    let bundler = get_bundler_client(config);

    println!("Active chain:    {}", get_chain(config));
    println!("Bundler RPC:     {}", bundler.rpc_url()?);
    if let Some(policy_id) = &connection.policy_id {
        println!("Gas policy:      {policy_id}");
    }
    println!("Signer status:   {:?}", get_signer_status(config).status());
    println!("Registered chains:");
    for chain in state.chains() {
        println!("  - {chain}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

async fn run(args: Cli) -> Result<()> {
    let settings = match &args.config {
        Some(path) => KitSettings::load_from_path(path)?,
        None => KitSettings::load()?,
    };
    let _log_guard = logging::init_logging(&settings)?;
    info!("Starting account-kit v{VERSION}");

    let config = init_store(settings).await?;

    if let Some(id) = args.chain {
        let chain = chain_by_id(id).with_context(|| format!("unknown chain id {id}"))?;
        set_chain(&config, chain).await?;
    }

    print_summary(&config)?;

    let card = MintCardActionButtonsProps::new(args.minted, || info!("Collect NFT clicked"));
    println!("{}", render_mint_card_action_buttons(&card).into_string());
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("account-kit failed: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
