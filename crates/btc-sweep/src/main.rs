use anyhow::{Context, Result};
use btc_sweep::cli::{Cli, Commands};
use btc_sweep::config::validate_config;
use btc_sweep::{commands, init_logging, load_config, AppConfig, BlockchainInfoClient};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }

    init_logging(&config.log.level, config.log.format).context("failed to initialize logging")?;

    match cli.command {
        Commands::Keygen => {
            let out = commands::keygen(config.network).context("key generation failed")?;
            println!("{out}");
        }
        Commands::Address(args) => {
            let address = commands::address_for_pubkey(&args.pubkey, config.network)
                .context("address derivation failed")?;
            println!("{address}");
        }
        Commands::Spend(args) => {
            if let Some(fee) = args.fee {
                config.fee_sat = fee;
            }
            validate_config(&config).context("invalid fee")?;
            let client = BlockchainInfoClient::new(&config.lookup)
                .context("failed to create HTTP client")?;
            let signed = commands::spend(
                &config.sweep_config(),
                &args.privkey,
                &args.address,
                &args.txid,
                args.vout,
                &client,
            )
            .context("failed to build transaction")?;
            println!("{}", signed.hex);
        }
    }

    Ok(())
}
