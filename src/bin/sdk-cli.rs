use alloy::primitives::U256;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use contract_sdk::blockchain::Connection;
use contract_sdk::config::{load_config, Role, SdkConfig};
use contract_sdk::facades::Facade;
use contract_sdk::guards::format;
use contract_sdk::observability::logging;
use contract_sdk::provider::{HttpConnector, RpcConnector};
use contract_sdk::{AssistedProvider, Buyback, LendingPool, Staking, Vesting};

#[derive(Parser)]
#[command(name = "sdk-cli")]
#[command(about = "Read-only inspection CLI for the deployed contracts", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Window {
    #[arg(long, default_value_t = 0)]
    offset: u64,

    #[arg(long, default_value_t = 10)]
    limit: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Contract {
    LendingPool,
    Staking,
    Buyback,
    Vesting,
}

#[derive(Subcommand)]
enum Commands {
    /// List lending pools
    Pools(Window),
    /// Show one lending pool
    Pool { id: u64 },
    /// List loans
    Loans(Window),
    /// List staking plans
    Plans(Window),
    /// List stake positions
    Stakes(Window),
    /// List vesting schedules
    Schedules(Window),
    /// Show the buyback distribution
    Distribution,
    /// Check whether an account holds a role on a contract
    HasRole {
        #[arg(value_enum)]
        contract: Contract,
        /// Role name (ADMIN_ROLE) or 0x-prefixed 32-byte role id
        role: String,
        account: String,
    },
    /// Check the endpoint serves the configured chain
    Chain,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    if let Err(e) = logging::init(&config.observability.log_filter) {
        eprintln!("Warning: logging not initialised: {e}");
    }

    let connector = Arc::new(HttpConnector::from_config(&config.network)?);
    let provider = AssistedProvider::with_connector(connector.clone());

    match cli.command {
        Commands::Pools(w) => {
            let pools = bind::<LendingPool>(&provider, &config)?;
            print_json(&pools.get_pools(w.offset, w.limit).await?)?;
        }
        Commands::Pool { id } => {
            let pools = bind::<LendingPool>(&provider, &config)?;
            print_json(&pools.get_pool(U256::from(id)).await?)?;
        }
        Commands::Loans(w) => {
            let pools = bind::<LendingPool>(&provider, &config)?;
            print_json(&pools.get_loans(w.offset, w.limit).await?)?;
        }
        Commands::Plans(w) => {
            let staking = bind::<Staking>(&provider, &config)?;
            print_json(&staking.get_plans(w.offset, w.limit).await?)?;
        }
        Commands::Stakes(w) => {
            let staking = bind::<Staking>(&provider, &config)?;
            print_json(&staking.get_stakes(w.offset, w.limit).await?)?;
        }
        Commands::Schedules(w) => {
            let vesting = bind::<Vesting>(&provider, &config)?;
            print_json(&vesting.get_schedules(w.offset, w.limit).await?)?;
        }
        Commands::Distribution => {
            let buyback = bind::<Buyback>(&provider, &config)?;
            print_json(&buyback.distribution().await?)?;
        }
        Commands::HasRole { contract, role, account } => {
            let role: Role = role.parse()?;
            let account = format::address("account", &account)?;
            let granted = match contract {
                Contract::LendingPool => {
                    bind::<LendingPool>(&provider, &config)?.has_role(role, account).await?
                }
                Contract::Staking => {
                    bind::<Staking>(&provider, &config)?.has_role(role, account).await?
                }
                Contract::Buyback => {
                    bind::<Buyback>(&provider, &config)?.has_role(role, account).await?
                }
                Contract::Vesting => {
                    bind::<Vesting>(&provider, &config)?.has_role(role, account).await?
                }
            };
            println!("{} {} {}", account, if granted { "holds" } else { "lacks" }, role.name());
        }
        Commands::Chain => {
            let connection = Connection::read_only(connector.connect(None)?);
            connection.verify_chain_id(config.network.chain_id).await?;
            println!("{} serves chain {}", config.network.rpc_url, config.network.chain_id);
        }
    }

    Ok(())
}

fn bind<F: Facade>(
    provider: &AssistedProvider,
    config: &SdkConfig,
) -> Result<F, Box<dyn std::error::Error>> {
    let address = config
        .contracts
        .entries()
        .into_iter()
        .find(|(name, _)| *name == F::NAME)
        .map(|(_, address)| address)
        .ok_or_else(|| format!("no [contracts] {} address configured", F::NAME))?;

    Ok(provider.connect::<F>(address)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
