use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use solana_program::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

use launchpad_cli::{create_example_config, open, persist, LaunchpadConfig, LocalFactory};
use launchpad_core::{check_config, FeatureFlags, TemplateId, TemplateKind, TokenConfig};

#[derive(Parser, Debug)]
#[command(name = "launchpad")]
#[command(about = "Token launchpad factory operator")]
struct Args {
    /// Path to launchpad configuration file
    #[arg(short, long, global = true, default_value = "launchpad.toml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct FeatureArgs {
    #[arg(long)]
    mintable: bool,

    #[arg(long)]
    burnable: bool,

    #[arg(long)]
    pausable: bool,
}

#[derive(ClapArgs, Debug, Clone)]
struct TokenArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    symbol: String,

    /// Initial supply in base units, minted to the owner
    #[arg(long)]
    supply: u64,

    #[arg(long, default_value_t = 9)]
    decimals: u8,

    /// Receives the initial supply and token ownership
    #[arg(long)]
    owner: Pubkey,

    #[command(flatten)]
    features: FeatureArgs,

    /// Enables the supply cap
    #[arg(long)]
    max_supply: Option<u64>,
}

impl TokenArgs {
    fn to_config(&self) -> TokenConfig {
        let features = FeatureFlags {
            mintable: self.features.mintable,
            burnable: self.features.burnable,
            pausable: self.features.pausable,
            capped: false,
        };
        let config = TokenConfig::new(
            self.name.clone(),
            self.symbol.clone(),
            self.supply,
            self.decimals,
            self.owner,
        )
        .with_features(features);
        match self.max_supply {
            Some(max_supply) => config.capped(max_supply),
            None => config,
        }
    }
}

#[derive(ClapArgs, Debug, Clone, Copy)]
struct CallerArgs {
    /// Identity submitting the call (defaults to the configured owner)
    #[arg(long)]
    caller: Option<Pubkey>,
}

impl CallerArgs {
    fn resolve(&self, config: &LaunchpadConfig) -> Pubkey {
        self.caller.unwrap_or(config.owner)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an example configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check a token configuration without deploying it
    Validate(TokenArgs),
    /// Estimate compute units and service fee for a feature set
    Estimate {
        #[command(flatten)]
        features: FeatureArgs,

        #[arg(long)]
        capped: bool,
    },
    /// Address a deployment would receive if submitted next
    Predict {
        #[arg(long)]
        creator: Pubkey,

        #[command(flatten)]
        token: TokenArgs,
    },
    /// Deploy a token instance
    CreateToken {
        #[arg(long)]
        creator: Pubkey,

        /// Lamports paid (defaults to the current service fee)
        #[arg(long)]
        paid: Option<u64>,

        #[command(flatten)]
        token: TokenArgs,
    },
    /// Deploy a template program and register it under `id`
    AddTemplate {
        #[command(flatten)]
        caller: CallerArgs,

        #[arg(long)]
        id: TemplateId,

        #[arg(long)]
        kind: TemplateKind,
    },
    RemoveTemplate {
        #[command(flatten)]
        caller: CallerArgs,

        #[arg(long)]
        id: TemplateId,
    },
    /// List registered templates
    Templates,
    SetFee {
        #[command(flatten)]
        caller: CallerArgs,

        /// New service fee in lamports
        #[arg(long)]
        fee: u64,
    },
    SetFeeRecipient {
        #[command(flatten)]
        caller: CallerArgs,

        #[arg(long)]
        recipient: Pubkey,
    },
    Pause {
        #[command(flatten)]
        caller: CallerArgs,
    },
    Unpause {
        #[command(flatten)]
        caller: CallerArgs,
    },
    /// Send the factory balance to the fee recipient
    Withdraw {
        #[command(flatten)]
        caller: CallerArgs,
    },
    TransferOwnership {
        #[command(flatten)]
        caller: CallerArgs,

        #[arg(long)]
        new_owner: Pubkey,
    },
    /// Point the factory at new logic, keeping all state
    Upgrade {
        #[command(flatten)]
        caller: CallerArgs,

        #[arg(long)]
        logic: Pubkey,
    },
    /// Credit lamports to an address on the local ledger
    Airdrop {
        #[arg(long)]
        address: Pubkey,

        #[arg(long)]
        lamports: u64,
    },
    /// Factory counters and settings
    Stats,
    /// Tokens deployed by a creator
    Tokens {
        #[arg(long)]
        creator: Pubkey,
    },
    /// Event log recorded on the local ledger
    Events,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    match &args.command {
        Command::InitConfig { force } => {
            if args.config.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    args.config.display()
                );
            }
            create_example_config(&args.config)?;
            log::info!("Wrote example configuration to {}", args.config.display());
            return Ok(());
        }
        Command::Validate(token) => {
            let (valid, reason) = check_config(&token.to_config());
            if !valid {
                bail!("Invalid token configuration: {}", reason);
            }
            log::info!("Configuration for {} is valid", token.symbol);
            return Ok(());
        }
        _ => {}
    }

    let config = LaunchpadConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let state_path = config.resolve_state_path(&args.config);
    log::debug!("Cluster {}, state at {}", config.cluster, state_path.display());

    let mut factory = open(&config, &state_path)?;
    let mutated = execute(&mut factory, &config, args.command)?;

    if mutated {
        persist(factory, &state_path)
            .with_context(|| format!("Failed to persist {}", state_path.display()))?;
    }
    Ok(())
}

/// Run one command; returns whether state changed
fn execute(factory: &mut LocalFactory, config: &LaunchpadConfig, command: Command) -> Result<bool> {
    let mutated = match command {
        Command::InitConfig { .. } | Command::Validate(_) => false,
        Command::Estimate { features, capped } => {
            let flags = FeatureFlags {
                mintable: features.mintable,
                burnable: features.burnable,
                pausable: features.pausable,
                capped,
            };
            let estimate = factory.estimate_deployment_cost(&flags);
            print_json(&json!({
                "features": flags.enabled(),
                "compute_units": estimate.compute_units,
                "service_fee": estimate.service_fee,
                "service_fee_sol": estimate.service_fee as f64 / LAMPORTS_PER_SOL as f64,
            }))?;
            false
        }
        Command::Predict { creator, token } => {
            let address = factory.predict_instance_address(&creator, &token.to_config())?;
            println!("{}", address);
            false
        }
        Command::CreateToken {
            creator,
            paid,
            token,
        } => {
            let paid = paid.unwrap_or_else(|| factory.service_fee());
            let instance = factory.create_token(creator, &token.to_config(), paid)?;
            println!("{}", instance);
            true
        }
        Command::AddTemplate { caller, id, kind } => {
            let implementation = factory.ledger_mut().deploy_template(kind);
            factory.add_template(caller.resolve(config), id, implementation)?;
            println!("{} -> {}", id, implementation);
            true
        }
        Command::RemoveTemplate { caller, id } => {
            factory.remove_template(caller.resolve(config), id)?;
            true
        }
        Command::Templates => {
            let templates: Vec<_> = factory
                .get_all_templates()
                .into_iter()
                .map(|id| {
                    json!({
                        "id": id.to_string(),
                        "implementation": factory.get_template(&id).map(|key| key.to_string()),
                    })
                })
                .collect();
            print_json(&json!(templates))?;
            false
        }
        Command::SetFee { caller, fee } => {
            factory.set_service_fee(caller.resolve(config), fee)?;
            true
        }
        Command::SetFeeRecipient { caller, recipient } => {
            factory.set_fee_recipient(caller.resolve(config), recipient)?;
            true
        }
        Command::Pause { caller } => {
            factory.pause(caller.resolve(config))?;
            true
        }
        Command::Unpause { caller } => {
            factory.unpause(caller.resolve(config))?;
            true
        }
        Command::Withdraw { caller } => {
            let amount = factory.withdraw(caller.resolve(config))?;
            println!("{}", amount);
            amount > 0
        }
        Command::TransferOwnership { caller, new_owner } => {
            factory.transfer_ownership(caller.resolve(config), new_owner)?;
            true
        }
        Command::Upgrade { caller, logic } => {
            let version = factory.upgrade_to(caller.resolve(config), logic)?;
            println!("version {}", version);
            true
        }
        Command::Airdrop { address, lamports } => {
            factory.ledger_mut().airdrop(&address, lamports);
            true
        }
        Command::Stats => {
            print_json(&json!({
                "factory": factory.address().to_string(),
                "owner": factory.owner().to_string(),
                "paused": factory.is_paused(),
                "version": factory.version(),
                "logic": factory.logic().to_string(),
                "service_fee": factory.service_fee(),
                "fee_recipient": factory.fee_recipient().to_string(),
                "balance": factory.balance(),
                "total_fees_collected": factory.total_fees_collected(),
                "total_tokens_created": factory.total_tokens_created(),
                "templates": factory.get_all_templates().len(),
                "nonce": factory.nonce(),
            }))?;
            false
        }
        Command::Tokens { creator } => {
            let tokens: Vec<String> = factory
                .tokens_by_creator(&creator)
                .iter()
                .map(ToString::to_string)
                .collect();
            print_json(&json!({
                "creator": creator.to_string(),
                "count": factory.tokens_created_by(&creator),
                "tokens": tokens,
            }))?;
            false
        }
        Command::Events => {
            println!("{}", serde_json::to_string_pretty(factory.events())?);
            false
        }
    };
    Ok(mutated)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
