//! Command Line Interface for the CLMM vault.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clmm_vault_domain::U256;
use clmm_vault_domain::tick_range::centered_range;
use clmm_vault_domain::token::Address;
use clmm_vault_domain::value_objects::Price;
use clmm_vault_execution::config::VaultConfig;
use clmm_vault_execution::vault::{ShareLedger, Vault};
use clmm_vault_simulation::host::{PoolSetup, SimulatedHost};
use clmm_vault_simulation::keeper::{KeeperConfig, KeeperReport, KeeperSimulation, StepAction};
use clmm_vault_simulation::price_path::{GeometricBrownianMotion, PricePathGenerator};
use dotenv::dotenv;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clmm-vault")]
#[command(about = "Single-range concentrated liquidity vault toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the band the vault would hold around a tick
    Band {
        /// Current pool tick
        #[arg(long, allow_hyphen_values = true)]
        tick: i32,

        /// Pool tick spacing
        #[arg(long, default_value_t = 60, env = "VAULT_TICK_SPACING")]
        spacing: i32,

        /// Half width in thousandths of the sqrt price (50 = 5%)
        #[arg(long, default_value_t = 50, env = "VAULT_WIDTH_BPS")]
        width: u32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run a keeper-driven vault over a random price path
    Simulate {
        /// Number of price steps
        #[arg(long, default_value_t = 168)]
        steps: usize,

        /// Annualized volatility of the price path
        #[arg(long, default_value_t = 0.8)]
        volatility: f64,

        /// Annualized drift of the price path
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        drift: f64,

        /// Seed for a reproducible path
        #[arg(long, env = "VAULT_SIM_SEED")]
        seed: Option<u64>,

        /// Liquidity deposited before the run
        #[arg(long, default_value_t = 1_000_000_000_000)]
        deposit: u128,

        /// Pool tick spacing
        #[arg(long, default_value_t = 60, env = "VAULT_TICK_SPACING")]
        spacing: i32,

        /// Pool swap fee in hundredths of a bip
        #[arg(long, default_value_t = 3000)]
        fee_pips: u32,

        /// Seconds between path steps
        #[arg(long, default_value_t = 3600)]
        step_secs: u64,

        /// Overrides the configured band half width
        #[arg(long, env = "VAULT_WIDTH_BPS")]
        width: Option<u32>,

        /// Overrides the configured minimum rebalance interval
        #[arg(long, env = "VAULT_MIN_REBALANCE_INTERVAL")]
        interval: Option<u64>,

        /// Vault configuration file (JSON)
        #[arg(long, env = "VAULT_CONFIG")]
        config: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>, width: Option<u32>, interval: Option<u64>) -> Result<VaultConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            VaultConfig::from_json(&raw)?
        }
        None => VaultConfig::default(),
    };
    if let Some(width) = width {
        config.rebalance_width_bps = width;
    }
    if let Some(interval) = interval {
        config.min_rebalance_interval_secs = interval;
    }
    config.validate()?;
    Ok(config)
}

fn print_report(report: &KeeperReport) {
    println!(
        "{:<5} | {:<16} | {:<8} | {:<18} | {:<6} | {:<10}",
        "Step", "Time", "Tick", "Range", "In", "Action"
    );
    println!("{}", "-".repeat(80));
    for snapshot in &report.snapshots {
        let datetime = chrono::DateTime::from_timestamp(snapshot.timestamp as i64, 0)
            .unwrap_or_default();
        let action = match &snapshot.action {
            StepAction::Idle => "-".to_string(),
            StepAction::Rebalanced { new_range } => format!("moved {new_range}"),
            StepAction::Rejected { kind, .. } => format!("rejected ({kind:?})"),
        };
        println!(
            "{:<5} | {:<16} | {:<8} | {:<18} | {:<6} | {:<10}",
            snapshot.step,
            datetime.format("%Y-%m-%d %H:%M"),
            snapshot.tick,
            snapshot.range.to_string(),
            if snapshot.in_range { "yes" } else { "no" },
            action
        );
    }

    let summary = &report.summary;
    println!("\n📊 Vault Simulation Results");
    println!("════════════════════════════════════");
    println!("Steps:            {}", summary.steps);
    println!("Rebalances:       {}", summary.rebalances);
    println!("Rejected upkeeps: {}", summary.rejected_upkeeps);
    println!(
        "Time in Range:    {:.1}%",
        summary.time_in_range * Decimal::from(100)
    );
    println!("Final range:      {}", summary.final_range);
    println!("Share supply:     {}", summary.total_supply);
    println!("Liquidity:        {}", summary.total_liquidity);
    println!(
        "Protocol accrual: {} / {}",
        summary.protocol_accrual.amount0, summary.protocol_accrual.amount1
    );
    println!("════════════════════════════════════");
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Band {
            tick,
            spacing,
            width,
            json,
        } => {
            let range = centered_range(*tick, *spacing, *width)?;
            let lower_price = Price::from_tick(range.lower)?;
            let upper_price = Price::from_tick(range.upper)?;

            if *json {
                let out = serde_json::json!({
                    "tick": tick,
                    "range": range,
                    "lower_price": lower_price.value,
                    "upper_price": upper_price.value,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Band around tick {tick} (spacing {spacing}, width {width}):");
                println!("  ticks:  {range}");
                println!("  prices: {lower_price} .. {upper_price}");
            }
        }
        Commands::Simulate {
            steps,
            volatility,
            drift,
            seed,
            deposit,
            spacing,
            fee_pips,
            step_secs,
            width,
            interval,
            config,
            json,
        } => {
            if *deposit == 0 {
                bail!("deposit must be non-zero");
            }
            let vault_config = load_config(config.as_ref(), *width, *interval)?;

            let mut host = SimulatedHost::new(
                PoolSetup::default()
                    .with_tick_spacing(*spacing)
                    .with_fee_pips(*fee_pips),
            )?;
            let lp = Address::new("lp");
            let budget = U256::from(u128::MAX);
            host.fund(&Address::new("token0"), &lp, budget);
            host.fund(&Address::new("token1"), &lp, budget);

            let mut vault = Vault::new(Address::new("vault"), vault_config, host)?;
            let shares = vault.deposit(&lp, *deposit, &lp)?;
            info!(shares = %shares, range = %vault.position_range(), "Seed deposit");

            let mut generator =
                GeometricBrownianMotion::new(Decimal::ONE, *drift, *volatility, 1.0 / 8760.0);
            if let Some(seed) = seed {
                generator = generator.with_seed(*seed);
            }
            let path = generator.generate(*steps)?;

            let mut keeper = KeeperSimulation::new(
                vault,
                KeeperConfig {
                    step_secs: *step_secs,
                    ..KeeperConfig::default()
                },
            );
            if !*json {
                println!("🚀 Running keeper over {} steps...", steps);
            }
            let report = keeper.run(&path)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}
