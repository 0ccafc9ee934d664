pub mod api;
pub mod auth;
pub mod calc;
pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod journal;
pub mod models;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use api::{MockStockProvider, Timeframe};
use cli::{ChartAction, Cli, Commands, MarketAction, SettingsAction, TradesAction};
use config::AppConfig;
use journal::TradeDraft;
use models::{RegisterInput, StrategyTaxonomy, UpdateSettingsInput};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes to `output` when given, otherwise prints.
fn emit(content: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn open_database(config: &AppConfig) -> Result<db::Database> {
    fs::create_dir_all(config.data_dir())
        .with_context(|| format!("creating data directory {}", config.data_dir().display()))?;

    let db_path = config.db_path();
    log::info!("Database path: {:?}", db_path);
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("database path {:?} is not valid UTF-8", db_path))?;

    db::Database::new(db_path_str).map_err(|e| {
        log::error!("Database initialization failed: {}", e);
        log::error!("Backups are kept in {:?}", config.backups_dir());
        anyhow!(
            "Database initialization failed: {}. Restore the latest file from {} to recover.",
            e,
            config.backups_dir().display()
        )
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Command-line entry point used by the `finstride` binary.
pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    StrategyTaxonomy::validate().map_err(|e| anyhow!("Invalid strategy taxonomy: {}", e))?;

    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir);

    // Market commands need no database.
    let provider = MockStockProvider::new();
    match cli.command {
        Commands::Market { action } => run_market(&provider, action),
        Commands::Portfolio => print_json(&commands::get_portfolio()),
        command => run_with_database(&config, &provider, command),
    }
}

fn run_market(provider: &MockStockProvider, action: MarketAction) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match action {
            MarketAction::Indices => {
                let indices = commands::get_index_quotes(provider).await.map_err(|e| anyhow!(e))?;
                print_json(&indices)
            }
            MarketAction::Popular => {
                let overview = commands::get_market_overview(provider).await.map_err(|e| anyhow!(e))?;
                print_json(&overview.popular)
            }
            MarketAction::Stock { symbol } => {
                let stock = commands::get_stock_details(provider, &symbol)
                    .await
                    .map_err(|e| anyhow!(e))?;
                print_json(&stock)?;
                print_json(&commands::get_stock_quote(&symbol))
            }
        }
    })
}

fn run_with_database(config: &AppConfig, provider: &MockStockProvider, command: Commands) -> Result<()> {
    let db = open_database(config)?;

    match command {
        Commands::Trades { action } => match action {
            TradesAction::List { filters } => {
                print_json(&commands::get_trades(&db, filters.into_filters()).map_err(|e| anyhow!(e))?)
            }
            TradesAction::Add { trade } => {
                let mut draft = TradeDraft::new(chrono::Local::now().date_naive());
                trade.apply(&mut draft).map_err(|e| anyhow!(e))?;
                let pnl = draft.preview_pnl();
                log::info!("Gross P&L {:.2}, net P&L {:.2}", pnl.gross_pnl, pnl.net_pnl);
                print_json(&commands::create_trade(&db, draft).map_err(|e| anyhow!(e))?)
            }
            TradesAction::Edit { id, trade } => {
                let existing = commands::get_trade(&db, id.clone()).map_err(|e| anyhow!(e))?;
                let mut draft = TradeDraft::from_trade(&existing);
                trade.apply(&mut draft).map_err(|e| anyhow!(e))?;
                print_json(&commands::update_trade(&db, id, draft).map_err(|e| anyhow!(e))?)
            }
            TradesAction::Delete { id } => {
                commands::delete_trade(&db, id.clone()).map_err(|e| anyhow!(e))?;
                println!("Deleted trade {}", id);
                Ok(())
            }
            TradesAction::Import { file } => {
                let json = read_file(&file)?;
                let count = commands::import_trades_json(&db, &json).map_err(|e| anyhow!(e))?;
                println!("Imported {} trades", count);
                Ok(())
            }
            TradesAction::Export { output } => {
                let json = commands::export_trades_json(&db).map_err(|e| anyhow!(e))?;
                emit(&format!("{}\n", json), output)
            }
            TradesAction::ExportCsv { output } => {
                emit(&commands::export_trades_csv(&db).map_err(|e| anyhow!(e))?, output)
            }
        },
        Commands::Stats { filters } => {
            let stats = commands::get_dashboard_stats(&db, filters.into_filters()).map_err(|e| anyhow!(e))?;
            match stats.summary() {
                Some(summary) => println!("{}", summary),
                None => println!("No trades to analyse: all statistics are N/A"),
            }
            Ok(())
        }
        Commands::Analysis { filters } => {
            print_json(&commands::get_analysis(&db, filters.into_filters()).map_err(|e| anyhow!(e))?)
        }
        Commands::Chart { action } => match action {
            ChartAction::Stock {
                symbol,
                timeframe: Some(timeframe),
                output,
            } => {
                let timeframe: Timeframe = timeframe.parse().map_err(|e: String| anyhow!(e))?;
                let svg = commands::render_timeframe_chart(&db, &symbol, timeframe).map_err(|e| anyhow!(e))?;
                emit(&svg, output)
            }
            ChartAction::Stock {
                symbol,
                timeframe: None,
                output,
            } => {
                let runtime = tokio::runtime::Runtime::new()?;
                let svg = runtime
                    .block_on(commands::render_stock_chart(&db, provider, &symbol))
                    .map_err(|e| anyhow!(e))?;
                emit(&svg, output)
            }
            ChartAction::Equity { filters, output } => {
                let svg = commands::render_equity_chart(&db, filters.into_filters()).map_err(|e| anyhow!(e))?;
                emit(&svg, output)
            }
        },
        Commands::Register { email, name, password } => {
            let response = commands::register_user(&db, RegisterInput { email, name, password })
                .map_err(|e| anyhow!(e))?;
            print_json(&response)
        }
        Commands::Login { email, password } => {
            let user = commands::sign_in(&db, &email, &password).map_err(|e| anyhow!(e))?;
            println!("Signed in as {} <{}>", user.name, user.email);
            Ok(())
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => print_json(&commands::get_settings(&db).map_err(|e| anyhow!(e))?),
            SettingsAction::Set {
                currency,
                chart_width,
                chart_height,
                seed_sample_trades,
            } => {
                let input = UpdateSettingsInput {
                    currency,
                    chart_width,
                    chart_height,
                    seed_sample_trades,
                };
                print_json(&commands::update_settings(&db, input).map_err(|e| anyhow!(e))?)
            }
        },
        Commands::Market { .. } | Commands::Portfolio => Ok(()),
    }
}
