//! campus-dashboard - demo admin dashboard.
//!
//! Seeds the demo campus, optionally toggles sensors so the observers fire,
//! and prints the resulting dashboard report as YAML.
//!
//! Run: `RUST_LOG=info cargo run --features cli --bin campus-dashboard -- --toggle 1`

use campus_iot::catalog::SensorCatalog;
use campus_iot::config::Config;
use campus_iot::dashboard::AdminDashboard;
use campus_iot::model::SensorId;
use campus_iot::notify::{
    CalibrationScheduler, MaintenanceAlert, StatusChangeLogger, StatusRegistry,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// campus-dashboard: build the admin dashboard over the demo campus
#[derive(Parser, Debug)]
#[command(name = "campus-dashboard")]
#[command(version)]
#[command(about = "Print the campus IoT admin dashboard as YAML", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the live temperature simulator (overrides config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Toggle these sensor ids before building the report
    #[arg(short, long)]
    toggle: Vec<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        config.simulator.seed = cli.seed;
    }

    let registry = Arc::new(StatusRegistry::new());
    let catalog = Arc::new(SensorCatalog::new(Arc::clone(&registry)));
    catalog.seed_demo()?;

    registry.attach(Arc::new(StatusChangeLogger));
    let alerts = Arc::new(MaintenanceAlert::new(catalog.directory()));
    registry.attach(alerts.clone());
    let scheduler = Arc::new(CalibrationScheduler::new(catalog.directory()));
    registry.attach(scheduler.clone());

    let dashboard = AdminDashboard::new(Arc::clone(&catalog), &config);

    for id in cli.toggle {
        if let Some(report) = catalog.toggle_status(SensorId(id))? {
            if !report.is_clean() {
                log::warn!("{} observer(s) failed for sensor {id}", report.failures.len());
            }
        }
    }

    for notice in alerts.notices() {
        eprintln!("{}", notice.message());
    }
    for request in scheduler.requests() {
        eprintln!("calibration requested for {}", request.sensor_name);
    }

    print!("{}", serde_yaml_ng::to_string(&dashboard.build())?);
    Ok(())
}
