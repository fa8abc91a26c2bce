use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use clima_ui::models::setting::setting_rows;
use clima_ui::models::Report;
use clima_ui::services::{fetch_city_weather, load_neighborhoods};
use clima_ui::AppServices;

#[derive(Parser)]
#[command(name = "clima", version, about = "Neighborhood weather for a single city")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Write a standalone HTML map with temperature markers and a heat layer
    ExportMap {
        /// Output file
        #[arg(short, long, default_value = "clima-map.html")]
        out: PathBuf,
        /// Only the first N neighborhoods
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print a summary of current temperatures
    Report {
        /// Neighborhoods to query; defaults to the configured limit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the discovered neighborhoods
    Neighborhoods,
    /// Show the configuration file path and effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    // Load configuration (creates defaults on first run); nothing is logged
    // until the subscriber below exists
    let mut app = clima_core::App::new()?;

    // The terminal UI owns stdout, so it logs to a file
    match &command {
        Command::Tui => clima_core::init_with_log_file(&app.config().log_path())?,
        _ => clima_core::init()?,
    }

    if let clima_core::ConfigSource::Created(path) = app.source() {
        tracing::info!("No config at {}, wrote defaults", path.display());
    }

    let warnings: Vec<String> = app
        .warnings()
        .iter()
        .map(|w| format!("{}: {}", w.field, w.message))
        .collect();
    for warning in &warnings {
        tracing::warn!("Config: {}", warning);
    }

    tracing::info!("Clima started for {}", app.config().city.name);

    let result = match command {
        Command::Tui => {
            let services = AppServices::new(app.shared_config())?;
            clima_ui::tui::run(services, warnings)
        }
        Command::ExportMap { out, limit } => {
            export_map(AppServices::new(app.shared_config())?, out, limit)
        }
        Command::Report { limit } => report(AppServices::new(app.shared_config())?, limit),
        Command::Neighborhoods => neighborhoods(AppServices::new(app.shared_config())?),
        Command::Config => show_config(&app, &warnings),
    };

    app.shutdown()?;
    result
}

fn export_map(services: AppServices, out: PathBuf, limit: Option<usize>) -> Result<()> {
    let results = services.block_on(fetch_city_weather(&services, limit, |done, total| {
        eprintln!("{}", clima_ui::models::progress_label(done, total));
    }));

    let html = clima_ui::render_map_html(services.config(), &results)?;
    std::fs::write(&out, html).with_context(|| format!("Failed to write {}", out.display()))?;

    let with_data = results.iter().filter(|r| r.weather.is_some()).count();
    println!(
        "Wrote {} ({} neighborhoods, {} with data)",
        out.display(),
        results.len(),
        with_data
    );
    services.shutdown();
    Ok(())
}

fn report(services: AppServices, limit: Option<usize>) -> Result<()> {
    let config = services.config();
    let limit = limit.unwrap_or(config.city.neighborhood_limit);

    let results = services.block_on(fetch_city_weather(&services, Some(limit), |done, total| {
        eprintln!("{}", clima_ui::models::progress_label(done, total));
    }));

    let report = Report::build(
        &config.city.name,
        &results,
        config.weather.reference_temperature,
    );
    print!("{}", report.to_text());
    services.shutdown();
    Ok(())
}

fn neighborhoods(services: AppServices) -> Result<()> {
    let found = services.block_on(load_neighborhoods(
        &services.overpass(),
        &services.config().city,
    ));

    for n in &found.neighborhoods {
        println!("{:<32} {:>9.4} {:>9.4}", n.name, n.lat, n.lon);
    }
    if found.is_fallback {
        println!("{} neighborhoods (fallback list)", found.neighborhoods.len());
    } else {
        println!("{} neighborhoods", found.neighborhoods.len());
    }
    services.shutdown();
    Ok(())
}

fn show_config(app: &clima_core::App, warnings: &[String]) -> Result<()> {
    let path = clima_core::Config::config_path()?;
    println!("Config file: {}", path.display());
    println!("Log file:    {}", app.config().log_path().display());

    for (section, rows) in setting_rows(app.config()) {
        println!();
        println!("[{}]", section);
        for (label, value) in rows {
            println!("  {:<20} {}", label, value);
        }
    }

    if !warnings.is_empty() {
        println!();
        for warning in warnings {
            println!("warning: {}", warning);
        }
    }
    Ok(())
}
