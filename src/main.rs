// ============================================
// src/main.rs (entry point)
// ============================================

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use wordquiz::catalog::{Catalog, CatalogError, read_definitions};
use wordquiz::config::Cli;
use wordquiz::game::GameSession;
use wordquiz::platform::HostPlatform;
use wordquiz::save_data::SaveData;
use wordquiz::ui::{App, run_app};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::prelude::*;

const LOG_FILE: &str = "wordquiz.log";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let (catalog, rejected) = load_catalog(&cli)?;
    let warnings: Vec<String> = rejected
        .iter()
        .map(|e| {
            warn!("category skipped: {e}");
            e.to_string()
        })
        .collect();

    let save_path = cli.save_file.clone().unwrap_or_else(SaveData::default_path);
    let save = SaveData::load_from(&save_path);
    info!(
        "loaded {} categories, high score {} from {}",
        catalog.len(),
        save.high_score,
        save_path.display()
    );

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let session = GameSession::new(catalog, cli.settings(), save.high_score, rng)?;
    let mut app = App::new(session, HostPlatform::new(save, save_path), warnings);

    let mut terminal = setup_terminal().context("cannot prepare the terminal")?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal).context("cannot restore the terminal")?;
    result?;
    Ok(())
}

/// Logs go to a file; the terminal belongs to the game.
fn init_logging(cli: &Cli) {
    let path = cli.log_file.clone().unwrap_or_else(|| {
        SaveData::data_dir()
            .map(|dir| dir.join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE))
    });
    let Ok(file) = File::create(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn load_catalog(cli: &Cli) -> Result<(Catalog, Vec<CatalogError>)> {
    let (catalog, rejected) = match &cli.catalog {
        Some(path) => Catalog::load(read_definitions(path)?),
        None => Catalog::builtin(),
    };
    if catalog.is_empty() {
        for e in &rejected {
            warn!("category skipped: {e}");
        }
        return Err(CatalogError::Empty).context("every category was rejected");
    }
    Ok((catalog, rejected))
}

fn setup_terminal() -> io::Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
    terminal.clear()?;
    stdout().execute(Show)?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}
