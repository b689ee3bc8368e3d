mod ui;
mod state;
mod map_draw;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use state::AppState;
use terramark::config::{self, AppConfig, Projection};
use terramark::logging::init_logging;

#[derive(Parser)]
#[command(name = "terramark", about = "Mapa odwiedzonych krajów w terminalu")]
struct Cli {
    /// Katalog z danymi (granice krajów)
    #[arg(long, default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Plik GeoJSON w katalogu danych
    #[arg(long, default_value = config::DEFAULT_DATASET_FILE)]
    dataset: String,

    /// Katalog ze statusami i celami
    #[arg(long, default_value = config::DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    /// Wspólny katalog z migawkami dla widżetów
    #[arg(long, default_value = config::DEFAULT_WIDGET_DIR)]
    widget_dir: PathBuf,

    /// Katalog z logami
    #[arg(long, default_value = config::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Projekcja mapy: mercator albo equirectangular
    #[arg(long, default_value = "mercator")]
    projection: Projection,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        AppConfig {
            data_dir: cli.data_dir,
            dataset_file: cli.dataset,
            state_dir: cli.state_dir,
            widget_dir: cli.widget_dir,
            log_dir: cli.log_dir,
            projection: cli.projection,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: AppConfig = Cli::parse().into();
    config.validate()?;
    let _log_guard = init_logging(&config.log_dir, config::DEFAULT_LOG_FILE)?;
    tracing::info!(dataset = %config.dataset_path().display(), projection = %config.projection, "start");

    let mut state = AppState::new(&config);
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui::draw(f, &mut state))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                    if state.handle_input(code) {
                        break;
                    }
                }
                Event::Mouse(mouse) => state.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    tracing::info!("koniec");
    Ok(())
}
