// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::Parser;
use pokedex_favorites::{init_logging, Config};
#[cfg(feature = "tui")]
use pokedex_favorites::{App, CatalogClient, FavoritesStore};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(Some(&config.data_dir().join("pokedex.log")))?;

    info!(version = pokedex_favorites::VERSION, "starting pokedex-favorites");
    run_ui_mode(config)
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: Config) -> Result<()> {
    // The UI loop is synchronous; the runtime only drives catalog fetches
    let runtime = tokio::runtime::Runtime::new()?;

    let store = FavoritesStore::open(&config.resolved_db_path())?;
    let client = CatalogClient::new(&config.api_url, config.limit)?;

    println!("Fetching catalog from {} ...", client.index_url());

    // A failed fetch is logged and the UI starts empty
    let mut app = App::new(store);
    app.apply_fetch(runtime.block_on(client.fetch_catalog()));

    let mut screen = ui::Screen::new(app);
    ui::run_ui(&mut screen, &runtime, &client)?;

    info!("UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: Config) -> Result<()> {
    eprintln!("TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin pokedex-server --features server");
    std::process::exit(1);
}
