/// Bunview Terminal - interactive bunny in the terminal
///
/// Usage: bunview-terminal [--config <file.toml>] [model.stl]
///
/// Controls:
///   - Hover the bunny to grab it, drag to move it around the floor
///   - Drag the background to orbit, scroll to zoom
///   - Q/ESC: Quit
use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use bunview_core::assets::{AssetProvider, BuiltinAssetProvider, FileAssetProvider};
use bunview_terminal::settings::{self, Args};
use bunview_terminal::TerminalApp;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = settings::load_config(args.config.as_deref())?;

    println!("Bunview Terminal - Loading...");

    let files = FileAssetProvider::new(&config.assets.base_dir);
    let model = match &args.model {
        Some(path) => FileAssetProvider::new(".").load(&path.to_string_lossy()),
        None if files.resolve(&config.assets.model).is_file() => files.load(&config.assets.model),
        None => BuiltinAssetProvider.load(&config.assets.model),
    };
    if let Ok(model) = &model {
        println!("Loaded '{}' ({} triangles)", model.name, model.triangle_count());
    }

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(config, model)?;
    app.run()?;

    println!("Thank you for using Bunview!");
    Ok(())
}
