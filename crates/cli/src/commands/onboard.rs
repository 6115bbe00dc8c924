//! `ember onboard` — First-time setup.

use ember_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");
    let data_dir = AppConfig::default().data_dir();

    println!("ember — first-time setup");
    println!("========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        println!("  Created data directory:   {}", data_dir.display());
    }

    if config_path.exists() {
        println!("\n  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("  Created config.toml at:   {}", config_path.display());
        println!("\n  Next steps:");
        println!("  1. Install the goose CLI (the reasoning responder)");
        println!("  2. Optionally set BRAVE_API_KEY to enable web search");
        println!("  3. Run: ember chat\n");
    }

    Ok(())
}
