//! `ember status` — Show system status.

use ember_config::AppConfig;
use ember_store::MemoryLog;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let settings = config
        .resolve(None)
        .map_err(|e| format!("Failed to resolve settings: {e}"))?;

    println!("ember status");
    println!("============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Data dir:     {}", settings.data_dir.display());
    println!("  Display name: {}", settings.display_name);
    println!(
        "  Provider:     {}",
        settings.provider.as_deref().unwrap_or("(responder default)")
    );
    println!(
        "  Model:        {}",
        settings.model.as_deref().unwrap_or("(responder default)")
    );
    println!("  Timeout:      {}s", settings.responder_timeout_secs);
    println!(
        "  Search:       {}",
        if settings.search_api_key.is_some() {
            "configured"
        } else {
            "no credential"
        }
    );

    // Per-profile memory counts: the default profile plus every named one
    let mut profiles: Vec<String> = vec!["default".into()];
    profiles.extend(config.profiles.keys().cloned());
    profiles.sort();
    profiles.dedup();

    println!("\n  Memory:");
    for name in &profiles {
        let memory = MemoryLog::new(settings.data_dir.join(name).join("memory.jsonl"));
        let count = memory.load().map(|f| f.len()).unwrap_or(0);
        println!("    {name}: {count} fact(s)");
    }

    let sessions_dir = settings.data_dir.join("sessions");
    let session_count = std::fs::read_dir(&sessions_dir)
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0);
    println!("  Sessions:     {session_count} transcript(s)");

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file — run `ember onboard` first");
    }

    Ok(())
}
