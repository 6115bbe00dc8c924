//! `ember chat` — Interactive conversation mode.

use std::sync::Arc;

use ember_config::AppConfig;
use ember_responder::ProcessResponder;
use ember_search::BraveSearch;
use ember_session::SessionRunner;
use ember_store::{MemoryLog, TranscriptLog};

pub async fn run(profile: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let settings = config
        .resolve(profile)
        .map_err(|e| format!("Failed to resolve settings: {e}"))?;

    let transcript_log = TranscriptLog::new(settings.data_dir.join("sessions"));
    let session = transcript_log.create_session();

    let memory = MemoryLog::new(
        settings
            .data_dir
            .join(&settings.profile)
            .join("memory.jsonl"),
    );

    let responder = Arc::new(ProcessResponder::new(
        settings.responder_executable.clone(),
    ));
    let search = Arc::new(BraveSearch::new(settings.search_api_key.clone()));

    println!();
    println!("  {} — interactive mode", settings.display_name);
    println!();
    println!("  Profile:    {}", settings.profile);
    println!(
        "  Provider:   {}",
        settings.provider.as_deref().unwrap_or("(responder default)")
    );
    println!(
        "  Model:      {}",
        settings.model.as_deref().unwrap_or("(responder default)")
    );
    println!("  Transcript: {}", session.path().display());
    println!(
        "  Search:     {}",
        if settings.search_api_key.is_some() {
            "configured"
        } else {
            "no credential"
        }
    );
    println!();
    println!("  Commands: remember <fact>, search <query>, exit");
    println!();

    let runner = SessionRunner::new(settings, session, memory, responder, search);
    runner.run().await;

    Ok(())
}
