mod bootstrap;
mod export;
mod summary;

use std::time::Duration;

use anyhow::Result;
use geotheater_core::settings::Settings;
use geotheater_runtime::orchestrator::DashboardOrchestrator;
use geotheater_runtime::session::DashboardSession;
use geotheater_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();
    settings.validate()?;

    bootstrap::ensure_directories()?;

    // The dashboard owns the terminal, so its logs always go to a file.
    let log_file = match settings.view.as_str() {
        "dashboard" => Some(
            settings
                .log_file
                .clone()
                .unwrap_or_else(bootstrap::default_log_file),
        ),
        _ => settings.log_file.clone(),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Geotheater dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Delimiter: {}",
        settings.view,
        settings.theme,
        settings.delimiter
    );

    let source = bootstrap::build_source(&settings)?;
    let options = bootstrap::parse_options(&settings)?;
    let insights = bootstrap::build_insights(&settings)?;
    if !insights.is_configured() {
        tracing::info!("No insight endpoint configured; insights use the fallback report");
    }
    let mut session = DashboardSession::new(source, options);

    match settings.view.as_str() {
        "dashboard" => {
            let source_description = session.source_description();
            let orchestrator = DashboardOrchestrator::new(session, insights);
            let (cmd_tx, rx, handle) = orchestrator.start();

            let app = App::new(&settings.theme, source_description);

            // The loop exits on 'q' / Ctrl+C inside the TUI. Also listen for
            // Ctrl+C at the OS level for signals received outside raw mode.
            tokio::select! {
                result = app.run(rx, cmd_tx) => {
                    // The TUI has dropped its channel ends, so the loop winds down.
                    handle.shutdown(Duration::from_secs(1)).await;
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down dashboard task");
                    handle.abort();
                }
            }
        }

        "summary" => {
            let snapshot = session.reload().await;
            print!("{}", summary::summary_text(&snapshot, &insights).await);
        }

        "export" => {
            let snapshot = session.reload().await;
            // validate() guarantees --output for this view.
            if let Some(ref path) = settings.output {
                export::write_export(&snapshot, path)?;
                if let Some(ref warning) = snapshot.warning {
                    eprintln!("! {warning}");
                }
                println!("Exported statistics to {}", path.display());
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
