use std::fs;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lang;
use crate::lsp::backend::Backend;
use crate::Config;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // Load the language definition: user override if present, else embedded
    let language = lang::load_spec(config.language_file.as_deref());

    // Write the embedded definition to the user's config directory for easy access
    if let Err(e) = write_embedded_definition_to_disk() {
        log::warn!("Failed to write embedded language definition to disk: {}", e);
    }

    // If running under the integration test, exit after a short delay so the
    // test can read stdout to EOF.
    if std::env::var("ASPSCRIPT_LS_TEST_EXIT").as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config.clone(), language)).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}

/// Write the embedded definition to `<config dir>/aspscript-ls/` so users can
/// copy it as a starting point for overrides
fn write_embedded_definition_to_disk() -> Result<()> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let definition_dir = config_dir.join("aspscript-ls");
    fs::create_dir_all(&definition_dir)?;

    let definition_path = definition_dir.join("aspscript.lang.toml");

    // Only write if file doesn't exist (don't overwrite user modifications)
    if !definition_path.exists() {
        fs::write(&definition_path, lang::EMBEDDED_DEFINITION)?;
        log::info!("Created language definition file: {:?}", definition_path);
    }

    Ok(())
}
