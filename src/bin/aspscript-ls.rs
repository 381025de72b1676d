use anyhow::Result;
use aspscript_language_server::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    serve().await
}
