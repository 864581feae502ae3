use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fiche::tui::run().await
}
