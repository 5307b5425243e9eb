#[tokio::main]
async fn main() {
    if let Err(e) = ecohealth_lib::run().await {
        tracing::error!("Startup failed: {e}");
        eprintln!("ecohealth: {e}");
        std::process::exit(1);
    }
}
