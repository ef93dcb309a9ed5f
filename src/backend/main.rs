/**
 * Branding Backend Entry Point
 *
 * Runs the reference customization backend. Start two instances on
 * different ports to get a primary and a mirror.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tenant_branding::backend::server::{create_app, ServerConfig};

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = ServerConfig::from_env();
    let app = create_app(&config);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting branding backend on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Public base URL {}", config.public_base_url());
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("The backend requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin branding-backend --features ssr");
    std::process::exit(1);
}
