#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use construction_schedule::{EngineConfig, http_api, init_logging};

    init_logging(None);

    let addr: SocketAddr = std::env::var("CONSTRUCTION_SCHEDULE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let config = match std::env::var("CONSTRUCTION_SCHEDULE_CONFIG") {
        Ok(path) => EngineConfig::load(path)?,
        Err(_) => EngineConfig::default(),
    };

    println!("construction-schedule HTTP API listening on http://{addr}");
    http_api::serve(addr, config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
