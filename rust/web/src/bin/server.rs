//! Standalone web server binary
//!
//! Usage: cargo run -p liar_web --bin liar-web-server -- --port 8080

use liar_web::{ServerConfig, WebServer};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let mut host = "127.0.0.1".to_string();
    let mut port = 8080u16;
    let mut ttl_minutes: Option<u64> = None;
    let mut json_logs = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(1);
                };
                host = value.clone();
                i += 2;
            }
            "--port" | "-p" => {
                let Some(Ok(value)) = args.get(i + 1).map(|v| v.parse::<u16>()) else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                };
                port = value;
                i += 2;
            }
            "--session-ttl" => {
                let Some(Ok(value)) = args.get(i + 1).map(|v| v.parse::<u64>()) else {
                    eprintln!("Error: --session-ttl requires a number of minutes");
                    std::process::exit(1);
                };
                ttl_minutes = Some(value);
                i += 2;
            }
            "--json-logs" => {
                json_logs = true;
                i += 1;
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    liar_web::init_logging(json_logs)?;

    let mut config = ServerConfig::new(host, port);
    if let Some(minutes) = ttl_minutes {
        config = config.with_session_ttl(Duration::from_secs(minutes * 60));
    }

    tracing::info!(host = config.host(), port = config.port(), "starting liar web server");

    let handle = WebServer::new(config).start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    Ok(())
}

fn print_help() {
    println!("Liar Web Server");
    println!();
    println!("Usage: liar-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>         Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>         Port to bind to (default: 8080)");
    println!("  --session-ttl <MINUTES>   Idle minutes before a session expires (default: 30)");
    println!("  --json-logs               Log one JSON object per line");
    println!("  --help                    Show this help message");
}
