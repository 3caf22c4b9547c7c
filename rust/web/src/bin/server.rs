//! Standalone web server binary
//!
//! Usage: cargo run -p bjtrain_web --bin bjtrain-web-server

use bjtrain_web::{ServerConfig, WebServer};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bjtrain_web::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut host = "127.0.0.1".to_string();
    let mut port = 8080u16;
    let mut static_dir: Option<PathBuf> = None;
    let mut data_dir: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--static-dir" | "-d" => {
                if i + 1 < args.len() {
                    static_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --static-dir requires a value");
                    std::process::exit(1);
                }
            }
            "--data-dir" => {
                if i + 1 < args.len() {
                    data_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --data-dir requires a value");
                    std::process::exit(1);
                }
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

    let static_path = if let Some(dir) = static_dir {
        dir
    } else {
        let current_dir = std::env::current_dir()?;
        let candidates = vec![
            current_dir.join("rust").join("web").join("static"),
            current_dir.join("static"),
            PathBuf::from("static"),
        ];

        candidates
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(|| {
                eprintln!("Error: Could not find static directory.");
                eprintln!("Tried:");
                eprintln!("  - rust/web/static");
                eprintln!("  - static");
                eprintln!("Please specify with --static-dir");
                std::process::exit(1);
            })
    };

    let data_path = if let Some(dir) = data_dir {
        dir
    } else {
        let current_dir = std::env::current_dir()?;
        let candidates = vec![current_dir.join("data"), PathBuf::from("data")];

        candidates
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or_else(|| {
                eprintln!("Error: Could not find strategy data directory.");
                eprintln!("Tried:");
                eprintln!("  - data");
                eprintln!("Please specify with --data-dir");
                std::process::exit(1);
            })
    };

    let config = ServerConfig::new(host.clone(), port, static_path, data_path);

    tracing::info!("Starting blackjack trainer web server");
    tracing::info!("  Host: {}", config.host());
    tracing::info!("  Port: {}", config.port());
    tracing::info!("  Static: {}", config.static_dir().display());
    tracing::info!("  Data: {}", config.data_dir().display());

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    tracing::info!("Server running at http://{}", handle.address());
    println!("\nServer running at http://{}", handle.address());
    println!("Press Ctrl+C to stop\n");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down server");
    handle.shutdown().await?;
    tracing::info!("Server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Blackjack Trainer Web Server");
    println!();
    println!("Usage: bjtrain-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>           Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>           Port to bind to (default: 8080)");
    println!("  --static-dir, -d <DIR>      Static files directory");
    println!("  --data-dir <DIR>            Strategy chart data directory");
    println!("  --help                      Show this help message");
}
