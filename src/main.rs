use color_eyre::eyre::{Result, WrapErr};
use relaynet::{RelayClient, RelayServer, ServerConfig};
use tokio::io::AsyncBufReadExt;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("relaynet=info")
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let mode = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "server".to_string());

    match mode.as_str() {
        "server" => {
            let port = args
                .get(2)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            let max_sessions = args
                .get(3)
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX);
            let wait_for_all = args.iter().any(|a| a == "--wait-for-all");

            let config = ServerConfig {
                bind_addr: format!("0.0.0.0:{port}").parse().unwrap(),
                max_sessions,
                wait_for_all,
                buffer_size: 2048,
            };

            info!(address = %config.bind_addr, wait_for_all, "Starting UDP relay server");

            let server = RelayServer::bind(config)
                .await
                .wrap_err("Failed to bind relay server")?;
            server.on_connect(|addr| info!(%addr, "Client connected"));
            server.on_disconnect(|addr| info!(%addr, "Client disconnected"));
            server.run().await.wrap_err("Failed to run relay server")?;
        }
        "client" => {
            let host = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| "127.0.0.1".to_string());
            let port = args
                .get(3)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);

            let mut client = RelayClient::connect(&host, port)
                .await
                .wrap_err("Failed to connect to relay server")?;
            client.on_receive(|mut packet| {
                if let Some(text) = packet.try_read_string() {
                    println!("{text}");
                }
            });

            info!(server = %client.server_addr(), "Connected, relaying stdin lines");

            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                client.write_string(&line);
                client.send().await.wrap_err("Failed to send packet")?;
                client.clear_buffer();
            }

            client.disconnect();
        }
        _ => {
            eprintln!("Usage: {} [server|client] ...", args[0]);
            eprintln!("  server [port] [max_sessions] [--wait-for-all]");
            eprintln!("  client [host] [port]");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {} server 8080 4               # Relay for up to 4 clients", args[0]);
            eprintln!("  {} server 8080 4 --wait-for-all # Hold relay until 4 registered", args[0]);
            eprintln!("  {} client 127.0.0.1 8080        # Send stdin lines as packets", args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}
