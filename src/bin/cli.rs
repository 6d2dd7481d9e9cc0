//! imagewire CLI
//!
//! Push screenshots to, and pull them from, an image server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imagewire::config::{DEFAULT_PORT, DEFAULT_RESPONSE_BUFFER_LEN, DEFAULT_TRAILER};
use imagewire::protocol::canonical_name;
use imagewire::{
    AsyncImageTransport, CancellationToken, HttpConfig, HttpImageTransport, ImageFormat,
    ImageWireError, TcpImageTransport, TransportConfig,
};
use tracing_subscriber::{fmt, EnvFilter};

/// imagewire CLI
#[derive(Parser, Debug)]
#[command(name = "imagewire-cli")]
#[command(about = "Push and pull images to an image-hosting server")]
#[command(version)]
struct Args {
    /// Server host (TCP transport)
    #[arg(short, long, default_value = "127.0.0.1")]
    server: String,

    /// Server port (TCP transport)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Response manager id (TCP transport)
    #[arg(long, default_value_t = 0)]
    manager_id: u8,

    /// Frame trailer bytes, comma separated (TCP transport)
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_TRAILER.to_vec())]
    trailer: Vec<u8>,

    /// Initial receive buffer size in bytes (TCP transport)
    #[arg(long, default_value_t = DEFAULT_RESPONSE_BUFFER_LEN)]
    buffer: usize,

    /// Use the HTTP transport with this base URL instead of TCP
    #[arg(long)]
    http: Option<String>,

    /// Response manager name (HTTP transport)
    #[arg(long, default_value = "")]
    manager_name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a PNG image and print its name
    Push {
        /// Image file to upload
        file: PathBuf,

        /// Send the file even if it does not look like a PNG
        #[arg(long)]
        force: bool,
    },

    /// Download an image by name
    Pull {
        /// Image name (e.g. i123456 or 123456)
        name: String,

        /// Ask for the JPG variant
        #[arg(long)]
        jpg: bool,

        /// Output file (defaults to <name>.png or <name>.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,imagewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Ctrl+C cancels whatever call is in flight
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, cancelling...");
            cancel_on_signal.cancel();
        }
    });

    if let Err(e) = execute(args, &cancel).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Build the selected transport and run the command on it
async fn execute(args: Args, cancel: &CancellationToken) -> imagewire::Result<()> {
    match args.http {
        Some(ref url) => {
            let config = HttpConfig::new(url.as_str()).with_response_manager(args.manager_name.as_str());
            tracing::info!("Using HTTP transport at {}", config.base_url);
            let transport = HttpImageTransport::new(config)?;
            run(&transport, args.command, cancel).await
        }
        None => {
            let config = TransportConfig::builder()
                .server_addr(args.server.as_str())
                .server_port(args.port)
                .response_manager_id(args.manager_id)
                .trailer(args.trailer)
                .response_buffer_len(args.buffer)
                .build();
            tracing::info!("Using TCP transport at {}:{}", config.server_addr, config.server_port);
            let transport = TcpImageTransport::new(config)?;
            run(&transport, args.command, cancel).await
        }
    }
}

async fn run<T: AsyncImageTransport>(
    transport: &T,
    command: Commands,
    cancel: &CancellationToken,
) -> imagewire::Result<()> {
    match command {
        Commands::Push { file, force } => {
            let image = std::fs::read(&file)?;
            if !ImageFormat::sniff(&image).is_png() {
                if !force {
                    return Err(ImageWireError::BadImageFormat(format!(
                        "{} is not a PNG image (use --force to send it anyway)",
                        file.display()
                    )));
                }
                tracing::warn!("{} is not a PNG image, sending anyway", file.display());
            }

            let name = transport.push_async(&image, cancel).await?;
            println!("{}", name);
        }
        Commands::Pull { name, jpg, output } => {
            let image = transport.pull_async(&name, jpg, cancel).await?;
            let extension = if image.is_jpg { "jpg" } else { "png" };
            let path = output
                .unwrap_or_else(|| PathBuf::from(format!("i{}.{}", canonical_name(&name), extension)));

            std::fs::write(&path, &image.data)?;
            tracing::info!("Saved {} bytes to {}", image.len(), path.display());
            println!("{}", path.display());
        }
    }
    Ok(())
}
