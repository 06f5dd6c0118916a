use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use rust_realtime_chat::config;
use rust_realtime_chat::network::ChatClient;
use rust_realtime_chat::ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "rust_realtime_chat",
    version,
    about = "Realtime chat desktop client"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Override the configured username for this session
    #[arg(long)]
    username: Option<String>,
    /// Override the configured server URL for this session
    #[arg(long, value_name = "URL")]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(username) = cli.username {
        app_config.username = username;
    }
    if let Some(server_url) = cli.server_url {
        app_config.server_url = server_url;
    }

    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy Network Thread (Chạy ngầm)
    let network_config = app_config.clone();
    tokio::spawn(async move {
        let client = ChatClient::new(network_config, event_tx, cmd_rx);
        if let Err(err) = client.run().await {
            log::error!("Network client terminated: {err}");
        }
    });

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);

    eframe::run_native(
        "Rust Realtime Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!(
                "Client started as @{} against {}",
                app_config.username,
                app_config.server_url
            );

            Ok(Box::new(ChatApp::new(
                cc,
                app_config.clone(),
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}
