mod config;
mod device_control;
mod mcp;
mod tools;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*};

use config::{Cli, Command};
use tools::TvTools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON-RPC stream; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(cli.env_filter())
        .init();

    let tools = TvTools::default();

    match cli.command() {
        Command::Serve => {
            info!("Starting {} tool server on stdio", mcp::SERVER_NAME);
            mcp::run_stdio(tools).await?;
        }
        Command::PressKey { tv_ip, key_name } => {
            println!("{}", tools.press_key(&tv_ip, &key_name).await);
        }
        Command::LaunchApp { tv_ip, app_id } => {
            println!("{}", tools.launch_app(&tv_ip, &app_id).await);
        }
        Command::DeviceInfo { tv_ip } => {
            println!("{}", tools.get_device_info(&tv_ip).await);
        }
    }

    Ok(())
}
