use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ecp-tv-control")]
#[command(about = "Remote control for ECP smart TVs, served as tools over stdio")]
#[command(version)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (logs go to stderr)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the TV tools over stdin/stdout (default)
    Serve,
    /// Press a single remote key
    PressKey { tv_ip: String, key_name: String },
    /// Launch an app by channel ID
    LaunchApp { tv_ip: String, app_id: String },
    /// Print the device-info XML
    DeviceInfo { tv_ip: String },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    /// RUST_LOG wins; otherwise fall back to `--log-level`
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["ecp-tv-control"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_press_key_args() {
        let cli = Cli::try_parse_from(["ecp-tv-control", "press-key", "192.168.1.100", "home"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::PressKey {
                tv_ip: "192.168.1.100".into(),
                key_name: "home".into()
            }
        );
    }

    #[test]
    fn test_launch_app_with_log_level() {
        let cli = Cli::try_parse_from([
            "ecp-tv-control",
            "launch-app",
            "10.0.0.5",
            "12",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert_eq!(
            cli.command(),
            Command::LaunchApp {
                tv_ip: "10.0.0.5".into(),
                app_id: "12".into()
            }
        );
    }

    #[test]
    fn test_device_info_requires_ip() {
        assert!(Cli::try_parse_from(["ecp-tv-control", "device-info"]).is_err());
    }
}
