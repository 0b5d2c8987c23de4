use std::{borrow::Cow, fmt, io::IsTerminal, net::SocketAddr, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use logforth::filter::EnvFilter;
use secrecy::SecretString;

#[derive(Debug, Parser)]
#[command(name = "Switchboard", version, long_about = concat!("Switchboard v", env!("CARGO_PKG_VERSION")))]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(long, short, global = true, env = "SWITCHBOARD_CONFIG_PATH", default_value = "./switchboard.toml")]
    pub config: PathBuf,
    /// Set the logging level, this applies to all log events.
    #[arg(long = "log", global = true, env = "SWITCHBOARD_LOG", default_value_t = LogLevel::default())]
    pub log_level: LogLevel,
    /// Set the style of log output
    #[arg(long, global = true, env = "SWITCHBOARD_LOG_STYLE", default_value_t = LogStyle::default())]
    pub log_style: LogStyle,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the chat relay.
    Relay {
        /// IP address on which the relay will listen for incoming connections.
        /// Default: 127.0.0.1:3001
        #[arg(short, long, env = "SWITCHBOARD_RELAY_LISTEN_ADDRESS")]
        listen_address: Option<SocketAddr>,
        /// API key for the completion API, used when the configuration file sets none.
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        openai_api_key: Option<String>,
    },
    /// Run the static file and proxy gateway.
    Gateway {
        /// IP address on which the gateway will listen for incoming connections.
        /// Default: 127.0.0.1:3000
        #[arg(short, long, env = "SWITCHBOARD_GATEWAY_LISTEN_ADDRESS")]
        listen_address: Option<SocketAddr>,
    },
}

impl Command {
    /// Name of the service, as shown in every log line.
    pub fn service_name(&self) -> &'static str {
        match self {
            Command::Relay { .. } => "relay",
            Command::Gateway { .. } => "gateway",
        }
    }
}

impl Args {
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut config = if self.config.exists() {
            Config::load(&self.config)?
        } else {
            Config::default()
        };

        if let Command::Relay {
            openai_api_key: Some(key),
            ..
        } = &self.command
            && config.relay.completion.api_key.is_none()
        {
            config.relay.completion.api_key = Some(SecretString::from(key.clone()));
        }

        Ok(config)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogStyle {
    /// Colorized text, used as the default with TTY output
    Color,
    /// Standard text, used as the default with non-TTY output
    Text,
    /// JSON objects
    Json,
}

impl Default for LogStyle {
    fn default() -> Self {
        if std::io::stdout().is_terminal() {
            LogStyle::Color
        } else {
            LogStyle::Text
        }
    }
}

impl AsRef<str> for LogStyle {
    fn as_ref(&self) -> &str {
        match self {
            LogStyle::Color => "color",
            LogStyle::Text => "text",
            LogStyle::Json => "json",
        }
    }
}

impl fmt::Display for LogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Disable logging
    Off,
    /// Only log errors
    Error,
    /// Log errors, and warnings
    Warn,
    /// Log errors, warnings, and info messages
    #[default]
    Info,
    /// Log errors, warnings, info, and debug messages
    Debug,
    /// Log errors, warnings, info, debug, and trace messages
    Trace,
}

impl LogLevel {
    pub fn env_filter(self) -> EnvFilter {
        let filter_str = match self {
            LogLevel::Off => Cow::Borrowed("off"),
            // Dependencies stay at 'warn', workspace crates use the selected level
            level => Cow::Owned(format!(
                "warn,switchboard={level},server={level},config={level},relay={level},gateway={level}"
            )),
        };

        EnvFilter::from_str(&filter_str).expect("These all are valid env filters.")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
