use args::{Args, Command};
use clap::Parser;
use config::Config;
use server::{ServeConfig, Service};

mod args;
mod logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(&args);

    let config = args.config()?;

    if let Err(e) = server::serve(serve_config(&args, config)).await {
        log::error!("Server failed to start: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn serve_config(args: &Args, config: Config) -> ServeConfig {
    match args.command {
        Command::Relay { listen_address, .. } => ServeConfig {
            service: Service::Relay,
            listen_address: listen_address.unwrap_or(config.relay.listen_address),
            config,
        },
        Command::Gateway { listen_address } => ServeConfig {
            service: Service::Gateway,
            listen_address: listen_address.unwrap_or(config.gateway.listen_address),
            config,
        },
    }
}
