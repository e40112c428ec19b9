use clap::Parser;
use log::{error, info};
use hw_connect::cli::Cli;
use hw_connect::error::{AppRunError, ConfigError};
use hw_connect::{init_logging, run};

fn main() -> Result<(), AppRunError> {
    init_logging();
    info!(concat!("hw-connect ", env!("CARGO_PKG_VERSION")));

    let cli = Cli::parse();

    match run(cli) {
        Err(AppRunError::ConfigError { source: ConfigError::CanNotLock { .. } }) => {
            error!("Another hw-connect process is already scanning");
            Ok(())
        },
        Err(err) => {
            error!("Unexpected error: {}", err);
            Err(err)
        },
        Ok(_) => Ok(()),
    }
}
