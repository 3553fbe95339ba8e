use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const ABOUT: &str = "Evening weather near an address";

const LONG_ABOUT: &str = "
Looks up the nighttime forecast for the next few days near a free-text address.

The address is geocoded through a Nominatim-compatible service and the forecast comes
from a weather.gov-compatible API. Results are cached in memory for 30 minutes unless
configured otherwise.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles = STYLES, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    /// Configuration file (defaults to <config dir>/weather-near/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one lookup and print the evenings
    Lookup {
        /// Free-text address, e.g. "1600 Pennsylvania Ave NW, Washington, DC"
        address: String,

        /// Ignore any cached result
        #[arg(short, long)]
        force: bool,
    },
}
