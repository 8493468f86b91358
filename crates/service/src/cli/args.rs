pub use clap::Parser;

use url::Url;

#[derive(Parser, Debug)]
#[command(name = "cimd")]
#[command(about = "Client ID Metadata Documents registry")]
pub struct Args {
    /// Remote registry instance to talk to
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    #[command(subcommand)]
    pub command: crate::Command,
}
