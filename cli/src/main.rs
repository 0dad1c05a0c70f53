mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover};
use terminal::{print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    spinner::init_logging(commands.verbose);

    match commands.command {
        Commands::Discover(args) => {
            print::header("getting ready for discovery", commands.quiet);
            discover::discover(args, commands.quiet).await
        }
    }
}
