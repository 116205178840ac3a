mod commands;
mod terminal;

use commands::{CommandLine, Commands, l10n, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::banner();

    match commands.command {
        Commands::Scan(args) => {
            print::header("starting scan");
            scan::scan(args).await
        }
        Commands::L10n { input_file } => {
            print::header("localization report");
            l10n::l10n(&input_file)
        }
    }
}
