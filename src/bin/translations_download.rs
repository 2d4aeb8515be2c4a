// Entrypoint for `translations-download`.
// Fetches every configured locale of every project into
// `sources/<project>/Translations.bundle/<locale>.lproj/`.

use clap::Parser;
use onesky_sync::cli::{exit_code, init_logging, SyncArgs};
use onesky_sync::sync::download_all;
use onesky_sync::ui::{print_summary, TerminalReporter};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "translations-download")]
#[command(about = "Download translations from OneSky")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    args: SyncArgs,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let ctx = cli.args.context()?;
    let report = download_all(&ctx, &mut TerminalReporter::default());
    print_summary(&report);
    Ok(exit_code(&report, cli.args.strict))
}
