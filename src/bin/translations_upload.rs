// Entrypoint for `translations-upload`.
// Extracts strings from the source tree, asks for confirmation and uploads
// the string table to every configured OneSky project.

use clap::Parser;
use onesky_sync::cli::{exit_code, init_logging, SyncArgs};
use onesky_sync::extract::ShellExtractor;
use onesky_sync::sync::upload_all;
use onesky_sync::ui::{print_summary, TerminalPrompt, TerminalReporter};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "translations-upload")]
#[command(about = "Upload translations to OneSky")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    args: SyncArgs,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let ctx = cli.args.context()?;
    let extractor = ShellExtractor::new(
        ctx.config.extract_command.clone(),
        ctx.config.extract_output.clone(),
    );

    let report = upload_all(
        &ctx,
        &extractor,
        &mut TerminalPrompt,
        &mut TerminalReporter::default(),
    )?;
    print_summary(&report);
    Ok(exit_code(&report, cli.args.strict))
}
