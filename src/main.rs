mod common;
mod podcast;
mod ui;

use clap::Parser;

use crate::podcast::AnnotateArgs;
use crate::ui::prelude::{Level, OutputFormat, emit};

/// Annotate irclog2html chat transcripts with podcast playback timestamps
#[derive(Parser, Debug)]
#[command(name = "podstamp", author, version, about, long_about = None)]
struct Cli {
    /// Show the decision taken for every row
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format for progress and summary messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(flatten)]
    annotate: AnnotateArgs,
}

fn main() {
    let cli = Cli::parse();

    ui::init(cli.output, !cli.no_color);
    ui::set_debug_mode(cli.debug);

    if let Err(err) = podcast::handle_annotate(cli.annotate) {
        emit(
            Level::Error,
            "podstamp.error",
            &format!("Error: {err:#}"),
            None,
        );
        std::process::exit(1);
    }
}
