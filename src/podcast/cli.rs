use chrono::TimeDelta;
use clap::{Args, ValueHint};
use std::path::PathBuf;

use super::clock::{Timestamp, parse_duration};

#[derive(Args, Debug, Clone)]
pub struct AnnotateArgs {
    /// irclog2html transcript to annotate (rewritten in place)
    #[arg(value_name = "HTML_LOG_FILE", value_hint = ValueHint::FilePath)]
    pub log: PathBuf,

    /// Scheduled start of the show (HH:MM)
    #[arg(value_name = "START", value_parser = Timestamp::parse_clock)]
    pub start: Timestamp,

    /// Scheduled length of the show (HH:MM)
    #[arg(value_name = "DURATION", value_parser = parse_duration)]
    pub duration: TimeDelta,

    /// Write the annotated transcript here instead of overwriting the input
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}
