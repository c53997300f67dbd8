use anyhow::{Context, Result};
use std::fs;

use crate::common::config::DocumentedConfig;
use crate::ui::prelude::{Level, emit};

use super::cli::AnnotateArgs;
use super::config::PodcastConfig;
use super::irclog::IrcLog;
use super::pipeline::{AnnotationPlan, Annotator, RowAction};
use super::segment::ShowWindow;

pub fn handle_annotate(args: AnnotateArgs) -> Result<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => PodcastConfig::config_path()?,
    };
    // A dry run must not leave a fresh config file behind.
    let config = if args.dry_run {
        PodcastConfig::read_from_path(&config_path)?
    } else {
        PodcastConfig::load_from_path(&config_path)?
    };

    let window = ShowWindow::new(args.start, args.duration);
    emit(
        Level::Info,
        "annotate.start",
        &format!(
            "Annotating {} for a show from {} to {}",
            args.log.display(),
            window.start,
            window.end
        ),
        None,
    );

    let source = fs::read_to_string(&args.log)
        .with_context(|| format!("reading transcript {}", args.log.display()))?;
    let log = IrcLog::parse(source, &config.table_class, &config.timestamp_class)
        .with_context(|| format!("parsing transcript {}", args.log.display()))?;
    emit(
        Level::Debug,
        "annotate.parsed",
        &format!(
            "Found {} rows, {} waiting for a timestamp",
            log.rows().len(),
            log.pending_rows()
        ),
        None,
    );
    log.ensure_unprocessed()?;

    let kinds = log.row_kinds()?;
    let plan = Annotator::new(window).plan(kinds)?;
    report_rows(&plan, &config);

    let rendered = log.apply(&plan.actions, &config.marker_style())?;
    let summary = &plan.summary;
    let data = serde_json::to_value(summary).ok();

    if summary.annotated == 0 {
        emit(
            Level::Warn,
            "annotate.empty",
            &format!(
                "No rows fall within an hour of the show from {} to {}; check the start time",
                window.start, window.end
            ),
            None,
        );
    }

    if summary.rollovers > 0 {
        emit(
            Level::Info,
            "annotate.rollover",
            &format!("Transcript runs past midnight ({} rollover(s))", summary.rollovers),
            None,
        );
    }

    if args.dry_run {
        emit(
            Level::Info,
            "annotate.dry_run",
            &format!(
                "Dry run: would annotate {} rows and remove {} ({} preshow, {} postshow)",
                summary.annotated,
                summary.discarded(),
                summary.discarded_preshow,
                summary.discarded_postshow
            ),
            data,
        );
        return Ok(());
    }

    let target = args.out_file.as_ref().unwrap_or(&args.log);
    fs::write(target, rendered)
        .with_context(|| format!("writing annotated transcript to {}", target.display()))?;

    emit(
        Level::Success,
        "annotate.written",
        &format!(
            "Annotated {} rows, removed {} ({} preshow, {} postshow) -> {}",
            summary.annotated,
            summary.discarded(),
            summary.discarded_preshow,
            summary.discarded_postshow,
            target.display()
        ),
        data,
    );

    Ok(())
}

fn report_rows(plan: &AnnotationPlan, config: &PodcastConfig) {
    let style = config.marker_style();
    for (action, timestamp) in plan.actions.iter().zip(&plan.timestamps) {
        let Some(timestamp) = timestamp else {
            continue;
        };
        let day = match timestamp.day() {
            0 => String::new(),
            n => format!(" (+{n}d)"),
        };
        let message = match action {
            RowAction::Annotate(stamp) => {
                format!("{timestamp}{day} -> '{}'", style.render(stamp))
            }
            RowAction::Remove => {
                format!("{timestamp}{day} -> outside retention window, removed")
            }
            _ => continue,
        };
        emit(Level::Debug, "annotate.row", &message, None);
    }
}
