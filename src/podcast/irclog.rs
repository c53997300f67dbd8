//! irclog2html transcript documents.
//!
//! The document is kept as text. Rows of the transcript table are located by
//! byte span and edits are spliced back in, so everything outside the touched
//! rows is written out exactly as it was read.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use thiserror::Error;

use super::clock::{ClockError, Timestamp};
use super::config::MarkerStyle;
use super::pipeline::{RowAction, RowKind};

/// Class of the leading cell irclog2html uses for joins, quits and log banners.
pub const SERVER_MESSAGE_CLASS: &str = "servermsg";

static TABLE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table\b([^>]*)>").expect("valid table regex"));
static TABLE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</table\s*>").expect("valid table close regex"));
static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<tr\b([^>]*)>(.*?)</tr\s*>").expect("valid row regex")
});
static LEADING_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\A\s*(<(td|th)\b([^>]*)>.*?</(?:td|th)\s*>)").expect("valid cell regex")
});
static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid id regex")
});
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid class regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrcLogError {
    #[error("No <table class=\"{class}\"> found in document")]
    MissingTable { class: String },

    #[error("Transcript table is not closed")]
    UnclosedTable,

    #[error("No unannotated transcript rows found; a log file can only be annotated once")]
    NoPendingRows,

    #[error("Document already contains {annotated} annotated rows")]
    AlreadyAnnotated { annotated: usize },

    #[error("Got {actions} row actions for {rows} rows")]
    PlanMismatch { rows: usize, actions: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingCell {
    pub span: Range<usize>,
    pub class: Option<String>,
}

/// One `<tr>` of the transcript table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// The whole element, `<tr ...>` through `</tr>`.
    pub span: Range<usize>,
    /// Position right after the opening tag.
    pub content_start: usize,
    pub id: Option<String>,
    pub leading_cell: Option<LeadingCell>,
}

impl LogRow {
    fn leading_class(&self) -> Option<&str> {
        self.leading_cell.as_ref()?.class.as_deref()
    }

    fn has_leading_class(&self, class: &str) -> bool {
        self.leading_class()
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn is_server_message(&self) -> bool {
        self.has_leading_class(SERVER_MESSAGE_CLASS)
    }

    pub fn kind(&self) -> Result<RowKind, ClockError> {
        match &self.id {
            Some(id) => Timestamp::from_row_id(id).map(RowKind::Timed),
            None if self.is_server_message() => Ok(RowKind::ServerMessage),
            None => Ok(RowKind::Other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IrcLog {
    source: String,
    rows: Vec<LogRow>,
    timestamp_class: String,
}

impl IrcLog {
    pub fn parse(
        source: String,
        table_class: &str,
        timestamp_class: &str,
    ) -> Result<Self, IrcLogError> {
        let (body_start, body_end) = find_table(&source, table_class)?;
        let body = &source[body_start..body_end];

        let rows = ROW
            .captures_iter(body)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let attrs = caps.get(1).map_or("", |m| m.as_str());
                let content = caps.get(2)?;

                let leading_cell = LEADING_CELL.captures(content.as_str()).and_then(|cell| {
                    let element = cell.get(1)?;
                    let cell_attrs = cell.get(3).map_or("", |m| m.as_str());
                    Some(LeadingCell {
                        span: body_start + content.start() + element.start()
                            ..body_start + content.start() + element.end(),
                        class: attr_value(&CLASS_ATTR, cell_attrs),
                    })
                });

                Some(LogRow {
                    span: body_start + whole.start()..body_start + whole.end(),
                    content_start: body_start + content.start(),
                    id: attr_value(&ID_ATTR, attrs),
                    leading_cell,
                })
            })
            .collect();

        Ok(Self {
            source,
            rows,
            timestamp_class: timestamp_class.to_string(),
        })
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    /// Rows with a time identifier that have no timestamp cell yet.
    pub fn pending_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.id.is_some() && !self.is_annotated(row))
            .count()
    }

    pub fn annotated_rows(&self) -> usize {
        self.rows.iter().filter(|row| self.is_annotated(row)).count()
    }

    fn is_annotated(&self, row: &LogRow) -> bool {
        row.has_leading_class(&self.timestamp_class)
    }

    /// Refuse documents this tool has already processed.
    pub fn ensure_unprocessed(&self) -> Result<(), IrcLogError> {
        let annotated = self.annotated_rows();
        if self.pending_rows() == 0 {
            return Err(IrcLogError::NoPendingRows);
        }
        if annotated > 0 {
            return Err(IrcLogError::AlreadyAnnotated { annotated });
        }
        Ok(())
    }

    pub fn row_kinds(&self) -> Result<Vec<RowKind>, ClockError> {
        self.rows.iter().map(LogRow::kind).collect()
    }

    /// Render the document with one action applied per row.
    pub fn apply(&self, actions: &[RowAction], style: &MarkerStyle) -> Result<String, IrcLogError> {
        if actions.len() != self.rows.len() {
            return Err(IrcLogError::PlanMismatch {
                rows: self.rows.len(),
                actions: actions.len(),
            });
        }

        let source = self.source.as_str();
        let mut out = String::with_capacity(source.len() + self.rows.len() * 40);
        let mut cursor = 0;

        for (row, action) in self.rows.iter().zip(actions) {
            match action {
                RowAction::Annotate(stamp) => {
                    out.push_str(&source[cursor..row.content_start]);
                    out.push_str(&format!(
                        "<td class=\"{}\">{}</td>",
                        escape_html(&self.timestamp_class),
                        escape_html(&style.render(stamp))
                    ));
                    cursor = row.content_start;
                }
                RowAction::Remove => {
                    let removed = line_span(source, row.span.clone(), cursor);
                    out.push_str(&source[cursor..removed.start]);
                    cursor = removed.end;
                }
                RowAction::StripServerMessage => {
                    if let Some(cell) = &row.leading_cell {
                        out.push_str(&source[cursor..cell.span.start]);
                        cursor = cell.span.end;
                    }
                }
                RowAction::Leave => {}
            }
        }

        out.push_str(&source[cursor..]);
        Ok(out)
    }
}

/// Byte range of the body of the first table carrying `class`.
fn find_table(source: &str, class: &str) -> Result<(usize, usize), IrcLogError> {
    let open = TABLE_OPEN
        .captures_iter(source)
        .find(|caps| {
            caps.get(1)
                .and_then(|attrs| attr_value(&CLASS_ATTR, attrs.as_str()))
                .is_some_and(|value| value == class)
        })
        .and_then(|caps| caps.get(0))
        .ok_or_else(|| IrcLogError::MissingTable {
            class: class.to_string(),
        })?;

    let close = TABLE_CLOSE
        .find_at(source, open.end())
        .ok_or(IrcLogError::UnclosedTable)?;

    Ok((open.end(), close.start()))
}

fn attr_value(pattern: &Regex, attrs: &str) -> Option<String> {
    let caps = pattern.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Widen a removed element to its whole line when nothing else shares it.
fn line_span(source: &str, span: Range<usize>, floor: usize) -> Range<usize> {
    let before = &source[floor..span.start];
    let line_start = before.rfind('\n').map_or(floor, |idx| floor + idx + 1);
    if !source[line_start..span.start].trim().is_empty() {
        return span;
    }

    let after = &source[span.end..];
    let trailing = after.len() - after.trim_start_matches([' ', '\t']).len();
    let rest = &after[trailing..];
    let newline = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        return span;
    };

    line_start..span.end + trailing + newline
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
