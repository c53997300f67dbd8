//! Single pass over transcript rows.
//!
//! Every decision is made up front and returned as a plan, so a fatal
//! ordering error leaves the document untouched.

use serde::Serialize;

use super::clock::Timestamp;
use super::segment::{OrderingError, Outcome, Segment, SegmentClassifier, ShowWindow, Stamp};

/// What the document layer found in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Row carrying a `tHH:MM` identifier.
    Timed(Timestamp),
    /// Untimed row whose first cell is a server message.
    ServerMessage,
    Other,
}

/// What to do with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Annotate(Stamp),
    Remove,
    StripServerMessage,
    Leave,
}

/// Places clock times on the reference day, advancing a day whenever the
/// clock runs backwards.
#[derive(Debug, Clone, Default)]
pub struct RowTimeline {
    last_seen: Option<Timestamp>,
    days_elapsed: i64,
}

impl RowTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the corrected timestamp and whether a midnight was crossed.
    pub fn place(&mut self, clock: Timestamp) -> (Timestamp, bool) {
        let mut placed = clock + chrono::TimeDelta::days(self.days_elapsed);
        let mut rolled_over = false;

        if let Some(last) = self.last_seen {
            if placed < last {
                self.days_elapsed += 1;
                placed = placed.next_day();
                rolled_over = true;
            }
        }

        self.last_seen = Some(placed);
        (placed, rolled_over)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationSummary {
    pub annotated: usize,
    pub discarded_preshow: usize,
    pub discarded_postshow: usize,
    pub server_messages_stripped: usize,
    pub untouched: usize,
    pub rollovers: usize,
    pub final_segment: Segment,
}

impl AnnotationSummary {
    pub fn discarded(&self) -> usize {
        self.discarded_preshow + self.discarded_postshow
    }
}

/// One entry per input row, in document order.
#[derive(Debug, Clone)]
pub struct AnnotationPlan {
    pub actions: Vec<RowAction>,
    pub timestamps: Vec<Option<Timestamp>>,
    pub summary: AnnotationSummary,
}

pub struct Annotator {
    timeline: RowTimeline,
    classifier: SegmentClassifier,
}

impl Annotator {
    pub fn new(window: ShowWindow) -> Self {
        Self {
            timeline: RowTimeline::new(),
            classifier: SegmentClassifier::new(window),
        }
    }

    pub fn plan<I>(mut self, rows: I) -> Result<AnnotationPlan, OrderingError>
    where
        I: IntoIterator<Item = RowKind>,
    {
        let rows = rows.into_iter();
        let (lower, _) = rows.size_hint();
        let mut actions = Vec::with_capacity(lower);
        let mut timestamps = Vec::with_capacity(lower);
        let mut summary = AnnotationSummary::default();

        for row in rows {
            let (action, placed) = match row {
                RowKind::Timed(clock) => {
                    let (placed, rolled_over) = self.timeline.place(clock);
                    if rolled_over {
                        summary.rollovers += 1;
                    }
                    let action = match self.classifier.classify(placed)? {
                        Outcome::Keep(stamp) => {
                            summary.annotated += 1;
                            RowAction::Annotate(stamp)
                        }
                        Outcome::Discard => {
                            if self.classifier.segment() == Segment::Preshow {
                                summary.discarded_preshow += 1;
                            } else {
                                summary.discarded_postshow += 1;
                            }
                            RowAction::Remove
                        }
                    };
                    (action, Some(placed))
                }
                RowKind::ServerMessage => {
                    summary.server_messages_stripped += 1;
                    (RowAction::StripServerMessage, None)
                }
                RowKind::Other => {
                    summary.untouched += 1;
                    (RowAction::Leave, None)
                }
            };
            actions.push(action);
            timestamps.push(placed);
        }

        summary.final_segment = self.classifier.segment();
        Ok(AnnotationPlan {
            actions,
            timestamps,
            summary,
        })
    }
}
