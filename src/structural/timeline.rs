//! Timing of timeline events, in seconds

use serde::Serialize;

use crate::ast::TimelineEvent;

/// Resolved timing of one timeline event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimelineEventType {
    Timed {
        start: f64,
        end: f64,
        duration: f64,
    },
    Sequence {
        start: f64,
        duration: f64,
        /// Duration of each item, in order
        items: Vec<f64>,
    },
    Stagger {
        delay: f64,
        #[serde(rename = "itemDuration")]
        item_duration: f64,
    },
}

impl TimelineEventType {
    pub fn start(&self) -> f64 {
        match self {
            TimelineEventType::Timed { start, .. } | TimelineEventType::Sequence { start, .. } => {
                *start
            }
            TimelineEventType::Stagger { .. } => 0.0,
        }
    }
}

/// Evaluate an event's time expressions.
///
/// `None` when any expression has no value (for example a division by zero).
/// A timed range with `start > end` still yields a type; range ordering is the
/// compiler's check.
pub fn infer_timeline_event(event: &TimelineEvent) -> Option<TimelineEventType> {
    match event {
        TimelineEvent::Timed { range, .. } => {
            let start = range.start.evaluate()?;
            let end = range.end.evaluate()?;
            Some(TimelineEventType::Timed {
                start,
                end,
                duration: end - start,
            })
        }
        TimelineEvent::Sequence { items, .. } => {
            let durations = items
                .iter()
                .map(|item| item.duration.evaluate())
                .collect::<Option<Vec<f64>>>()?;
            Some(TimelineEventType::Sequence {
                start: 0.0,
                duration: durations.iter().sum(),
                items: durations,
            })
        }
        TimelineEvent::Stagger {
            delay, duration, ..
        } => Some(TimelineEventType::Stagger {
            delay: delay.evaluate()?,
            item_duration: duration.evaluate()?,
        }),
    }
}

