// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] writes events from a [`RecorderSink`](super::recorder::RecorderSink)
//! as one JSON array. Each element carries the event `name`, the `instance`
//! it belongs to (or `null`), and an `args` object with the event's fields.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Writes `events` as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events.iter().map(to_value).collect();
    serde_json::to_writer_pretty(&mut *writer, &values)?;
    writeln!(writer)
}

/// Converts one event to its JSON form.
#[must_use]
pub fn to_value(event: &RecordedEvent) -> Value {
    let args = match event {
        RecordedEvent::Activation(e) => json!({
            "mode": format!("{:?}", e.mode),
        }),
        RecordedEvent::Request(e) => json!({
            "direction": format!("{:?}", e.direction),
            "decision": format!("{:?}", e.decision),
        }),
        RecordedEvent::Boundary(e) => json!({
            "direction": format!("{:?}", e.direction),
            "playhead": e.playhead,
        }),
        RecordedEvent::TweenStart(e) => json!({
            "tween": e.tween.0,
            "direction": format!("{:?}", e.direction),
            "from": e.from,
            "to": e.to,
        }),
        RecordedEvent::TweenComplete(e) | RecordedEvent::TweenCancel(e) => json!({
            "tween": e.tween.0,
            "position": e.position,
        }),
        RecordedEvent::GestureToggle(e) => json!({
            "cause": format!("{:?}", e.cause),
            "enabled": e.enabled,
            "scroll_y": e.scroll_y,
        }),
        RecordedEvent::Teardown(e) => json!({
            "was_enhanced": e.was_enhanced,
        }),
        RecordedEvent::Refresh(e) => json!({
            "roots": e.roots,
            "skipped": e.skipped,
            "evicted": e.evicted,
            "observed": e.observed,
            "activated": e.activated,
        }),
    };
    json!({
        "name": event.name(),
        "instance": event.instance().map(|id| id.0),
        "args": args,
    })
}

#[cfg(test)]
mod tests {
    use stacked_cards_core::trace::RefreshEvent;

    use super::*;
    use crate::recorder::tests::record_session;

    #[test]
    fn export_is_a_json_array() {
        let sink = record_session();
        let mut out = Vec::<u8>::new();
        export(sink.events(), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let array = parsed.as_array().expect("top level should be an array");
        assert_eq!(array.len(), sink.events().len());
        assert_eq!(array[0]["name"], "activation");
        assert_eq!(array[0]["instance"], 7);
    }

    #[test]
    fn tween_start_carries_label_positions() {
        let sink = record_session();
        let start = sink
            .events()
            .iter()
            .find(|e| matches!(e, RecordedEvent::TweenStart(_)))
            .expect("session should start a tween");
        let value = to_value(start);
        assert_eq!(value["args"]["direction"], "Down");
        assert_eq!(value["args"]["from"], 0.0);
        assert!(
            value["args"]["to"].as_f64().is_some_and(|to| to > 0.0),
            "got {value}"
        );
    }

    #[test]
    fn refresh_has_no_instance() {
        let value = to_value(&RecordedEvent::Refresh(RefreshEvent {
            roots: 3,
            skipped: 1,
            evicted: 0,
            observed: 2,
            activated: 0,
        }));
        assert_eq!(value["instance"], Value::Null);
        assert_eq!(value["args"]["observed"], 2);
    }
}
