use std::io::BufRead;

use anyhow::{Context, Result};

use crate::e_eventdispatcher::BuildEvent;

/// Parses a JSON-lines event stream, one `BuildEvent` per non-blank line.
///
/// # Example
/// ```
/// use buildlog_xml::e_parser::parse_events;
/// use buildlog_xml::e_eventdispatcher::BuildEvent;
///
/// let input = "{\"event\":\"project_started\",\"project\":\"App.csproj\"}\n\n{\"event\":\"project_finished\"}\n";
/// let events = parse_events(input.as_bytes()).unwrap();
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[1], BuildEvent::ProjectFinished);
/// ```
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<BuildEvent>> {
    let mut events = Vec::new();
    for_each_event(reader, |event| events.push(event))?;
    Ok(events)
}

/// Streams events to `handle` as they are read, without buffering the whole input.
/// Returns the number of events read.
pub fn for_each_event<R, F>(reader: R, mut handle: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(BuildEvent),
{
    let mut count = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: BuildEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("Malformed event on line {}: {}", idx + 1, trimmed))?;
        handle(event);
        count += 1;
    }
    Ok(count)
}
