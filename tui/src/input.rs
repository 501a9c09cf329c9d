//! Terminal input thread.
//!
//! Crossterm reads are blocking, so input runs on a plain thread and feeds
//! the async event loop through the sender. The thread exits when the event
//! loop side of the channel is gone.

use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) fn forward_input(events: AppEventSender) {
    loop {
        match crossterm::event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::error!("input poll failed: {e}");
                return;
            }
        }
        match crossterm::event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                events.send(AppEvent::Key(key));
            }
            Ok(Event::Resize(_, _)) => events.send(AppEvent::Resize),
            Ok(_) => {}
            Err(e) => {
                tracing::error!("input read failed: {e}");
                return;
            }
        }
    }
}
