use tokio::sync::mpsc::UnboundedSender;

use crate::app_event::AppEvent;

#[derive(Clone, Debug)]
pub(crate) struct AppEventSender {
    // High-priority events (input, resize, exit) are routed here.
    high_tx: UnboundedSender<AppEvent>,
    // Bulk events (data arrivals from loader tasks).
    bulk_tx: UnboundedSender<AppEvent>,
}

impl AppEventSender {
    /// Create a sender that splits events by priority across two channels.
    pub(crate) fn new_dual(
        high_tx: UnboundedSender<AppEvent>,
        bulk_tx: UnboundedSender<AppEvent>,
    ) -> Self {
        Self { high_tx, bulk_tx }
    }

    /// Send an event to the app event loop. If it fails (the loop is gone),
    /// we swallow the error and log it.
    pub(crate) fn send(&self, event: AppEvent) {
        let is_high = matches!(
            event,
            AppEvent::Key(_) | AppEvent::Resize | AppEvent::ExitRequest
        );
        let tx = if is_high { &self.high_tx } else { &self.bulk_tx };
        if let Err(e) = tx.send(event) {
            tracing::error!("failed to send event: {e}");
        }
    }
}
