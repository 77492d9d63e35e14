use std::sync::mpsc;

use tracing::trace;

use crate::event::AppEvent;

/// Sink for events produced by background requests
pub trait Dispatcher {
    fn dispatch(&self, event: AppEvent);
}

impl Dispatcher for mpsc::Sender<AppEvent> {
    fn dispatch(&self, event: AppEvent) {
        if let Err(mpsc::SendError(event)) = self.send(event) {
            trace!(event = event.variant_name(), "No receiver left for event");
        }
    }
}
