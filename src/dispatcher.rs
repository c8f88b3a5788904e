//! Button event dispatcher — terminal consumer of the classifier queue.
//!
//! Blocks on the bounded event queue and reports each event. Stateless;
//! the only error surface is the queue contract itself (events lost to
//! a full queue never reach this point).

use log::info;

use crate::channels::EventQueue;
use crate::drivers::button::ButtonEvent;

/// Human-readable report text per event variant.
pub fn describe(event: ButtonEvent) -> &'static str {
    match event {
        ButtonEvent::Released => "released",
        ButtonEvent::Pressed => "pressed",
        ButtonEvent::Click => "clicked",
        ButtonEvent::LongClick => "long clicked",
    }
}

/// Dispatcher loop. Runs on the main thread for the lifetime of the
/// device, draining events in arrival order.
pub async fn run(events: &EventQueue) -> ! {
    loop {
        let event = events.receive().await;
        info!("Button {}", describe(event));
    }
}
