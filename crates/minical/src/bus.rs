//! Change-event channel between the services and the presentation layer.
//!
//! Services publish [`CalendarEvent`]s; subscribers re-render on receipt.
//! This replaces ambient observable state: the composition root owns the
//! bus and hands out clones.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

/// Events driving status-bar and popover redraws.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarEvent {
    /// Persisted settings changed; redraw and restart the clock timer.
    SettingsChanged,
    /// The in-memory holiday index changed.
    HolidaysUpdated,
    /// A pipeline operation failed; `message` matches the sticky last error.
    HolidayError { message: String },
    /// One-second redisplay tick from the [`Ticker`](crate::clock::Ticker).
    Tick,
}

#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<CalendarEvent>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CalendarEvent> {
        self.sender.subscribe()
    }

    pub fn publish(
        &self,
        event: CalendarEvent,
    ) -> Result<usize, broadcast::error::SendError<CalendarEvent>> {
        self.sender.send(event)
    }
}

/// Coalesce bursts of events into one delivery.
///
/// Mirrors the 100 ms redraw debounce: after an event arrives, further
/// events within `window` replace it, and only the latest is forwarded
/// once the stream goes quiet. Lagged subscribers skip ahead.
pub fn debounced(
    mut rx: broadcast::Receiver<CalendarEvent>,
    window: Duration,
) -> mpsc::Receiver<CalendarEvent> {
    let (tx, out) = mpsc::channel(16);
    tokio::spawn(async move {
        loop {
            let mut latest = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };
            loop {
                match tokio::time::timeout(window, rx.recv()).await {
                    Ok(Ok(event)) => latest = event,
                    Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                    Ok(Err(broadcast::error::RecvError::Closed)) => break,
                    Err(_elapsed) => break,
                }
            }
            if tx.send(latest).await.is_err() {
                break;
            }
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn publish_and_receive_event() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        let _ = bus.publish(CalendarEvent::SettingsChanged);

        let received = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("recv");
        assert_eq!(received, CalendarEvent::SettingsChanged);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_event() {
        let bus = Bus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let _ = bus.publish(CalendarEvent::HolidaysUpdated);

        assert_eq!(rx1.recv().await.expect("recv1"), CalendarEvent::HolidaysUpdated);
        assert_eq!(rx2.recv().await.expect("recv2"), CalendarEvent::HolidaysUpdated);
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_coalesces_a_burst_into_the_latest_event() {
        let bus = Bus::new(8);
        let mut rx = debounced(bus.subscribe(), Duration::from_millis(100));

        for message in ["one", "two", "three"] {
            let _ = bus.publish(CalendarEvent::HolidayError {
                message: message.to_string(),
            });
        }

        let event = rx.recv().await.expect("coalesced event");
        assert_eq!(
            event,
            CalendarEvent::HolidayError {
                message: "three".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn events_past_the_window_are_delivered_separately() {
        let bus = Bus::new(8);
        let mut rx = debounced(bus.subscribe(), Duration::from_millis(100));

        let _ = bus.publish(CalendarEvent::SettingsChanged);
        let first = rx.recv().await.expect("first");
        assert_eq!(first, CalendarEvent::SettingsChanged);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let _ = bus.publish(CalendarEvent::HolidaysUpdated);
        let second = rx.recv().await.expect("second");
        assert_eq!(second, CalendarEvent::HolidaysUpdated);
    }
}
