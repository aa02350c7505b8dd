//! Per-question countdown.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::event::{FlowEvent, Token};

/// Owns the single live tick task, if any.
///
/// Starting a new countdown always aborts the previous task first, so at most
/// one ticker exists at any time. Dropping the scheduler stops it.
#[derive(Debug, Default)]
pub struct Countdown {
    live: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post `FlowEvent::Tick { token }` every `period`, starting one period from now.
    pub fn start(&mut self, token: Token, period: Duration, events: UnboundedSender<FlowEvent>) {
        self.cancel();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(FlowEvent::Tick { token }).is_err() {
                    break;
                }
            }
        });
        self.live = Some(handle);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.live.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.live.is_some()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
