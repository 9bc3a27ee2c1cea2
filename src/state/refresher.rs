use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;

/// How often the host offers the plugin a chance to update.
pub const UPDATE_TICK: Duration = Duration::from_secs(5);

/// Periodic update tick. The plugin throttles fetches itself, so this only
/// needs to be finer than the shortest poll interval.
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events }
    }

    pub async fn run(self) {
        let mut update_interval = interval(UPDATE_TICK);
        // Skip the immediate first tick; AppStarted already triggers an update.
        update_interval.tick().await;

        loop {
            update_interval.tick().await;
            if self.ui_events.send(UiEvent::UpdateTick).await.is_err() {
                break;
            }
        }
    }
}

/// Animation tick at the ticker's frame rate. A new frame interval arriving on
/// `frame_interval` (after a config reload) restarts the timer.
pub struct AnimationClock {
    ui_events: mpsc::Sender<UiEvent>,
    frame_interval: watch::Receiver<Duration>,
}

impl AnimationClock {
    pub fn new(ui_events: mpsc::Sender<UiEvent>, frame_interval: watch::Receiver<Duration>) -> Self {
        Self { ui_events, frame_interval }
    }

    pub async fn run(mut self) {
        let mut ticks = interval(*self.frame_interval.borrow_and_update());
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    if self.ui_events.send(UiEvent::AnimationTick).await.is_err() {
                        break;
                    }
                }
                changed = self.frame_interval.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    ticks = interval(*self.frame_interval.borrow_and_update());
                }
            }
        }
    }
}
