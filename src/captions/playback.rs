use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::clock::PlaybackClock;
use super::engine::CaptionEngine;
use super::sync::SyncEvent;

/// Engine shared between the tick task and command handlers. Every mutation and
/// every resolution goes through this one lock.
pub type SharedEngine<C> = Arc<Mutex<CaptionEngine<C>>>;

pub fn shared<C>(engine: CaptionEngine<C>) -> SharedEngine<C> {
    Arc::new(Mutex::new(engine))
}

/// Delivers scheduled ticks to the engine every `tick_interval` and forwards the
/// resulting events. Anything else that changes the engine must send its events
/// on the same channel while holding the lock. Abort the handle to stop it.
pub fn spawn_ticker<C>(
    engine: SharedEngine<C>,
    tick_interval: Duration,
    events: UnboundedSender<SyncEvent>,
) -> JoinHandle<()>
where
    C: PlaybackClock + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;

            let mut guard = engine.lock().await;
            if !guard.tick_pending() {
                continue;
            }
            // send before unlocking so events queue in the order the engine produced them
            if let Some(event) = guard.tick()
                && events.send(event).is_err()
            {
                break;
            }
        }
    })
}
