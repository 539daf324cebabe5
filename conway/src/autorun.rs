// autorun.rs - Cancellable repeating step timer

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use crate::protocol::SessionId;

/// A timer firing for one session, stamped with the epoch it was started in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub id: SessionId,
    pub epoch: u64,
}

/// Handle to a running timer task. Dropping it aborts the task.
///
/// Aborting does not recall ticks already queued, so the receiver must still
/// compare `Tick::epoch` against the session's current epoch.
#[derive(Debug)]
pub struct Autorun {
    task: JoinHandle<()>,
}

impl Autorun {
    /// Posts a [`Tick`] every `interval`, the first one `interval` from now.
    /// Must be called from within a tokio runtime.
    pub fn spawn(id: SessionId, epoch: u64, interval: Duration, ticks: UnboundedSender<Tick>) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(async move {
            let mut timer = time::interval_at(Instant::now() + interval, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if ticks.send(Tick { id: id.clone(), epoch }).is_err() {
                    trace!(session = %id, "tick receiver gone, timer exiting");
                    break;
                }
            }
        });
        Self { task }
    }
}

impl Drop for Autorun {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_on_the_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = SessionId::new("left", 0);
        let _autorun = Autorun::spawn(id.clone(), 4, Duration::from_millis(100), tx);

        time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(rx.try_recv().unwrap(), Tick { id: id.clone(), epoch: 4 });

        time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_the_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let autorun = Autorun::spawn(SessionId::new("left", 0), 0, Duration::from_millis(10), tx);
        drop(autorun);

        time::sleep(Duration::from_millis(100)).await;
        // Sender lives in the aborted task, so the channel is closed and empty
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_raised_to_one_millisecond() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _autorun = Autorun::spawn(SessionId::new("left", 0), 0, Duration::ZERO, tx);
        time::sleep(Duration::from_millis(5)).await;
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert!((4..=5).contains(&count), "got {count}");
    }
}
