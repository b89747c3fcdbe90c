//! Scheduled tick source.
//!
//! The session itself is caller-ticked; this is the one periodic task that
//! does the calling. It fires at a fixed one-second cadence while the
//! session is running, persists a snapshot after every tick, and returns
//! as soon as the session stops running (pause, or a phase transition
//! with auto-start-next off). Stopping is just letting the loop return -
//! there is no in-flight work to cancel.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::events::Event;
use crate::storage::{Snapshot, SnapshotStore};
use crate::timer::Session;

/// Drive the session until it stops running.
///
/// `observe` sees the session after each tick, along with the phase
/// completion event when one fired. Ticks are never queued: a missed
/// cadence slot is skipped, not replayed in a burst.
pub async fn run_while_running<F>(session: &mut Session, store: &SnapshotStore, mut observe: F)
where
    F: FnMut(&Session, Option<&Event>),
{
    let mut cadence = interval(Duration::from_secs(1));
    cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first interval tick fires immediately; consume it so the first
    // decrement happens a full second after start.
    cadence.tick().await;

    while session.is_running() {
        cadence.tick().await;
        let event = session.tick();
        store.save(&Snapshot::capture(session));
        observe(session, event.as_ref());
    }
}
