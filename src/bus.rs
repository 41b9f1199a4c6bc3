// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Process-wide change fan-out. The bus is owned next to the store gateway
//! and injected into each session; there is no ambient global. Events are
//! signals only: subscribers re-fetch from the store to get content.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::errors::StreamInterrupted;

/// Keepalive cadence for idle subscriptions. Carries no data and must be
/// ignored by reconciliation logic.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(15);

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Sent once, immediately after subscribing.
    Connected,
    /// Something was written. The timestamp is informative, not
    /// authoritative; receivers must treat this as a signal to re-fetch.
    ProjectsUpdated(DateTime<Utc>),
    /// Idle keepalive.
    Heartbeat,
}

/// Fan-out topic for "projects changed" signals. Cloning shares the topic.
/// Any number of subscribers may listen; none is ever refused.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<DateTime<Utc>>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        ChangeBus::new()
    }
}

impl ChangeBus {
    pub fn new() -> ChangeBus {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        ChangeBus { tx }
    }

    /// Signal every current subscriber. A bus with no subscribers is fine.
    pub fn notify(&self, at: DateTime<Utc>) {
        let _ = self.tx.send(at);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            connected_sent: false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One session's view of the change stream. Dropping it releases the
/// subscription without affecting other sessions.
pub struct Subscription {
    rx: broadcast::Receiver<DateTime<Utc>>,
    connected_sent: bool,
}

impl Subscription {
    /// Next stream event: `Connected` first, then one `ProjectsUpdated` per
    /// write, with a `Heartbeat` after every quiet [`HEARTBEAT_PERIOD`]. A
    /// receiver that fell behind gets its missed signals coalesced into a
    /// single `ProjectsUpdated` (delivery is at-least-once, not counted).
    pub async fn next(&mut self) -> Result<StreamEvent, StreamInterrupted> {
        if !self.connected_sent {
            self.connected_sent = true;
            return Ok(StreamEvent::Connected);
        }
        match tokio::time::timeout(HEARTBEAT_PERIOD, self.rx.recv()).await {
            Ok(Ok(at)) => Ok(StreamEvent::ProjectsUpdated(at)),
            Ok(Err(broadcast::error::RecvError::Lagged(_))) => {
                Ok(StreamEvent::ProjectsUpdated(Utc::now()))
            }
            Ok(Err(broadcast::error::RecvError::Closed)) => Err(StreamInterrupted),
            Err(_) => Ok(StreamEvent::Heartbeat),
        }
    }

    /// Non-blocking variant for cooperative single-threaded callers: drains
    /// any pending signal without waiting, coalescing a backlog into one.
    pub fn try_next(&mut self) -> Result<Option<DateTime<Utc>>, StreamInterrupted> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(at) => latest = Some(at),
                Err(broadcast::error::TryRecvError::Lagged(_)) => latest = Some(Utc::now()),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(latest),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return if latest.is_some() { Ok(latest) } else { Err(StreamInterrupted) };
                }
            }
        }
    }
}
