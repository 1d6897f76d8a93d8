/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    capabilities::ActivityProbe,
    common::types::{Ack, AlertId, NotificationListResponse, PollerCommand},
    presenter::AlertPresenter,
    store::NotificationStore,
    tools::{
        error::AppError,
        prometheus::{
            ACKNOWLEDGEMENTS, ALERTED_NOTIFICATIONS, POLLED_BATCHES, SUPPRESSED_ALERTS,
            TOTAL_NOTIFICATIONS,
        },
    },
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::{
    sync::{mpsc::Receiver, oneshot},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::*;

/// Seam to the remote notification service, faked in tests.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn fetch_notifications(&self) -> Result<NotificationListResponse, AppError>;
    async fn mark_all_read(&self) -> Result<Ack, AppError>;
}

/// Owns the client state and drives one poll attempt per tick. Ticks and
/// user commands are serviced by a single looper task, so state mutations
/// never interleave. Batches are reconciled in receipt order; two polls
/// never overlap because ticks are serialized with the fetch they issue.
pub struct NotificationPoller<S, P>
where
    S: NotificationSource,
    P: ActivityProbe,
{
    source: S,
    probe: P,
    store: NotificationStore,
    presenter: AlertPresenter,
}

impl<S, P> NotificationPoller<S, P>
where
    S: NotificationSource,
    P: ActivityProbe,
{
    pub fn new(source: S, probe: P, presenter: AlertPresenter) -> NotificationPoller<S, P> {
        NotificationPoller {
            source,
            probe,
            store: NotificationStore::new(),
            presenter,
        }
    }

    /// One scheduled poll attempt. A disabled flag or an inattentive user
    /// makes the tick a no-op, no network call and no state change. A failed
    /// or malformed fetch wastes the tick and leaves state untouched, the
    /// next tick retries naturally.
    pub async fn tick(&mut self) {
        if !self.store.is_enabled() {
            debug!("[Tick Skipped] : polling disabled");
            return;
        }
        if !self.probe.is_attentive() {
            debug!("[Tick Skipped] : user inattentive");
            return;
        }

        match self.source.fetch_notifications().await {
            Ok(listing) => {
                POLLED_BATCHES.inc();
                TOTAL_NOTIFICATIONS.inc_by(listing.notifications.len() as u64);

                let outcome = self.store.reconcile(&listing.notifications);
                SUPPRESSED_ALERTS
                    .inc_by((outcome.unread_count - outcome.newly_unread.len()) as u64);

                for notification in &outcome.newly_unread {
                    if self.presenter.present(notification).await.is_some() {
                        ALERTED_NOTIFICATIONS.inc();
                    }
                }

                self.presenter.update_badge(outcome.unread_count);
            }
            Err(err) => {
                warn!("[Poll Failed] : {}", err);
            }
        }
    }

    /// Bulk acknowledgement, invoked by direct user action independent of
    /// the scheduler tick. State is mutated only after the server confirmed,
    /// a failure leaves the store and badge unchanged and is reported to the
    /// caller. No automatic retry.
    pub async fn mark_all_read(&mut self) -> Result<Ack, AppError> {
        let ack = self.source.mark_all_read().await?;
        ACKNOWLEDGEMENTS.inc();
        self.store.force_zero();
        self.presenter.update_badge(0);
        Ok(ack)
    }

    /// Takes effect on the next tick, never cancels a poll in flight.
    pub fn set_enabled(&mut self, enabled: bool) {
        info!("[Polling Toggled] : enabled = {}", enabled);
        self.store.set_enabled(enabled);
    }

    pub async fn dismiss(&self, alert_id: &AlertId) {
        self.presenter.dismiss(alert_id).await;
    }

    pub async fn shutdown(&self) {
        self.presenter.dismiss_all().await;
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }
}

/// Drives ticks at the configured interval until shutdown. The first tick
/// fires one full interval after start. Commands arrive on their own channel
/// so a user action never waits for the next tick.
pub async fn run_notification_poller<S, P>(
    mut poller: NotificationPoller<S, P>,
    polling_interval: Duration,
    mut command_rx: Receiver<PollerCommand>,
    mut shutdown_rx: oneshot::Receiver<()>,
) where
    S: NotificationSource,
    P: ActivityProbe,
{
    let mut timer = interval_at(Instant::now() + polling_interval, polling_interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                poller.tick().await;
            }
            command = command_rx.recv() => {
                match command {
                    Some(PollerCommand::SetEnabled(enabled)) => {
                        poller.set_enabled(enabled);
                    }
                    Some(PollerCommand::MarkAllRead(respond_to)) => {
                        let result = poller.mark_all_read().await;
                        if respond_to.send(result).is_err() {
                            warn!("MarkAllRead caller went away before the response");
                        }
                    }
                    Some(PollerCommand::Dismiss(alert_id)) => {
                        poller.dismiss(&alert_id).await;
                    }
                    None => {
                        error!("Error: command channel closed");
                        break;
                    }
                }
            }
            _ = &mut shutdown_rx => {
                info!("[Graceful Shutting Down] => Dismissing outstanding alerts");
                poller.shutdown().await;
                break;
            }
        }
    }
}
