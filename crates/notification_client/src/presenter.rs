/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    capabilities::PermissionGate,
    common::types::{AlertId, NotificationPayload},
};
use rustc_hash::FxHashMap;
use std::{sync::Arc, time::Duration};
use tokio::{sync::RwLock, task::JoinHandle, time::sleep};
use tracing::*;
use uuid::Uuid;

/// One transient alert as handed to the presentation area.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlertView {
    pub alert_id: AlertId,
    pub title: String,
    pub message: String,
    pub time: String,
    pub link: Option<String>,
}

/// Mount point exposed by the hosting page: zero-or-more transient alert
/// elements and one persistent badge element. A `None` badge count hides
/// the badge.
pub trait PresentationArea: Send + Sync + 'static {
    fn mount_alert(&self, alert: &AlertView);
    fn remove_alert(&self, alert_id: &AlertId);
    fn set_badge(&self, count: Option<u64>);
    fn play_sound(&self);
}

/// Renders transient, self-dismissing alerts and the persistent badge.
/// Alerts auto-dismiss after a fixed delay independent of scheduler ticks
/// and can also be dismissed by explicit user action, both paths release the
/// alert's dismiss timer and mount. When no presentation area was mounted,
/// alert and badge operations are no-ops rather than failures.
pub struct AlertPresenter {
    area: Option<Arc<dyn PresentationArea>>,
    permission_gate: PermissionGate,
    dismiss_delay: Duration,
    active_alerts: Arc<RwLock<FxHashMap<AlertId, JoinHandle<()>>>>,
}

impl AlertPresenter {
    pub fn new(
        area: Option<Arc<dyn PresentationArea>>,
        permission_gate: PermissionGate,
        dismiss_delay: Duration,
    ) -> AlertPresenter {
        AlertPresenter {
            area,
            permission_gate,
            dismiss_delay,
            active_alerts: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// Mounts one alert carrying the notification's title, timestamp,
    /// message and optional action link, then arms its auto-dismiss timer.
    /// The audible cue fires only when permission was previously granted, a
    /// denied or undetermined permission degrades to visual-only.
    pub async fn present(&self, notification: &NotificationPayload) -> Option<AlertId> {
        let area = self.area.as_ref()?.clone();

        let alert_id = AlertId(Uuid::new_v4().to_string());
        let alert = AlertView {
            alert_id: alert_id.to_owned(),
            title: notification.title.to_owned(),
            message: notification.message.to_owned(),
            time: notification.time.to_owned(),
            link: notification.link.to_owned(),
        };

        info!(
            "[Alert Mounted] : {:?} - NotificationId : {:?}",
            alert_id, notification.id
        );
        area.mount_alert(&alert);

        if self.permission_gate.sound_allowed() {
            area.play_sound();
        }

        let dismiss_timer = tokio::spawn({
            let area = area.clone();
            let active_alerts = self.active_alerts.clone();
            let alert_id = alert_id.to_owned();
            let dismiss_delay = self.dismiss_delay;
            async move {
                sleep(dismiss_delay).await;
                if active_alerts.write().await.remove(&alert_id).is_some() {
                    area.remove_alert(&alert_id);
                    debug!("[Alert Auto Dismissed] : {:?}", alert_id);
                }
            }
        });

        self.active_alerts
            .write()
            .await
            .insert(alert_id.to_owned(), dismiss_timer);

        Some(alert_id)
    }

    /// Explicit user dismissal. Aborts the pending auto-dismiss timer so the
    /// alert is removed exactly once.
    pub async fn dismiss(&self, alert_id: &AlertId) {
        if let Some(dismiss_timer) = self.active_alerts.write().await.remove(alert_id) {
            dismiss_timer.abort();
            if let Some(area) = &self.area {
                area.remove_alert(alert_id);
            }
            debug!("[Alert Dismissed] : {:?}", alert_id);
        } else {
            warn!("[Alert Not Found] : {:?}", alert_id);
        }
    }

    /// Dismisses every outstanding alert, used on graceful shutdown.
    pub async fn dismiss_all(&self) {
        let drained: Vec<(AlertId, JoinHandle<()>)> =
            self.active_alerts.write().await.drain().collect();
        for (alert_id, dismiss_timer) in drained {
            dismiss_timer.abort();
            if let Some(area) = &self.area {
                area.remove_alert(&alert_id);
            }
        }
    }

    /// Shows the numeric badge when count > 0 and hides it otherwise.
    /// Idempotent, may be called redundantly with the same value.
    pub fn update_badge(&self, count: usize) {
        if let Some(area) = &self.area {
            area.set_badge(if count > 0 { Some(count as u64) } else { None });
        }
    }

    pub async fn active_alert_count(&self) -> usize {
        self.active_alerts.read().await.len()
    }
}
