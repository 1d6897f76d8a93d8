/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::{NotificationId, NotificationPayload};
use rustc_hash::FxHashSet;

/// Result of reconciling one batch against the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReconcileOutcome {
    pub newly_unread: Vec<NotificationPayload>,
    pub unread_count: usize,
}

/// In-memory client state: unread count, polling-enabled flag and the set of
/// notification identifiers already presented this session. Rebuilt from the
/// server on every run, never persisted.
///
/// Mutated only by `reconcile` and `force_zero`, from a single looper task.
#[derive(Clone, Debug)]
pub struct NotificationStore {
    unread_count: usize,
    polling_enabled: bool,
    presented: FxHashSet<NotificationId>,
}

impl NotificationStore {
    pub fn new() -> NotificationStore {
        NotificationStore {
            unread_count: 0,
            polling_enabled: true,
            presented: FxHashSet::default(),
        }
    }

    /// Diffs a batch against the presented set. An unread notification whose
    /// identifier has not been presented yet is classified as newly-unread
    /// and recorded, so a later poll re-returning the same still-unread item
    /// does not re-alert. The unread count is server-driven: the number of
    /// unread entries in this batch, regardless of deduplication.
    pub fn reconcile(&mut self, batch: &[NotificationPayload]) -> ReconcileOutcome {
        let mut newly_unread = Vec::new();
        let mut unread_count = 0;

        for notification in batch {
            if notification.is_read {
                continue;
            }
            unread_count += 1;
            if self.presented.insert(notification.id.clone()) {
                newly_unread.push(notification.clone());
            }
        }

        self.unread_count = unread_count;

        ReconcileOutcome {
            newly_unread,
            unread_count,
        }
    }

    /// Called on acknowledgement success. Zeroes the unread count without
    /// touching the presented set, already-presented items stay suppressed.
    pub fn force_zero(&mut self) {
        self.unread_count = 0;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.polling_enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.polling_enabled
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn presented_count(&self) -> usize {
        self.presented.len()
    }

    pub fn is_presented(&self, notification_id: &NotificationId) -> bool {
        self.presented.contains(notification_id)
    }
}
