/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::PermissionStatus;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::info;

/// Resolved permission for audible cues. An undetermined status prompts the
/// injected decider exactly once at construction and is never re-prompted
/// for the remainder of the session.
#[derive(Clone, Debug)]
pub struct PermissionGate {
    status: PermissionStatus,
}

impl PermissionGate {
    pub fn resolve(
        initial: PermissionStatus,
        prompt: impl FnOnce() -> PermissionStatus,
    ) -> PermissionGate {
        let status = match initial {
            PermissionStatus::Undetermined => {
                let decided = prompt();
                info!("Sound Permission Decided : {}", decided);
                decided
            }
            status => status,
        };
        PermissionGate { status }
    }

    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    pub fn sound_allowed(&self) -> bool {
        self.status == PermissionStatus::Granted
    }
}

/// Reports whether the user is currently attentive to the page. Polled by
/// the scheduler on every tick, no side effects.
pub trait ActivityProbe: Send + Sync {
    fn is_attentive(&self) -> bool;
}

/// Production probe backed by a foreground flag the host flips on focus
/// changes.
#[derive(Clone)]
pub struct SessionActivityProbe {
    foreground: Arc<AtomicBool>,
}

impl SessionActivityProbe {
    pub fn new(initially_foreground: bool) -> SessionActivityProbe {
        SessionActivityProbe {
            foreground: Arc::new(AtomicBool::new(initially_foreground)),
        }
    }

    pub fn set_foreground(&self, foreground: bool) {
        self.foreground.store(foreground, Ordering::Relaxed);
    }
}

impl ActivityProbe for SessionActivityProbe {
    fn is_attentive(&self) -> bool {
        self.foreground.load(Ordering::Relaxed)
    }
}
