/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::tools::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tokio::sync::oneshot;

#[derive(Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct NotificationId(pub String);

// The hosting application serializes database row ids as JSON integers,
// other emitters use strings. Both decode to the opaque identifier.
impl<'de> Deserialize<'de> for NotificationId {
    fn deserialize<D>(deserializer: D) -> Result<NotificationId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdRepr {
            Text(String),
            Number(i64),
        }

        match IdRepr::deserialize(deserializer)? {
            IdRepr::Text(id) => Ok(NotificationId(id)),
            IdRepr::Number(id) => Ok(NotificationId(id.to_string())),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    pub fn inner(&self) -> String {
        self.0.to_owned()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
pub struct AlertId(pub String);

/// One notification record as returned by the listing endpoint. Content is
/// immutable once received, only local read-tracking changes. The timestamp
/// is an opaque display string, presented verbatim and never parsed.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct NotificationPayload {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub time: String,
    #[serde(default)]
    pub link: Option<String>,
    pub is_read: bool,
}

/// Payload shape of the listing endpoint. An absent `notifications` key is
/// equivalent to an empty batch.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq, Default)]
pub struct NotificationListResponse {
    #[serde(default)]
    pub notifications: Vec<NotificationPayload>,
}

/// Acknowledgement of a successful bulk mark-all-read request. The server
/// response body carries no information the client interprets.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct Ack;

#[derive(
    Debug, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// User-initiated commands serviced by the poller loop, independent of the
/// scheduler tick.
#[derive(Debug)]
pub enum PollerCommand {
    SetEnabled(bool),
    MarkAllRead(oneshot::Sender<Result<Ack, AppError>>),
    Dismiss(AlertId),
}
