/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::{
    common::{
        types::{Ack, CsrfToken, NotificationListResponse},
        utils::decode_listing_payload,
    },
    environment::AppState,
    poller::NotificationSource,
    tools::{
        callapi::{call_api, CallApiError},
        error::AppError,
    },
};
use async_trait::async_trait;
use reqwest::{Method, Url};
use std::time::Duration;

pub async fn fetch_notifications(
    base_url: &Url,
    timeout: Duration,
) -> Result<NotificationListResponse, AppError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .expect("Invalid base URL")
        .push("api")
        .push("notifications")
        .push("");

    let resp: Result<serde_json::Value, CallApiError> = call_api::<serde_json::Value, ()>(
        Method::GET,
        &url,
        vec![("content-type", "application/json")],
        None,
        Some(timeout),
    )
    .await;

    match resp {
        Ok(payload) => decode_listing_payload(payload),
        Err(err) => Err(AppError::ListingCallFailed(err.to_string())),
    }
}

pub async fn bulk_mark_all_read(
    base_url: &Url,
    csrf_token: &CsrfToken,
    timeout: Duration,
) -> Result<Ack, AppError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .expect("Invalid base URL")
        .push("api")
        .push("notifications")
        .push("mark-all-read")
        .push("");

    let csrf_token = csrf_token.inner();
    let resp: Result<serde_json::Value, CallApiError> =
        call_api::<serde_json::Value, serde_json::Value>(
            Method::POST,
            &url,
            vec![
                ("content-type", "application/json"),
                ("x-csrftoken", csrf_token.as_str()),
            ],
            Some(serde_json::json!({})),
            Some(timeout),
        )
        .await;

    match resp {
        Ok(_) => Ok(Ack),
        // Any non-error status counts as success, the body is not interpreted.
        Err(CallApiError::ResponseDeserializationFailed(_)) => Ok(Ack),
        Err(err) => Err(AppError::AcknowledgementCallFailed(err.to_string())),
    }
}

/// Production source hitting the listing and bulk-acknowledge endpoints of
/// the hosting application.
pub struct ApiNotificationSource {
    base_url: Url,
    csrf_token: CsrfToken,
    request_timeout: Duration,
}

impl ApiNotificationSource {
    pub fn new(app_state: &AppState) -> ApiNotificationSource {
        ApiNotificationSource {
            base_url: app_state.base_url.to_owned(),
            csrf_token: app_state.csrf_token.to_owned(),
            request_timeout: app_state.request_timeout,
        }
    }
}

#[async_trait]
impl NotificationSource for ApiNotificationSource {
    async fn fetch_notifications(&self) -> Result<NotificationListResponse, AppError> {
        fetch_notifications(&self.base_url, self.request_timeout).await
    }

    async fn mark_all_read(&self) -> Result<Ack, AppError> {
        bulk_mark_all_read(&self.base_url, &self.csrf_token, self.request_timeout).await
    }
}
