/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use crate::{
    common::types::{CsrfToken, PermissionStatus},
    tools::logger::LoggerConfig,
};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationApiConfig {
    pub base_url: String,
    pub csrf_token: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub polling_interval_ms: u64,
    pub alert_dismiss_delay_ms: u64,
    pub sound_permission: String,
    pub notification_api_cfg: NotificationApiConfig,
    pub logger_cfg: LoggerConfig,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub base_url: Url,
    pub csrf_token: CsrfToken,
    pub request_timeout: Duration,
    pub polling_interval: Duration,
    pub alert_dismiss_delay: Duration,
    pub sound_permission: PermissionStatus,
}

impl AppState {
    pub fn new(app_config: AppConfig) -> AppState {
        AppState {
            base_url: Url::parse(app_config.notification_api_cfg.base_url.as_str())
                .expect("Failed to parse base_url."),
            csrf_token: CsrfToken(app_config.notification_api_cfg.csrf_token),
            request_timeout: Duration::from_millis(
                app_config.notification_api_cfg.request_timeout_ms,
            ),
            polling_interval: Duration::from_millis(app_config.polling_interval_ms),
            alert_dismiss_delay: Duration::from_millis(app_config.alert_dismiss_delay_ms),
            sound_permission: app_config
                .sound_permission
                .parse::<PermissionStatus>()
                .expect("Failed to parse sound_permission."),
        }
    }
}
