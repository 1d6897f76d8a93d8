/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use anyhow::Result;
use notification_client::{
    capabilities::{PermissionGate, SessionActivityProbe},
    common::types::{AlertId, PermissionStatus, PollerCommand},
    environment::{AppConfig, AppState},
    outbound::external::ApiNotificationSource,
    poller::{run_notification_poller, NotificationPoller},
    presenter::{AlertPresenter, AlertView, PresentationArea},
    tools::logger::setup_tracing,
};
use std::{env::var, sync::Arc};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::{mpsc, oneshot},
};
use tracing::*;

/// Log-backed mount point so the subsystem runs headless end-to-end.
struct LogPresentationArea;

impl PresentationArea for LogPresentationArea {
    fn mount_alert(&self, alert: &AlertView) {
        info!(
            "[ALERT] {} ({}) : {}{}",
            alert.title,
            alert.time,
            alert.message,
            alert
                .link
                .as_ref()
                .map(|link| format!(" -> {}", link))
                .unwrap_or_default()
        );
    }

    fn remove_alert(&self, alert_id: &AlertId) {
        info!("[ALERT DISMISSED] : {:?}", alert_id);
    }

    fn set_badge(&self, count: Option<u64>) {
        match count {
            Some(count) => info!("[BADGE] : {}", count),
            None => info!("[BADGE] : hidden"),
        }
    }

    fn play_sound(&self) {
        info!("[SOUND] : notification cue");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dhall_config_path = var("NOTIFICATION_CLIENT_CONFIG")
        .unwrap_or_else(|_| "./dhall-configs/dev/notification_client.dhall".to_string());
    let app_config = serde_dhall::from_file(dhall_config_path).parse::<AppConfig>()?;

    let _guard = setup_tracing(app_config.logger_cfg.to_owned());

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic Occured : {:?}", panic_info);
    }));

    let app_state = AppState::new(app_config);

    // Headless runs have no way to ask the user, an undetermined permission
    // resolves to denied (visual-only alerts).
    let permission_gate =
        PermissionGate::resolve(app_state.sound_permission, || PermissionStatus::Denied);
    let probe = SessionActivityProbe::new(true);
    let presenter = AlertPresenter::new(
        Some(Arc::new(LogPresentationArea)),
        permission_gate,
        app_state.alert_dismiss_delay,
    );
    let source = ApiNotificationSource::new(&app_state);
    let poller = NotificationPoller::new(source, probe, presenter);

    let (_command_tx, command_rx) = mpsc::channel::<PollerCommand>(1024);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    // Listen for SIGTERM and SIGINT (Ctrl+C) signals.
    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
        let _ = shutdown_tx.send(());
    });

    run_notification_poller(
        poller,
        app_state.polling_interval,
        command_rx,
        shutdown_rx,
    )
    .await;

    Ok(())
}
