/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fakes::{notification, FakeActivityProbe, FakeNotificationSource, FakePresentationArea};
use notification_client::{
    capabilities::PermissionGate,
    common::types::{PermissionStatus, PollerCommand},
    poller::{run_notification_poller, NotificationPoller},
    presenter::AlertPresenter,
    tools::error::AppError,
};
use std::{sync::atomic::Ordering, sync::Arc, time::Duration};
use tokio::sync::{mpsc, oneshot};

const POLLING_INTERVAL: Duration = Duration::from_millis(15000);
const DISMISS_DELAY: Duration = Duration::from_millis(5000);

#[allow(clippy::type_complexity)]
fn build_poller() -> (
    NotificationPoller<FakeNotificationSource, FakeActivityProbe>,
    FakeNotificationSource,
    FakeActivityProbe,
    Arc<FakePresentationArea>,
) {
    let source = FakeNotificationSource::new();
    let probe = FakeActivityProbe::new(true);
    let area = FakePresentationArea::new();
    let presenter = AlertPresenter::new(
        Some(area.clone()),
        PermissionGate::resolve(PermissionStatus::Denied, || PermissionStatus::Undetermined),
        DISMISS_DELAY,
    );
    let poller = NotificationPoller::new(source.clone(), probe.clone(), presenter);
    (poller, source, probe, area)
}

#[tokio::test]
async fn disabled_scheduler_makes_no_fetch_calls() {
    let (mut poller, source, _probe, _area) = build_poller();

    poller.set_enabled(false);
    poller.tick().await;
    poller.tick().await;
    poller.tick().await;
    assert_eq!(source.fetch_count(), 0);

    poller.set_enabled(true);
    poller.tick().await;
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn inattentive_ticks_make_no_fetch_calls() {
    let (mut poller, source, probe, _area) = build_poller();

    probe.set_attentive(false);
    poller.tick().await;
    poller.tick().await;
    poller.tick().await;
    assert_eq!(source.fetch_count(), 0);

    probe.set_attentive(true);
    poller.tick().await;
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn repeated_still_unread_item_alerts_once_but_keeps_the_count() {
    let (mut poller, source, _probe, area) = build_poller();

    source.push_batch(vec![notification("1", false)]);
    poller.tick().await;
    assert_eq!(area.mounted_count(), 1);
    assert_eq!(area.last_badge(), Some(Some(1)));

    source.push_batch(vec![notification("1", false)]);
    poller.tick().await;
    assert_eq!(area.mounted_count(), 1);
    assert_eq!(area.last_badge(), Some(Some(1)));
    assert_eq!(poller.store().unread_count(), 1);
}

#[tokio::test]
async fn unread_count_counts_only_unread_entries() {
    let (mut poller, source, _probe, area) = build_poller();

    source.push_batch(vec![notification("1", false), notification("2", true)]);
    poller.tick().await;

    assert_eq!(area.mounted_count(), 1);
    assert_eq!(area.last_badge(), Some(Some(1)));
    assert_eq!(poller.store().unread_count(), 1);
}

#[tokio::test]
async fn mark_all_read_zeroes_badge_and_suppresses_realerts() {
    let (mut poller, source, _probe, area) = build_poller();

    source.push_batch(vec![notification("1", false)]);
    poller.tick().await;
    assert_eq!(area.last_badge(), Some(Some(1)));

    poller.mark_all_read().await.expect("ack should succeed");
    assert_eq!(area.last_badge(), Some(None));
    assert_eq!(poller.store().unread_count(), 0);

    // The server now reports the item read, it must not re-alert.
    source.push_batch(vec![notification("1", true)]);
    poller.tick().await;
    assert_eq!(area.mounted_count(), 1);
    assert_eq!(poller.store().unread_count(), 0);
}

#[tokio::test]
async fn failed_acknowledgement_leaves_state_unchanged() {
    let (mut poller, source, _probe, area) = build_poller();

    source.push_batch(vec![notification("1", false)]);
    poller.tick().await;
    let badge_updates_before = area.badge_count();

    source.ack_should_fail.store(true, Ordering::SeqCst);
    let result = poller.mark_all_read().await;
    assert!(matches!(
        result,
        Err(AppError::AcknowledgementCallFailed(_))
    ));

    // No optimistic mutation: count and badge stay as they were.
    assert_eq!(poller.store().unread_count(), 1);
    assert_eq!(area.badge_count(), badge_updates_before);
}

#[tokio::test]
async fn failed_or_malformed_polls_waste_the_tick_only() {
    let (mut poller, source, _probe, area) = build_poller();

    source.push_batch(vec![notification("1", false)]);
    poller.tick().await;
    assert_eq!(poller.store().unread_count(), 1);

    source.push_response(Err(AppError::MalformedListingPayload(
        "notifications: invalid type".to_string(),
    )));
    poller.tick().await;
    assert_eq!(poller.store().unread_count(), 1);
    assert_eq!(area.mounted_count(), 1);

    source.push_response(Err(AppError::ListingCallFailed(
        "Connection Error : timed out".to_string(),
    )));
    poller.tick().await;
    assert_eq!(poller.store().unread_count(), 1);

    // The next tick retries naturally and picks up new items.
    source.push_batch(vec![notification("1", false), notification("2", false)]);
    poller.tick().await;
    assert_eq!(poller.store().unread_count(), 2);
    assert_eq!(area.mounted_count(), 2);
}

#[tokio::test]
async fn empty_batch_clears_the_badge() {
    let (mut poller, source, _probe, area) = build_poller();

    source.push_batch(vec![notification("1", false)]);
    poller.tick().await;
    assert_eq!(area.last_badge(), Some(Some(1)));

    source.push_batch(vec![]);
    poller.tick().await;
    assert_eq!(area.last_badge(), Some(None));
    assert_eq!(poller.store().unread_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn looper_polls_on_the_interval_and_services_commands() -> anyhow::Result<()> {
    let (poller, source, _probe, area) = build_poller();
    source.push_batch(vec![notification("1", false)]);

    let (command_tx, command_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let looper = tokio::spawn(run_notification_poller(
        poller,
        POLLING_INTERVAL,
        command_rx,
        shutdown_rx,
    ));

    // The first tick fires one full interval after start.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.fetch_count(), 0);

    tokio::time::sleep(POLLING_INTERVAL).await;
    assert_eq!(source.fetch_count(), 1);
    assert_eq!(area.mounted_count(), 1);

    // Disabling stops fetches on subsequent ticks until re-enabled.
    command_tx
        .send(PollerCommand::SetEnabled(false))
        .await
        .expect("looper should be running");
    tokio::time::sleep(POLLING_INTERVAL * 3).await;
    assert_eq!(source.fetch_count(), 1);

    command_tx
        .send(PollerCommand::SetEnabled(true))
        .await
        .expect("looper should be running");
    tokio::time::sleep(POLLING_INTERVAL).await;
    assert_eq!(source.fetch_count(), 2);

    // Acknowledgement is serviced between ticks, independent of the timer.
    let (ack_tx, ack_rx) = oneshot::channel();
    command_tx
        .send(PollerCommand::MarkAllRead(ack_tx))
        .await
        .expect("looper should be running");
    ack_rx
        .await
        .expect("looper should respond")
        .expect("ack should succeed");
    assert_eq!(area.last_badge(), Some(None));

    let _ = shutdown_tx.send(());
    looper.await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn shutdown_dismisses_outstanding_alerts() -> anyhow::Result<()> {
    let (poller, source, _probe, area) = build_poller();
    source.push_batch(vec![notification("1", false)]);

    let (_command_tx, command_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let looper = tokio::spawn(run_notification_poller(
        poller,
        POLLING_INTERVAL,
        command_rx,
        shutdown_rx,
    ));

    tokio::time::sleep(POLLING_INTERVAL + Duration::from_millis(1)).await;
    assert_eq!(area.mounted_count(), 1);
    assert_eq!(area.removed_count(), 0);

    // Shut down before the auto-dismiss delay elapses.
    let _ = shutdown_tx.send(());
    looper.await?;
    assert_eq!(area.removed_count(), 1);
    Ok(())
}
