/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fakes::{notification, FakePresentationArea};
use notification_client::{
    capabilities::PermissionGate,
    common::types::PermissionStatus,
    presenter::AlertPresenter,
};
use std::{sync::Arc, time::Duration};

const DISMISS_DELAY: Duration = Duration::from_millis(5000);

fn presenter_with(
    area: Arc<FakePresentationArea>,
    status: PermissionStatus,
) -> AlertPresenter {
    AlertPresenter::new(
        Some(area),
        PermissionGate::resolve(status, || PermissionStatus::Undetermined),
        DISMISS_DELAY,
    )
}

#[tokio::test(start_paused = true)]
async fn alert_auto_dismisses_after_the_fixed_delay() {
    let area = FakePresentationArea::new();
    let presenter = presenter_with(area.clone(), PermissionStatus::Denied);

    let alert_id = presenter.present(&notification("1", false)).await;
    assert!(alert_id.is_some());
    assert_eq!(area.mounted_count(), 1);
    assert_eq!(presenter.active_alert_count().await, 1);

    tokio::time::sleep(DISMISS_DELAY + Duration::from_millis(1)).await;

    assert_eq!(area.removed_count(), 1);
    assert_eq!(presenter.active_alert_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn explicit_dismissal_releases_the_alert_exactly_once() {
    let area = FakePresentationArea::new();
    let presenter = presenter_with(area.clone(), PermissionStatus::Denied);

    let alert_id = presenter
        .present(&notification("1", false))
        .await
        .expect("alert should mount");
    presenter.dismiss(&alert_id).await;

    assert_eq!(area.removed_count(), 1);
    assert_eq!(presenter.active_alert_count().await, 0);

    // The aborted auto-dismiss timer must not remove it a second time.
    tokio::time::sleep(DISMISS_DELAY * 2).await;
    assert_eq!(area.removed_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn simultaneous_alerts_accumulate_without_preemption() {
    let area = FakePresentationArea::new();
    let presenter = presenter_with(area.clone(), PermissionStatus::Denied);

    presenter.present(&notification("1", false)).await;
    presenter.present(&notification("2", false)).await;
    presenter.present(&notification("3", false)).await;

    assert_eq!(area.mounted_count(), 3);
    assert_eq!(presenter.active_alert_count().await, 3);

    tokio::time::sleep(DISMISS_DELAY + Duration::from_millis(1)).await;
    assert_eq!(area.removed_count(), 3);
    assert_eq!(presenter.active_alert_count().await, 0);
}

#[tokio::test]
async fn sound_plays_only_when_permission_was_granted() {
    let granted_area = FakePresentationArea::new();
    let presenter = presenter_with(granted_area.clone(), PermissionStatus::Granted);
    presenter.present(&notification("1", false)).await;
    assert_eq!(granted_area.sound_count(), 1);

    let denied_area = FakePresentationArea::new();
    let presenter = presenter_with(denied_area.clone(), PermissionStatus::Denied);
    presenter.present(&notification("1", false)).await;
    assert_eq!(denied_area.sound_count(), 0);
    // Visual alert unaffected by the missing permission.
    assert_eq!(denied_area.mounted_count(), 1);
}

#[test]
fn undetermined_permission_prompts_exactly_once() {
    let mut prompted = false;
    let gate = PermissionGate::resolve(PermissionStatus::Undetermined, || {
        prompted = true;
        PermissionStatus::Granted
    });
    assert!(prompted);
    assert_eq!(gate.status(), PermissionStatus::Granted);
    assert!(gate.sound_allowed());

    let mut prompted = false;
    let gate = PermissionGate::resolve(PermissionStatus::Denied, || {
        prompted = true;
        PermissionStatus::Granted
    });
    assert!(!prompted);
    assert_eq!(gate.status(), PermissionStatus::Denied);
    assert!(!gate.sound_allowed());
}

#[tokio::test]
async fn absent_presentation_area_makes_alert_and_badge_noops() {
    let presenter = AlertPresenter::new(
        None,
        PermissionGate::resolve(PermissionStatus::Granted, || PermissionStatus::Granted),
        DISMISS_DELAY,
    );

    assert!(presenter.present(&notification("1", false)).await.is_none());
    assert_eq!(presenter.active_alert_count().await, 0);
    presenter.update_badge(5);
    presenter.update_badge(0);
}

#[tokio::test]
async fn badge_shows_when_positive_and_hides_otherwise() {
    let area = FakePresentationArea::new();
    let presenter = presenter_with(area.clone(), PermissionStatus::Denied);

    presenter.update_badge(3);
    presenter.update_badge(3);
    presenter.update_badge(0);

    let badges = area.badges.lock().unwrap().clone();
    assert_eq!(badges, vec![Some(3), Some(3), None]);
}
