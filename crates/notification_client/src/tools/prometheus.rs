/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use prometheus::{opts, register_histogram_vec, register_int_counter, HistogramVec, IntCounter};

pub static CALL_EXTERNAL_API: once_cell::sync::Lazy<HistogramVec> =
    once_cell::sync::Lazy::new(|| {
        register_histogram_vec!(
            opts!("external_request_duration", "Call external API requests").into(),
            &["method", "host", "service", "status"]
        )
        .expect("Failed to register call external API metrics")
    });

pub static POLLED_BATCHES: once_cell::sync::Lazy<IntCounter> = once_cell::sync::Lazy::new(|| {
    register_int_counter!("polled_batches", "Polled Batches")
        .expect("Failed to register polled batches metrics")
});

pub static TOTAL_NOTIFICATIONS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("total_notifications", "Total Notifications")
            .expect("Failed to register total notifications metrics")
    });

pub static ALERTED_NOTIFICATIONS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("alerted_notifications", "Alerted Notifications")
            .expect("Failed to register alerted notifications metrics")
    });

pub static SUPPRESSED_ALERTS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("suppressed_alerts", "Suppressed Alerts")
            .expect("Failed to register suppressed alerts metrics")
    });

pub static ACKNOWLEDGEMENTS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("acknowledgements", "Acknowledgements")
            .expect("Failed to register acknowledgements metrics")
    });

#[macro_export]
macro_rules! call_external_api {
    ($method:expr, $host:expr, $service:expr, $status:expr, $start:expr) => {
        let duration = $start.elapsed().as_secs_f64();
        $crate::tools::prometheus::CALL_EXTERNAL_API
            .with_label_values(&[$method, $host, $service, $status])
            .observe(duration);
    };
}
