/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{common::types::NotificationListResponse, tools::error::AppError};

/// Decodes the listing payload, reporting the path of the first offending
/// field when the shape is off. Callers log the failure and keep prior state.
pub fn decode_listing_payload(
    payload: serde_json::Value,
) -> Result<NotificationListResponse, AppError> {
    serde_path_to_error::deserialize::<_, NotificationListResponse>(payload)
        .map_err(|err| AppError::MalformedListingPayload(err.to_string()))
}
