use crate::models::lenient::null_as_default;
use crate::{BookingPatch, BookingStatus};

use serde::{Deserialize, Serialize};

/// A training session between a trainer and a client.
///
/// `id` is assigned by the server. Missing fields in a server payload fall
/// back to their defaults so a sparse response still lands in the cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Booking {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub trainer_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub client_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: BookingStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub session_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
}

impl Booking {
    /// Overlay every field present in `patch` onto this booking.
    pub fn apply(&mut self, patch: &BookingPatch) {
        if let Some(ref id) = patch.id {
            self.id = id.clone();
        }
        if let Some(ref trainer_id) = patch.trainer_id {
            self.trainer_id = trainer_id.clone();
        }
        if let Some(ref client_id) = patch.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(ref date) = patch.date {
            self.date = date.clone();
        }
        if let Some(ref start_time) = patch.start_time {
            self.start_time = start_time.clone();
        }
        if let Some(ref end_time) = patch.end_time {
            self.end_time = end_time.clone();
        }
        if let Some(ref status) = patch.status {
            self.status = status.clone();
        }
        if let Some(ref session_type) = patch.session_type {
            self.session_type = session_type.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(ref location) = patch.location {
            self.location = location.clone();
        }
        if let Some(ref notes) = patch.notes {
            self.notes = notes.clone();
        }
    }

    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }
}
