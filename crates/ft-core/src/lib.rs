pub mod error;
pub mod models;


pub use error::{CoreError, Result as CoreResult};
pub use models::booking::Booking;
pub use models::booking_patch::BookingPatch;
pub use models::booking_status::BookingStatus;
pub use models::identity::Identity;
pub use models::notification::Notification;
pub use models::role::Role;
