//! Client-side state for FitTribe: the session store and the entity caches
//! that mirror the current user's bookings and notifications.

pub mod app;
pub mod booking_cache;
pub mod error;
pub mod navigator;
pub mod notification_cache;
pub mod route;
pub mod session;
pub mod status;


pub use app::App;
pub use booking_cache::BookingCache;
pub use error::{Result as StoreResult, StoreError};
pub use navigator::{LogNavigator, Navigator, RecordingNavigator};
pub use notification_cache::NotificationCache;
pub use route::Route;
pub use session::Session;
pub use status::{InFlight, StoreStatus};
