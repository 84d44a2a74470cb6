pub mod booking;
pub mod booking_patch;
pub mod booking_status;
pub mod identity;
mod lenient;
pub mod notification;
pub mod role;
