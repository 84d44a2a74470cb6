use ft_core::{BookingPatch, BookingStatus};

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// List bookings (trainers see the sessions they run)
    List,

    /// Get a booking by ID
    Get {
        /// Booking ID
        id: String,
    },

    /// Book a session with a trainer
    Create {
        /// Trainer ID
        #[arg(long)]
        trainer_id: String,

        /// Session date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        start_time: String,

        /// End time (HH:MM)
        #[arg(long)]
        end_time: String,

        #[command(flatten)]
        details: BookingDetails,
    },

    /// Update a booking
    Update {
        /// Booking ID
        id: String,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New start time (HH:MM)
        #[arg(long)]
        start_time: Option<String>,

        /// New end time (HH:MM)
        #[arg(long)]
        end_time: Option<String>,

        /// New status: scheduled, confirmed, completed
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        details: BookingDetails,
    },

    /// Cancel a booking
    Cancel {
        /// Booking ID
        id: String,
    },
}

/// Optional fields shared by create and update.
#[derive(Args, Debug, Default)]
pub struct BookingDetails {
    /// Kind of session (e.g. strength, yoga)
    #[arg(long)]
    pub session_type: Option<String>,

    /// Price of the session
    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl BookingDetails {
    pub fn into_patch(self) -> BookingPatch {
        BookingPatch {
            session_type: self.session_type,
            price: self.price,
            location: self.location,
            notes: self.notes,
            ..Default::default()
        }
    }
}

pub(crate) fn create_patch(
    trainer_id: String,
    date: String,
    start_time: String,
    end_time: String,
    details: BookingDetails,
) -> BookingPatch {
    BookingPatch {
        trainer_id: Some(trainer_id),
        date: Some(date),
        start_time: Some(start_time),
        end_time: Some(end_time),
        ..details.into_patch()
    }
}

pub(crate) fn update_patch(
    date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    status: Option<String>,
    details: BookingDetails,
) -> BookingPatch {
    BookingPatch {
        date,
        start_time,
        end_time,
        status: status.map(BookingStatus::from),
        ..details.into_patch()
    }
}
