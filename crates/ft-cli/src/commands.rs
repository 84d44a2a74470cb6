use crate::{booking_commands::BookingCommands, notification_commands::NotificationCommands};

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Account role: client, trainer, or admin
        #[arg(long, value_parser = ["client", "trainer", "admin"], default_value = "client")]
        role: String,
    },

    /// End the session and remove the persisted token
    Logout,

    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password using the token from the reset email
    ResetPassword {
        #[arg(long)]
        token: String,

        #[arg(long)]
        password: String,
    },

    /// Show the identity of the persisted session
    Whoami,

    /// Booking operations
    Booking {
        #[command(subcommand)]
        action: BookingCommands,
    },

    /// Notification operations
    Notification {
        #[command(subcommand)]
        action: NotificationCommands,
    },
}
