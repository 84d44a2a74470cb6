use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// List notifications
    List,

    /// Number of unread notifications
    UnreadCount,

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every notification as read
    ReadAll,

    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
    },
}
