use crate::{BookingCache, Navigator, NotificationCache, Route, Session};

use ft_auth::TokenStore;
use ft_client::ApiClient;
use ft_config::StoresConfig;

use std::sync::Arc;

use log::{info, warn};
use tokio::task::JoinHandle;

/// The session store and both entity caches, wired together.
///
/// Views receive this (or one of its parts) explicitly instead of looking
/// stores up from ambient context.
pub struct App {
    pub session: Arc<Session>,
    pub bookings: Arc<BookingCache>,
    pub notifications: Arc<NotificationCache>,
    clear_on_logout: bool,
}

impl App {
    /// Build the stores and restore any persisted session.
    ///
    /// The session is mounted first because both caches key off its
    /// identity. When a session was restored, the caches are filled before
    /// returning; fetch failures are left in each cache's error slot.
    pub async fn mount(
        api: Arc<ApiClient>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        config: &StoresConfig,
    ) -> Self {
        let session = Arc::new(Session::new(api.clone(), tokens, navigator));
        let restored = session.restore().await;

        let bookings = Arc::new(BookingCache::new(api.clone(), session.subscribe()));
        let notifications = Arc::new(NotificationCache::new(api, session.subscribe()));

        let app = Self {
            session,
            bookings,
            notifications,
            clear_on_logout: config.clear_on_logout,
        };

        if restored.is_some() {
            app.refresh().await;
        }

        app
    }

    /// Fetch both collections for the current identity.
    pub async fn refresh(&self) {
        let (bookings, notifications) =
            tokio::join!(self.bookings.fetch(), self.notifications.fetch());

        if let Err(e) = bookings {
            warn!("Initial booking fetch failed: {e}");
        }
        if let Err(e) = notifications {
            warn!("Initial notification fetch failed: {e}");
        }
    }

    /// Keep both caches in step with later logins and logouts.
    pub fn spawn_identity_sync(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.bookings.clone().spawn_identity_sync(self.clear_on_logout),
            self.notifications
                .clone()
                .spawn_identity_sync(self.clear_on_logout),
        ]
    }

    /// End the session and, unless configured otherwise, drop cached data
    /// right away rather than waiting for the sync tasks.
    pub async fn logout(&self) -> Route {
        let route = self.session.logout().await;

        if self.clear_on_logout {
            self.bookings.clear();
            self.notifications.clear();
            info!("Cleared cached bookings and notifications");
        }

        route
    }
}
