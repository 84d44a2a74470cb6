use crate::{StoreError, StoreResult, StoreStatus};

use ft_client::{ApiClient, ClientError};
use ft_core::{Identity, Notification};

use std::sync::{Arc, RwLock};

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const FETCH_FAILED: &str = "Failed to fetch notifications";
const MARK_READ_FAILED: &str = "Failed to mark notification as read";
const MARK_ALL_READ_FAILED: &str = "Failed to mark all notifications as read";
const DELETE_FAILED: &str = "Failed to delete notification";

#[derive(Debug, Default)]
struct Inbox {
    /// Identity the items were fetched for
    owner: Option<String>,
    items: Vec<Notification>,
    unread: usize,
}

impl Inbox {
    fn owned_by(&self, id: Option<&str>) -> bool {
        id.is_some() && self.owner.as_deref() == id
    }
}

/// Local mirror of the current user's notifications with an unread counter.
///
/// The counter is tracked separately from the items and never drops below
/// zero. An inbox kept across a logout reads as empty unless its owner is
/// the one logged in.
pub struct NotificationCache {
    api: Arc<ApiClient>,
    identity: watch::Receiver<Option<Identity>>,
    inbox: RwLock<Inbox>,
    status: StoreStatus,
}

impl NotificationCache {
    pub fn new(api: Arc<ApiClient>, identity: watch::Receiver<Option<Identity>>) -> Self {
        Self {
            api,
            identity,
            inbox: RwLock::new(Inbox::default()),
            status: StoreStatus::new(),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.visible(|inbox| inbox.items.clone()).unwrap_or_default()
    }

    pub fn unread_count(&self) -> usize {
        self.visible(|inbox| inbox.unread).unwrap_or(0)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Notification> {
        self.visible(|inbox| inbox.items.iter().find(|n| n.id == id).cloned())
            .flatten()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }

    pub fn clear(&self) {
        *self.inbox.write().unwrap_or_else(|e| e.into_inner()) = Inbox::default();
        self.status.set_error(None);
    }

    /// Replace the inbox and recount unread items. No-op while anonymous.
    pub async fn fetch(&self) -> StoreResult<()> {
        let Some(identity) = self.current_identity() else {
            return Ok(());
        };

        let _in_flight = self.status.begin();
        let items = self
            .api
            .list_notifications()
            .await
            .map_err(|e| self.fail(e, FETCH_FAILED))?;

        if !self.owned_by(&identity) {
            debug!(
                "Dropping notifications fetched for {}: session changed",
                identity.id
            );
            return Ok(());
        }

        let unread = items.iter().filter(|n| !n.read).count();
        debug!("Fetched {} notifications ({} unread)", items.len(), unread);
        *self.inbox.write().unwrap_or_else(|e| e.into_inner()) = Inbox {
            owner: Some(identity.id.clone()),
            items,
            unread,
        };
        Ok(())
    }

    /// Only a notification that was unread locally lowers the counter.
    pub async fn mark_as_read(&self, id: &str) -> StoreResult<()> {
        self.require_identity()?;
        let _in_flight = self.status.begin();

        self.api
            .mark_notification_read(id)
            .await
            .map_err(|e| self.fail(e, MARK_READ_FAILED))?;

        let current = self.current_id();
        let mut inbox = self.inbox.write().unwrap_or_else(|e| e.into_inner());
        if !inbox.owned_by(current.as_deref()) {
            return Ok(());
        }
        let was_unread = match inbox.items.iter_mut().find(|n| n.id == id) {
            Some(notification) if !notification.read => {
                notification.read = true;
                true
            }
            _ => false,
        };
        if was_unread {
            inbox.unread = inbox.unread.saturating_sub(1);
        }

        Ok(())
    }

    pub async fn mark_all_as_read(&self) -> StoreResult<()> {
        self.require_identity()?;
        let _in_flight = self.status.begin();

        self.api
            .mark_all_notifications_read()
            .await
            .map_err(|e| self.fail(e, MARK_ALL_READ_FAILED))?;

        let current = self.current_id();
        let mut inbox = self.inbox.write().unwrap_or_else(|e| e.into_inner());
        if !inbox.owned_by(current.as_deref()) {
            return Ok(());
        }
        for notification in inbox.items.iter_mut() {
            notification.read = true;
        }
        inbox.unread = 0;

        Ok(())
    }

    /// Deleting an unread notification lowers the counter by one.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.require_identity()?;
        let _in_flight = self.status.begin();

        self.api
            .delete_notification(id)
            .await
            .map_err(|e| self.fail(e, DELETE_FAILED))?;

        let current = self.current_id();
        let mut inbox = self.inbox.write().unwrap_or_else(|e| e.into_inner());
        if !inbox.owned_by(current.as_deref()) {
            return Ok(());
        }
        if let Some(index) = inbox.items.iter().position(|n| n.id == id) {
            let removed = inbox.items.remove(index);
            if !removed.read {
                inbox.unread = inbox.unread.saturating_sub(1);
            }
        }

        Ok(())
    }

    /// Refetch for a new identity; with `clear_on_logout`, empty the inbox
    /// once nobody is logged in.
    pub fn spawn_identity_sync(self: Arc<Self>, clear_on_logout: bool) -> JoinHandle<()> {
        let mut identity = self.identity.clone();
        tokio::spawn(async move {
            while identity.changed().await.is_ok() {
                let logged_in = identity.borrow_and_update().is_some();
                if logged_in {
                    if let Err(e) = self.fetch().await {
                        warn!("Notification refresh after login failed: {e}");
                    }
                } else if clear_on_logout {
                    self.clear();
                }
            }
        })
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    fn current_id(&self) -> Option<String> {
        self.identity.borrow().as_ref().map(|i| i.id.clone())
    }

    /// `None` when the inbox belongs to someone other than the current
    /// identity.
    fn visible<R>(&self, f: impl FnOnce(&Inbox) -> R) -> Option<R> {
        let current = self.current_id();
        let inbox = self.inbox.read().unwrap_or_else(|e| e.into_inner());
        inbox.owned_by(current.as_deref()).then(|| f(&inbox))
    }

    #[track_caller]
    fn require_identity(&self) -> StoreResult<Identity> {
        self.current_identity()
            .ok_or_else(StoreError::not_authenticated)
    }

    fn owned_by(&self, identity: &Identity) -> bool {
        self.identity
            .borrow()
            .as_ref()
            .is_some_and(|current| current.id == identity.id)
    }

    #[track_caller]
    fn fail(&self, source: ClientError, fallback: &str) -> StoreError {
        let err = StoreError::request(source, fallback);
        warn!("{err}");
        self.status.set_error(Some(err.user_message()));
        err
    }
}
