use crate::{StoreError, StoreResult, StoreStatus};

use ft_client::{ApiClient, ClientError};
use ft_core::{Booking, BookingPatch, Identity};

use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const FETCH_FAILED: &str = "Failed to fetch bookings";
const CREATE_FAILED: &str = "Failed to create booking";
const UPDATE_FAILED: &str = "Failed to update booking";
const CANCEL_FAILED: &str = "Failed to cancel booking";

#[derive(Debug, Default)]
struct Listing {
    /// Identity the items were fetched for
    owner: Option<String>,
    items: Vec<Booking>,
}

impl Listing {
    fn owned_by(&self, id: Option<&str>) -> bool {
        id.is_some() && self.owner.as_deref() == id
    }
}

/// Local mirror of the current user's bookings.
///
/// Writes patch the local copy from the response instead of re-fetching.
/// Items kept across a logout stay hidden unless their owner is the one
/// logged in.
pub struct BookingCache {
    api: Arc<ApiClient>,
    identity: watch::Receiver<Option<Identity>>,
    bookings: RwLock<Listing>,
    status: StoreStatus,
}

impl BookingCache {
    pub fn new(api: Arc<ApiClient>, identity: watch::Receiver<Option<Identity>>) -> Self {
        Self {
            api,
            identity,
            bookings: RwLock::new(Listing::default()),
            status: StoreStatus::new(),
        }
    }

    /// Snapshot of the current user's cached bookings.
    pub fn bookings(&self) -> Vec<Booking> {
        self.visible(|items| items.to_vec())
    }

    pub fn get_by_id(&self, id: &str) -> Option<Booking> {
        self.visible(|items| items.iter().find(|b| b.id == id).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }

    pub fn clear(&self) {
        *self.bookings.write().unwrap_or_else(|e| e.into_inner()) = Listing::default();
        self.status.set_error(None);
    }

    /// Fetch the view that matches the current role: trainers see the
    /// sessions they run, everyone else the sessions they booked.
    pub async fn fetch(&self) -> StoreResult<()> {
        match self.current_identity() {
            Some(identity) if identity.is_trainer() => self.fetch_trainer_bookings().await,
            Some(_) => self.fetch_user_bookings().await,
            None => Ok(()),
        }
    }

    /// No-op while anonymous.
    pub async fn fetch_user_bookings(&self) -> StoreResult<()> {
        let Some(identity) = self.current_identity() else {
            return Ok(());
        };

        let _in_flight = self.status.begin();
        let result = self.api.list_user_bookings().await;
        self.replace_all(&identity, result)
    }

    /// No-op unless the current identity is a trainer.
    pub async fn fetch_trainer_bookings(&self) -> StoreResult<()> {
        let Some(identity) = self.current_identity().filter(Identity::is_trainer) else {
            return Ok(());
        };

        let _in_flight = self.status.begin();
        let result = self.api.list_trainer_bookings().await;
        self.replace_all(&identity, result)
    }

    /// Create a booking and append the server's copy.
    pub async fn create(&self, data: &BookingPatch) -> StoreResult<Booking> {
        let identity = self.require_identity()?;
        let _in_flight = self.status.begin();

        let booking = self
            .api
            .create_booking(data)
            .await
            .map_err(|e| self.fail(e, CREATE_FAILED))?;

        if self.owned_by(&identity) {
            let mut listing = self.bookings.write().unwrap_or_else(|e| e.into_inner());
            if !listing.owned_by(Some(&identity.id)) {
                *listing = Listing {
                    owner: Some(identity.id.clone()),
                    items: Vec::new(),
                };
            }
            listing.items.push(booking.clone());
        }

        info!("Created booking {}", booking.id);
        Ok(booking)
    }

    /// Update a booking and merge the response into the cached entry.
    /// Returns the fields the server sent back.
    pub async fn update(&self, id: &str, data: &BookingPatch) -> StoreResult<BookingPatch> {
        self.require_identity()?;
        let _in_flight = self.status.begin();

        let response = self
            .api
            .update_booking(id, data)
            .await
            .map_err(|e| self.fail(e, UPDATE_FAILED))?;

        self.patch(id, |booking| booking.apply(&response));
        Ok(response)
    }

    /// Cancel a booking and mark the cached entry cancelled.
    pub async fn cancel(&self, id: &str) -> StoreResult<()> {
        self.require_identity()?;
        let _in_flight = self.status.begin();

        self.api
            .cancel_booking(id)
            .await
            .map_err(|e| self.fail(e, CANCEL_FAILED))?;

        self.patch(id, Booking::cancel);
        info!("Cancelled booking {}", id);
        Ok(())
    }

    /// Follow identity changes: refetch for a new identity, and when
    /// `clear_on_logout` is set, empty the cache once nobody is logged in.
    pub fn spawn_identity_sync(self: Arc<Self>, clear_on_logout: bool) -> JoinHandle<()> {
        let mut identity = self.identity.clone();
        tokio::spawn(async move {
            while identity.changed().await.is_ok() {
                let logged_in = identity.borrow_and_update().is_some();
                if logged_in {
                    if let Err(e) = self.fetch().await {
                        warn!("Booking refresh after login failed: {e}");
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

    /// Run `f` over the items, or over nothing when they belong to someone
    /// other than the current identity.
    fn visible<R>(&self, f: impl FnOnce(&[Booking]) -> R) -> R {
        let current = self.current_id();
        let listing = self.bookings.read().unwrap_or_else(|e| e.into_inner());
        if listing.owned_by(current.as_deref()) {
            f(&listing.items)
        } else {
            f(&[])
        }
    }

    #[track_caller]
    fn require_identity(&self) -> StoreResult<Identity> {
        self.current_identity()
            .ok_or_else(StoreError::not_authenticated)
    }

    /// Whether `identity` is still the one logged in.
    fn owned_by(&self, identity: &Identity) -> bool {
        self.identity
            .borrow()
            .as_ref()
            .is_some_and(|current| current.id == identity.id)
    }

    fn replace_all(
        &self,
        identity: &Identity,
        result: Result<Vec<Booking>, ClientError>,
    ) -> StoreResult<()> {
        let bookings = result.map_err(|e| self.fail(e, FETCH_FAILED))?;

        if !self.owned_by(identity) {
            debug!("Dropping bookings fetched for {}: session changed", identity.id);
            return Ok(());
        }

        debug!("Fetched {} bookings", bookings.len());
        *self.bookings.write().unwrap_or_else(|e| e.into_inner()) = Listing {
            owner: Some(identity.id.clone()),
            items: bookings,
        };
        Ok(())
    }

    fn patch(&self, id: &str, f: impl FnOnce(&mut Booking)) {
        let current = self.current_id();
        let mut listing = self.bookings.write().unwrap_or_else(|e| e.into_inner());
        if !listing.owned_by(current.as_deref()) {
            return;
        }
        if let Some(booking) = listing.items.iter_mut().find(|b| b.id == id) {
            f(booking);
        }
    }

    #[track_caller]
    fn fail(&self, source: ClientError, fallback: &str) -> StoreError {
        let err = StoreError::request(source, fallback);
        warn!("{err}");
        self.status.set_error(Some(err.user_message()));
        err
    }
}
