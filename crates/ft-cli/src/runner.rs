use crate::{
    booking_commands::{self, BookingCommands},
    cli::Cli,
    commands::Commands,
    error::{CliError, Result as CliErrorResult},
    notification_commands::NotificationCommands,
};

use ft_auth::TokenStore;
use ft_client::ApiClient;
use ft_config::Config;
use ft_core::Role;
use ft_store::{App, LogNavigator, Navigator, Route, Session, StoreError};

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde_json::{Value, json};

/// Executes one parsed command against the API and returns its JSON output.
pub struct Runner {
    api: Arc<ApiClient>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    config: Config,
}

impl Runner {
    /// `--server` wins over `api.base_url` from the config.
    pub fn new(
        config: Config,
        server: Option<&str>,
        tokens: Arc<dyn TokenStore>,
    ) -> CliErrorResult<Self> {
        let base_url = server.unwrap_or(&config.api.base_url);
        let timeout = Duration::from_secs(config.api.timeout_secs);
        let api = Arc::new(ApiClient::with_timeout(base_url, timeout)?);
        debug!("Using API at {}", api.base_url);

        Ok(Self {
            api,
            tokens,
            navigator: Arc::new(LogNavigator),
            config,
        })
    }

    pub async fn run(&self, command: Commands) -> CliErrorResult<Value> {
        match command {
            Commands::Login { email, password } => {
                let session = self.session();
                let route = session.login(&email, &password).await?;
                Ok(Self::session_output(&session, route))
            }
            Commands::Register {
                name,
                email,
                password,
                role,
            } => {
                let role = Role::from_str(&role)?;
                let session = self.session();
                let route = session.register(&name, &email, &password, role).await?;
                Ok(Self::session_output(&session, route))
            }
            Commands::Logout => {
                let session = self.session();
                session.restore().await;
                let route = session.logout().await;
                Ok(json!({ "route": route.path() }))
            }
            Commands::ForgotPassword { email } => {
                self.session().forgot_password(&email).await?;
                Ok(json!({ "success": true }))
            }
            Commands::ResetPassword { token, password } => {
                let route = self.session().reset_password(&token, &password).await?;
                Ok(json!({ "success": true, "route": route.path() }))
            }
            Commands::Whoami => {
                let session = self.session();
                let identity = session.restore().await;
                Ok(json!({
                    "authenticated": identity.is_some(),
                    "user": identity,
                }))
            }
            Commands::Booking { action } => self.run_booking(action).await,
            Commands::Notification { action } => self.run_notification(action).await,
        }
    }

    async fn run_booking(&self, action: BookingCommands) -> CliErrorResult<Value> {
        let app = self.mount().await?;
        let bookings = &app.bookings;

        match action {
            BookingCommands::List => {
                Self::check_loaded(bookings.error())?;
                Ok(serde_json::to_value(bookings.bookings())?)
            }
            BookingCommands::Get { id } => {
                Self::check_loaded(bookings.error())?;
                let booking = bookings
                    .get_by_id(&id)
                    .ok_or_else(|| CliError::not_found(format!("Booking {id} not found")))?;
                Ok(serde_json::to_value(booking)?)
            }
            BookingCommands::Create {
                trainer_id,
                date,
                start_time,
                end_time,
                details,
            } => {
                let patch =
                    booking_commands::create_patch(trainer_id, date, start_time, end_time, details);
                let booking = bookings.create(&patch).await?;
                Ok(serde_json::to_value(booking)?)
            }
            BookingCommands::Update {
                id,
                date,
                start_time,
                end_time,
                status,
                details,
            } => {
                let patch =
                    booking_commands::update_patch(date, start_time, end_time, status, details);
                if patch.is_empty() {
                    return Err(CliError::empty_update());
                }
                bookings.update(&id, &patch).await?;
                match bookings.get_by_id(&id) {
                    Some(booking) => Ok(serde_json::to_value(booking)?),
                    None => Ok(serde_json::to_value(patch)?),
                }
            }
            BookingCommands::Cancel { id } => {
                bookings.cancel(&id).await?;
                Ok(json!({ "success": true, "id": id }))
            }
        }
    }

    async fn run_notification(&self, action: NotificationCommands) -> CliErrorResult<Value> {
        let app = self.mount().await?;
        let notifications = &app.notifications;

        match action {
            NotificationCommands::List => {
                Self::check_loaded(notifications.error())?;
                Ok(serde_json::to_value(notifications.notifications())?)
            }
            NotificationCommands::UnreadCount => {
                Self::check_loaded(notifications.error())?;
                Ok(json!({ "unread": notifications.unread_count() }))
            }
            NotificationCommands::Read { id } => {
                notifications.mark_as_read(&id).await?;
                Ok(json!({ "success": true, "unread": notifications.unread_count() }))
            }
            NotificationCommands::ReadAll => {
                notifications.mark_all_as_read().await?;
                Ok(json!({ "success": true, "unread": notifications.unread_count() }))
            }
            NotificationCommands::Delete { id } => {
                notifications.delete(&id).await?;
                Ok(json!({ "success": true, "unread": notifications.unread_count() }))
            }
        }
    }

    fn session(&self) -> Session {
        Session::new(
            self.api.clone(),
            self.tokens.clone(),
            self.navigator.clone(),
        )
    }

    /// Restore the persisted session and fill both caches. Fails when there
    /// is no usable session.
    async fn mount(&self) -> CliErrorResult<App> {
        let app = App::mount(
            self.api.clone(),
            self.tokens.clone(),
            self.navigator.clone(),
            &self.config.stores,
        )
        .await;

        if !app.session.ensure_fresh().await {
            return Err(StoreError::not_authenticated().into());
        }

        Ok(app)
    }

    /// Surface a failed initial fetch instead of printing an empty list.
    fn check_loaded(error: Option<String>) -> CliErrorResult<()> {
        match error {
            Some(message) => Err(CliError::Request { message }),
            None => Ok(()),
        }
    }

    fn session_output(session: &Session, route: Route) -> Value {
        json!({
            "route": route.path(),
            "user": session.identity(),
        })
    }
}

/// Run the parsed command line against the configured API.
pub async fn run(cli: Cli, config: Config, tokens: Arc<dyn TokenStore>) -> CliErrorResult<Value> {
    let runner = Runner::new(config, cli.server.as_deref(), tokens)?;
    runner.run(cli.command).await
}
