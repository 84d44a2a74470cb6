use ft_core::Role;

use serde::Serialize;

/// Navigation targets requested by the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Login,
    Dashboard,
    AdminDashboard,
    TrainerDashboard,
    TrainerOnboarding,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::AdminDashboard => "/admin/dashboard",
            Self::TrainerDashboard => "/trainer/dashboard",
            Self::TrainerOnboarding => "/trainer/onboarding",
        }
    }

    pub fn after_login(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Trainer => Self::TrainerDashboard,
            Role::Client => Self::Dashboard,
        }
    }

    /// New trainers go through onboarding first.
    pub fn after_registration(role: Role) -> Self {
        match role {
            Role::Trainer => Self::TrainerOnboarding,
            Role::Client | Role::Admin => Self::Dashboard,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
