//! Session roles and the dashboard each one lands on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid role: {0:?}")]
    InvalidRole(String),
    #[error("missing station assignment for role {0}")]
    MissingStation(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SuperAdmin,
    Admin,
    ServiceCenterAdmin,
    Cashier,
    DataOperator,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::ServiceCenterAdmin,
        Role::Cashier,
        Role::DataOperator,
    ];

    /// Roles allowed to manage users and service centers.
    pub const ADMINS: &[Role] = &[Role::SuperAdmin, Role::Admin];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name.trim())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id().to_string() == id.trim())
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::ServiceCenterAdmin => "ServiceCenterAdmin",
            Role::Cashier => "Cashier",
            Role::DataOperator => "DataOperator",
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Role::SuperAdmin => 1,
            Role::Admin => 2,
            Role::ServiceCenterAdmin => 3,
            Role::Cashier => 4,
            Role::DataOperator => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::ServiceCenterAdmin => "Service Center Admin",
            Role::Cashier => "Cashier",
            Role::DataOperator => "Data Operator",
        }
    }

    /// Roles that only make sense with a station (service center) attached.
    pub fn is_station_scoped(self) -> bool {
        matches!(
            self,
            Role::ServiceCenterAdmin | Role::Cashier | Role::DataOperator
        )
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::SuperAdmin => "/super-admin/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::ServiceCenterAdmin => "/service-center/dashboard",
            Role::Cashier => "/cashier/dashboard",
            Role::DataOperator => "/data-operator/dashboard",
        }
    }

    /// Resolve a role from the stored name, falling back to the numeric id
    /// when the name is absent or empty.
    pub fn resolve(name: Option<&str>, id: Option<&str>) -> Result<Self, RouteError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Self::from_name(name).ok_or_else(|| RouteError::InvalidRole(name.into())),
            None => {
                let id = id.map(str::trim).unwrap_or_default();
                Self::from_id(id).ok_or_else(|| RouteError::InvalidRole(id.into()))
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Landing route for a session, given its role name, role id and station.
pub fn dashboard_path(
    role_name: Option<&str>,
    role_id: Option<&str>,
    station_id: Option<&str>,
) -> Result<&'static str, RouteError> {
    let role = Role::resolve(role_name, role_id)?;

    let has_station = station_id.is_some_and(|s| !s.trim().is_empty());
    if role.is_station_scoped() && !has_station {
        return Err(RouteError::MissingStation(role));
    }

    Ok(role.dashboard_path())
}
