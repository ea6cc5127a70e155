use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Cookie keys holding the session flags.
pub mod cookie_keys {
    pub const USER_ID: &str = "userId";
    pub const USER_ROLE: &str = "userRole";
    pub const USER_ROLE_ID: &str = "userRoleId";
    pub const STATION_ID: &str = "station_id";
    pub const SERVICE_CENTER_NAME: &str = "serviceCenterName";
    pub const TOKEN: &str = "token";
    /// HMAC over the other flags.
    pub const SIGNATURE: &str = "session_sig";

    pub const ALL: [&str; 7] = [
        USER_ID,
        USER_ROLE,
        USER_ROLE_ID,
        STATION_ID,
        SERVICE_CENTER_NAME,
        TOKEN,
        SIGNATURE,
    ];
}

/// localStorage key for the "remember me" email on the login page.
pub const REMEMBERED_EMAIL_KEY: &str = "rememberedEmail";

/// The parts of a session that are safe to hand to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub role: Role,
    pub station_id: Option<Uuid>,
    pub service_center_name: Option<String>,
}

impl CurrentUser {
    pub fn can_access(&self, section: Section) -> bool {
        section.allowed_roles().contains(&self.role)
    }

    pub fn sections(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL.into_iter().filter(|s| self.can_access(*s))
    }
}

/// The areas of the console, each gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Users,
    ServiceCenters,
    Appointments,
    Feedback,
    Loyalty,
    Services,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Users,
        Section::ServiceCenters,
        Section::Appointments,
        Section::Feedback,
        Section::Loyalty,
        Section::Services,
    ];

    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Section::Users | Section::ServiceCenters => Role::ADMINS,
            Section::Appointments => &[Role::ServiceCenterAdmin, Role::Cashier, Role::DataOperator],
            Section::Feedback => &[Role::ServiceCenterAdmin],
            Section::Loyalty => &[Role::ServiceCenterAdmin, Role::Cashier],
            Section::Services => &[Role::ServiceCenterAdmin, Role::DataOperator],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Users => "Users",
            Section::ServiceCenters => "Service Centers",
            Section::Appointments => "Appointments",
            Section::Feedback => "Feedback",
            Section::Loyalty => "Loyalty Points",
            Section::Services => "Services",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Section::Users => "Create, edit and remove console users.",
            Section::ServiceCenters => "Onboard service centers and review their details.",
            Section::Appointments => "Upcoming and past bookings for your service center.",
            Section::Feedback => "What customers say about your service center.",
            Section::Loyalty => "Customer point balances and tier progress.",
            Section::Services => "Switch services on or off for booking.",
        }
    }
}
