use dioxus::prelude::*;

mod views;

use types::{CurrentUser, Role, Section, format::initials};
use uuid::Uuid;
use views::{
    Appointments, FeedbackList, Login, Loyalty, RegisterServiceCenter, RoleDashboard,
    ServiceCenters, Services, Users,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error")]
    Login { error: Option<String> },
    #[layout(AuthenticatedLayout)]
        #[route("/")]
        Home {},
        #[route("/super-admin/dashboard")]
        SuperAdminDashboard {},
        #[route("/admin/dashboard")]
        AdminDashboard {},
        #[route("/service-center/dashboard")]
        ServiceCenterDashboard {},
        #[route("/cashier/dashboard")]
        CashierDashboard {},
        #[route("/data-operator/dashboard")]
        DataOperatorDashboard {},
        #[route("/users")]
        UserList {},
        #[route("/users/:user_id")]
        UserDetail { user_id: Uuid },
        #[route("/service-centers")]
        ServiceCenterList {},
        #[route("/service-centers/new?:error")]
        ServiceCenterNew { error: Option<String> },
        #[route("/service-centers/:center_id")]
        ServiceCenterDetail { center_id: Uuid },
        #[route("/appointments")]
        AppointmentList {},
        #[route("/feedback")]
        Feedback {},
        #[route("/loyalty")]
        LoyaltyPoints {},
        #[route("/services")]
        ServiceList {},
}

impl Route {
    pub fn users() -> Self {
        Route::UserList {}
    }

    pub fn user_detail(user_id: Uuid) -> Self {
        Route::UserDetail { user_id }
    }

    pub fn service_centers() -> Self {
        Route::ServiceCenterList {}
    }

    pub fn service_center_detail(center_id: Uuid) -> Self {
        Route::ServiceCenterDetail { center_id }
    }

    /// Landing route for a role.
    pub fn dashboard(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Route::SuperAdminDashboard {},
            Role::Admin => Route::AdminDashboard {},
            Role::ServiceCenterAdmin => Route::ServiceCenterDashboard {},
            Role::Cashier => Route::CashierDashboard {},
            Role::DataOperator => Route::DataOperatorDashboard {},
        }
    }

    pub fn section(section: Section) -> Self {
        match section {
            Section::Users => Route::UserList {},
            Section::ServiceCenters => Route::ServiceCenterList {},
            Section::Appointments => Route::AppointmentList {},
            Section::Feedback => Route::Feedback {},
            Section::Loyalty => Route::LoyaltyPoints {},
            Section::Services => Route::ServiceList {},
        }
    }

    /// The section a route belongs to, for highlighting the sidebar.
    fn owning_section(&self) -> Option<Section> {
        match self {
            Route::UserList {} | Route::UserDetail { .. } => Some(Section::Users),
            Route::ServiceCenterList {}
            | Route::ServiceCenterNew { .. }
            | Route::ServiceCenterDetail { .. } => Some(Section::ServiceCenters),
            Route::AppointmentList {} => Some(Section::Appointments),
            Route::Feedback {} => Some(Section::Feedback),
            Route::LoyaltyPoints {} => Some(Section::Loyalty),
            Route::ServiceList {} => Some(Section::Services),
            _ => None,
        }
    }
}

#[component]
fn Home() -> Element {
    let user = use_current_user();
    navigator().replace(Route::dashboard(user.role));
    rsx! {
        div { class: "loading", "Redirecting..." }
    }
}

#[component]
fn SuperAdminDashboard() -> Element {
    rsx! { RoleDashboard { role: Role::SuperAdmin } }
}

#[component]
fn AdminDashboard() -> Element {
    rsx! { RoleDashboard { role: Role::Admin } }
}

#[component]
fn ServiceCenterDashboard() -> Element {
    rsx! { RoleDashboard { role: Role::ServiceCenterAdmin } }
}

#[component]
fn CashierDashboard() -> Element {
    rsx! { RoleDashboard { role: Role::Cashier } }
}

#[component]
fn DataOperatorDashboard() -> Element {
    rsx! { RoleDashboard { role: Role::DataOperator } }
}

#[component]
fn UserList() -> Element {
    rsx! {
        RequireSection { section: Section::Users,
            Users { user_id: None }
        }
    }
}

#[component]
fn UserDetail(user_id: Uuid) -> Element {
    rsx! {
        RequireSection { section: Section::Users,
            Users { user_id: Some(user_id) }
        }
    }
}

#[component]
fn ServiceCenterList() -> Element {
    rsx! {
        RequireSection { section: Section::ServiceCenters,
            ServiceCenters { center_id: None }
        }
    }
}

#[component]
fn ServiceCenterNew(error: Option<String>) -> Element {
    rsx! {
        RequireSection { section: Section::ServiceCenters,
            RegisterServiceCenter { error }
        }
    }
}

#[component]
fn ServiceCenterDetail(center_id: Uuid) -> Element {
    rsx! {
        RequireSection { section: Section::ServiceCenters,
            ServiceCenters { center_id: Some(center_id) }
        }
    }
}

#[component]
fn AppointmentList() -> Element {
    rsx! {
        RequireSection { section: Section::Appointments, Appointments {} }
    }
}

#[component]
fn Feedback() -> Element {
    rsx! {
        RequireSection { section: Section::Feedback, FeedbackList {} }
    }
}

#[component]
fn LoyaltyPoints() -> Element {
    rsx! {
        RequireSection { section: Section::Loyalty, Loyalty {} }
    }
}

#[component]
fn ServiceList() -> Element {
    rsx! {
        RequireSection { section: Section::Services, Services {} }
    }
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move {
            let routes = server::init().await?;

            Ok(dioxus::server::router(App).merge(routes))
        });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Service Center Console" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

#[component]
fn NavLink(to: Route, children: Element) -> Element {
    let current_route: Route = use_route();
    let is_active = match to.owning_section() {
        Some(section) => current_route.owning_section() == Some(section),
        None => current_route == to,
    };

    rsx! {
        Link {
            to,
            class: if is_active { "active" },
            {children}
        }
    }
}

/// Structured error information for display
#[derive(Clone, Debug, Default)]
pub struct ErrorInfo {
    pub message: String,
    pub chain: Vec<String>,
}

impl ErrorInfo {
    /// Parse a ServerFnError to extract structured error info
    pub fn from_server_error(err: &ServerFnError) -> Self {
        match err {
            ServerFnError::ServerError {
                message, details, ..
            } => {
                let chain = details
                    .as_ref()
                    .and_then(|d| d.get("chain"))
                    .and_then(|c| c.as_array())
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect()
                    })
                    .unwrap_or_else(|| vec![message.clone()]);
                Self {
                    message: message.clone(),
                    chain,
                }
            }
            other => Self {
                message: other.to_string(),
                chain: vec![other.to_string()],
            },
        }
    }
}

/// Global error state - use `use_error()` to access
#[derive(Clone, Copy)]
pub struct ErrorState(Signal<Option<ErrorInfo>>);

impl ErrorState {
    pub fn set(&mut self, error: impl Into<String>) {
        let msg = error.into();
        self.0.set(Some(ErrorInfo {
            message: msg.clone(),
            chain: vec![msg],
        }));
    }

    pub fn set_server_error(&mut self, err: &ServerFnError) {
        // Check for 401 (session expired) and redirect to login
        if let ServerFnError::ServerError { code: 401, message, .. } = err {
            let nav = navigator();
            nav.push(Route::Login {
                error: Some(message.clone()),
            });
            return;
        }
        tracing::warn!(%err, "request failed");
        self.0.set(Some(ErrorInfo::from_server_error(err)));
    }

    pub fn clear(&mut self) {
        self.0.set(None);
    }
}

/// Get the global error state for setting/clearing errors
pub fn use_error() -> ErrorState {
    use_context::<ErrorState>()
}

/// The signed-in user, provided by the authenticated layout.
pub fn use_current_user() -> CurrentUser {
    use_context::<CurrentUser>()
}

#[component]
fn ErrorBanner() -> Element {
    let mut error_state = use_context::<ErrorState>();
    let error = error_state.0.read();

    let Some(err) = error.as_ref() else {
        return rsx! {};
    };

    rsx! {
        div { class: "error-banner",
            div { class: "error-banner-content",
                div { class: "error-banner-header",
                    span { class: "error-banner-message", "{err.message}" }
                    div { class: "error-banner-actions",
                        button {
                            class: "error-banner-close",
                            onclick: move |_| error_state.clear(),
                            "×"
                        }
                    }
                }
                if err.chain.len() > 1 {
                    div { class: "error-details",
                        div { class: "error-chain",
                            h4 { class: "error-section-title", "Caused by" }
                            ol { class: "error-chain-list",
                                for (i, msg) in err.chain.iter().enumerate().skip(1) {
                                    li {
                                        key: "{i}",
                                        class: "error-chain-item",
                                        "{msg}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders `children` only when the signed-in role may use `section`.
#[component]
fn RequireSection(section: Section, children: Element) -> Element {
    let user = use_current_user();

    if !user.can_access(section) {
        return rsx! {
            div { class: "card",
                div { class: "card-body",
                    h2 { class: "card-title", "Not available" }
                    p { class: "text-muted",
                        "The {user.role.label()} role does not have access to {section.title()}."
                    }
                    Link { to: Route::dashboard(user.role), class: "btn btn-primary", "Back to dashboard" }
                }
            }
        };
    }

    rsx! { {children} }
}

#[component]
fn AuthenticatedLayout() -> Element {
    let user = use_server_future(api::get_current_user)?;

    match &*user.read() {
        Some(Ok(Some(user))) => rsx! {
            Shell { user: user.clone() }
        },
        Some(Ok(None)) | Some(Err(_)) => {
            let nav = navigator();
            nav.push(Route::Login { error: None });
            rsx! {
                div { class: "loading", "Redirecting to login..." }
            }
        }
        None => {
            rsx! {
                div { class: "loading", "Loading..." }
            }
        }
    }
}

#[component]
fn Shell(user: CurrentUser) -> Element {
    use_context_provider(|| ErrorState(Signal::new(None)));
    use_context_provider(|| user.clone());

    let initial = initials(user.role.label());
    let subtitle = user
        .service_center_name
        .clone()
        .unwrap_or_else(|| "All service centers".to_string());

    rsx! {
        div { class: "app-layout",
            // Sidebar
            aside { class: "sidebar",
                div { class: "sidebar-header",
                    span { class: "sidebar-logo", "Service Console" }
                }
                nav { class: "sidebar-nav",
                    NavLink { to: Route::dashboard(user.role), "Dashboard" }
                    for section in user.sections() {
                        NavLink { key: "{section:?}", to: Route::section(section), "{section.title()}" }
                    }
                }
                div { class: "sidebar-footer",
                    div { class: "sidebar-user",
                        div { class: "sidebar-avatar", "{initial}" }
                        div { class: "sidebar-user-info",
                            div { class: "sidebar-user-name", "{user.role.label()}" }
                            div { class: "sidebar-user-role", "{subtitle}" }
                        }
                    }
                    form { action: "/auth/logout", method: "post",
                        button { r#type: "submit", class: "sidebar-logout", "Sign out" }
                    }
                }
            }
            // Main content
            main { class: "main-content",
                ErrorBanner {}
                Outlet::<Route> {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dashboard_path_is_a_route() {
        for role in Role::ALL {
            let route: Route = role
                .dashboard_path()
                .parse()
                .unwrap_or_else(|_| panic!("{role} dashboard does not parse"));
            assert_eq!(route, Route::dashboard(role));
        }
    }

    #[test]
    fn dashboard_routes_render_back_to_their_paths() {
        for role in Role::ALL {
            assert_eq!(Route::dashboard(role).to_string(), role.dashboard_path());
        }
    }

    #[test]
    fn every_section_has_a_route() {
        for section in Section::ALL {
            assert_eq!(Route::section(section).owning_section(), Some(section));
        }
    }

    #[test]
    fn registration_is_not_mistaken_for_a_detail_page() {
        assert_eq!(
            "/service-centers/new".parse::<Route>().ok(),
            Some(Route::ServiceCenterNew { error: None })
        );
    }

    #[test]
    fn registration_errors_come_back_in_the_query() {
        let route = "/service-centers/new?error=photo%20is%20required".parse::<Route>().ok();
        assert_eq!(
            route,
            Some(Route::ServiceCenterNew {
                error: Some("photo is required".to_string())
            })
        );
    }
}
