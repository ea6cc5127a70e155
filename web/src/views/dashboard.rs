use crate::{Route, use_current_user};
use dioxus::prelude::*;
use types::Role;
use ui::PageHeader;

/// Landing page for `role`. Visiting another role's dashboard sends the
/// user back to their own.
#[component]
pub fn RoleDashboard(role: Role) -> Element {
    let user = use_current_user();

    if user.role != role {
        navigator().replace(Route::dashboard(user.role));
        return rsx! {
            div { class: "loading", "Redirecting..." }
        };
    }

    let subtitle = match &user.service_center_name {
        Some(name) => format!("Signed in as {} at {name}.", role.label()),
        None => format!("Signed in as {}.", role.label()),
    };

    rsx! {
        div {
            PageHeader {
                title: "{role.label()} Dashboard",
                subtitle,
                actions: rsx! {},
            }
            div { class: "dashboard-grid",
                for section in user.sections() {
                    Link {
                        key: "{section:?}",
                        to: Route::section(section),
                        class: "dashboard-card",
                        h3 { class: "dashboard-card-title", "{section.title()}" }
                        p { class: "dashboard-card-desc", "{section.description()}" }
                    }
                }
            }
        }
    }
}
