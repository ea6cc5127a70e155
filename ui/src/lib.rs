//! Presentational building blocks shared by the console pages.

mod feedback;
mod modal;
mod table;

pub use feedback::{Badge, BadgeVariant, ProgressBar, StarRating, Toggle};
pub use modal::Modal;
pub use table::{Pagination, SortableHeader};

use dioxus::prelude::*;

#[component]
pub fn Loading(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "loading", "{label}" }
    }
}

#[component]
pub fn PageHeader(
    title: String,
    #[props(default)] subtitle: Option<String>,
    actions: Element,
) -> Element {
    rsx! {
        div { class: "page-header",
            div { class: "page-header-content",
                h1 { class: "page-title", "{title}" }
                if let Some(subtitle) = subtitle {
                    p { class: "page-subtitle", "{subtitle}" }
                }
            }
            div { class: "page-header-actions", {actions} }
        }
    }
}

#[component]
pub fn EmptyState(message: String) -> Element {
    rsx! {
        p { class: "text-muted empty-state", "{message}" }
    }
}
