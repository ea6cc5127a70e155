use dioxus::prelude::*;
use types::format::class_names;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeVariant {
    #[default]
    Neutral,
    Success,
    Warning,
    Danger,
}

impl BadgeVariant {
    fn class(self) -> &'static str {
        match self {
            BadgeVariant::Neutral => "badge-neutral",
            BadgeVariant::Success => "badge-success",
            BadgeVariant::Warning => "badge-warning",
            BadgeVariant::Danger => "badge-danger",
        }
    }
}

#[component]
pub fn Badge(label: String, #[props(default)] variant: BadgeVariant) -> Element {
    rsx! {
        span { class: class_names(["badge", variant.class()]), "{label}" }
    }
}

#[component]
pub fn StarRating(rating: u8, #[props(default = 5)] max: u8) -> Element {
    rsx! {
        span { class: "star-rating", title: "{rating} out of {max}",
            for i in 1..=max {
                span {
                    key: "{i}",
                    class: if i <= rating { "star star-filled" } else { "star" },
                    "★"
                }
            }
        }
    }
}

/// Switch-style checkbox.
#[component]
pub fn Toggle(
    checked: bool,
    #[props(default)] disabled: bool,
    #[props(default)] label: Option<String>,
    on_toggle: EventHandler<()>,
) -> Element {
    rsx! {
        label { class: class_names(["toggle", if disabled { "toggle-disabled" } else { "" }]),
            input {
                r#type: "checkbox",
                checked,
                disabled,
                onchange: move |_| on_toggle.call(()),
            }
            span { class: "toggle-track", span { class: "toggle-thumb" } }
            if let Some(label) = label {
                span { class: "toggle-label", "{label}" }
            }
        }
    }
}

#[component]
pub fn ProgressBar(percent: u8) -> Element {
    let percent = percent.min(100);
    rsx! {
        div { class: "progress",
            div { class: "progress-fill", style: "width: {percent}%" }
        }
    }
}
