use dioxus::prelude::*;
use types::format::class_names;

/// Overlay dialog. Clicking the backdrop or the close button calls
/// `on_close` unless `busy` is set.
#[component]
pub fn Modal(
    title: String,
    on_close: EventHandler<()>,
    #[props(default)] small: bool,
    #[props(default)] busy: bool,
    footer: Element,
    children: Element,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| if !busy { on_close.call(()) },
            div { class: class_names(["modal", if small { "modal-sm" } else { "" }]),
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    if !busy {
                        button {
                            class: "modal-close",
                            onclick: move |_| on_close.call(()),
                            "×"
                        }
                    }
                }
                div { class: "modal-body", {children} }
                div { class: "modal-footer", {footer} }
            }
        }
    }
}
