use crate::use_error;
use dioxus::prelude::*;
use types::models::ServiceAvailability;
use ui::{EmptyState, Loading, PageHeader, Toggle};
use uuid::Uuid;

/// Swap the entry for `service_id` with `f(entry)`, returning the previous value.
fn replace_service(
    services: &mut [ServiceAvailability],
    service_id: Uuid,
    f: impl FnOnce(&ServiceAvailability) -> ServiceAvailability,
) -> Option<ServiceAvailability> {
    let slot = services.iter_mut().find(|s| s.service_id == service_id)?;
    let next = f(slot);
    Some(std::mem::replace(slot, next))
}

#[component]
pub fn Services() -> Element {
    let mut services = use_signal(Vec::<ServiceAvailability>::new);
    let mut loading = use_signal(|| true);
    let mut pending = use_signal(Vec::<Uuid>::new);
    let mut error_state = use_error();

    use_effect(move || {
        spawn(async move {
            loading.set(true);
            match api::list_services().await {
                Ok(s) => services.set(s),
                Err(e) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    });

    // Flip locally first and put the old value back if the backend refuses
    let mut toggle = move |service_id: Uuid| {
        let Some(previous) = replace_service(&mut services.write(), service_id, ServiceAvailability::toggled)
        else {
            return;
        };
        pending.write().push(service_id);

        spawn(async move {
            let available = !previous.available;
            if let Err(e) = api::set_service_availability(service_id, available).await {
                tracing::warn!(%service_id, available, "availability update rolled back");
                replace_service(&mut services.write(), service_id, move |_| previous);
                error_state.set_server_error(&e);
            }
            pending.write().retain(|id| *id != service_id);
        });
    };

    let available = services.read().iter().filter(|s| s.available).count();
    let total = services.read().len();
    let rows = services.read().clone();

    rsx! {
        div {
            PageHeader {
                title: "Services",
                subtitle: "Choose which services customers can book at your service center.",
                actions: rsx! {
                    span { class: "text-muted", "{available} of {total} available" }
                },
            }

            if loading() {
                Loading { label: "Loading services..." }
            } else if rows.is_empty() {
                div { class: "card",
                    EmptyState { message: "No services configured." }
                }
            } else {
                div { class: "card",
                    ul { class: "service-list",
                        for service in rows {
                            {
                                let id = service.service_id;
                                let busy = pending.read().contains(&id);
                                let label = if service.available { "Available" } else { "Unavailable" };
                                rsx! {
                                    li { key: "{id}", class: "service-list-item",
                                        div { class: "service-info",
                                            div { class: "service-name", "{service.name}" }
                                            if !service.description.is_empty() {
                                                div { class: "text-muted text-sm", "{service.description}" }
                                            }
                                        }
                                        Toggle {
                                            checked: service.available,
                                            disabled: busy,
                                            label: label.to_string(),
                                            on_toggle: move |_| toggle(id),
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
}
