use crate::{Route, use_error};
use dioxus::prelude::*;
use types::{
    models::{ServiceCenter, ServiceCenterColumn},
    table::{Page, SortState, paginate, sort_rows},
};
use ui::{Badge, BadgeVariant, EmptyState, Loading, PageHeader, Pagination, SortableHeader, Toggle};
use uuid::Uuid;

fn status_badge(active: bool) -> (String, BadgeVariant) {
    if active {
        ("Active".to_string(), BadgeVariant::Success)
    } else {
        ("Inactive".to_string(), BadgeVariant::Neutral)
    }
}

#[component]
pub fn ServiceCenters(center_id: ReadSignal<Option<Uuid>>) -> Element {
    let mut centers = use_signal(Vec::<ServiceCenter>::new);
    let mut loading = use_signal(|| true);
    let mut error_state = use_error();
    let mut sort = use_signal(|| SortState::new(ServiceCenterColumn::Name));
    let mut page = use_signal(Page::default);

    use_effect(move || {
        spawn(async move {
            loading.set(true);
            match api::list_service_centers().await {
                Ok(c) => centers.set(c),
                Err(e) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    });

    let sorted = use_memo(move || {
        let mut rows = centers.read().clone();
        sort_rows(&mut rows, sort());
        rows
    });

    let selected = use_memo(move || {
        center_id().and_then(|id| centers.read().iter().find(|c| c.id == id).cloned())
    });

    let mut on_sort = move |column: ServiceCenterColumn| {
        sort.write().toggle(column);
        page.set(Page::first(page().size));
    };

    let visible = paginate(&sorted.read(), page()).to_vec();

    rsx! {
        div {
            PageHeader {
                title: "Service Centers",
                subtitle: "Registered service centers and their status.",
                actions: rsx! {
                    Link { to: Route::ServiceCenterNew { error: None }, class: "btn btn-primary", "Register Service Center" }
                },
            }

            if loading() {
                Loading { label: "Loading service centers..." }
            } else {
                div { class: "grid grid-cols-3",
                    div { class: "card",
                        div { class: "card-header",
                            h2 { class: "card-title", "Service Centers" }
                        }
                        if sorted.read().is_empty() {
                            EmptyState { message: "No service centers registered." }
                        } else {
                            div { class: "table-container",
                                table {
                                    thead {
                                        tr {
                                            SortableHeader {
                                                label: "Name",
                                                direction: sort.read().direction_for(ServiceCenterColumn::Name),
                                                on_sort: move |_| on_sort(ServiceCenterColumn::Name),
                                            }
                                            SortableHeader {
                                                label: "Owner",
                                                direction: sort.read().direction_for(ServiceCenterColumn::Owner),
                                                on_sort: move |_| on_sort(ServiceCenterColumn::Owner),
                                            }
                                            SortableHeader {
                                                label: "Address",
                                                direction: sort.read().direction_for(ServiceCenterColumn::Address),
                                                on_sort: move |_| on_sort(ServiceCenterColumn::Address),
                                            }
                                            SortableHeader {
                                                label: "Status",
                                                direction: sort.read().direction_for(ServiceCenterColumn::Status),
                                                on_sort: move |_| on_sort(ServiceCenterColumn::Status),
                                            }
                                        }
                                    }
                                    tbody {
                                        for center in visible {
                                            {
                                                let id = center.id;
                                                let (status, variant) = status_badge(center.is_active);
                                                rsx! {
                                                    tr {
                                                        key: "{id}",
                                                        class: if center_id() == Some(id) { "selected" },
                                                        onclick: move |_| {
                                                            navigator().replace(Route::service_center_detail(id));
                                                        },
                                                        td { "{center.name}" }
                                                        td { "{center.owner_name}" }
                                                        td { "{center.address}" }
                                                        td { Badge { label: status, variant } }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                            Pagination {
                                page: page(),
                                len: sorted.read().len(),
                                on_change: move |p| page.set(p),
                            }
                        }
                    }
                    if let Some(center) = selected() {
                        CenterDetailsCard {
                            center,
                            on_status_changed: move |(id, active): (Uuid, bool)| {
                                if let Some(c) = centers.write().iter_mut().find(|c| c.id == id) {
                                    c.is_active = active;
                                }
                            },
                        }
                    } else if let Some(id) = center_id() {
                        MissingCenter { id }
                    }
                }
            }
        }
    }
}

/// A center that is not in the loaded list yet, e.g. one registered a
/// moment ago.
#[component]
fn MissingCenter(id: Uuid) -> Element {
    let mut error_state = use_error();
    let mut center = use_signal(|| None::<ServiceCenter>);

    use_effect(use_reactive!(|id| {
        spawn(async move {
            match api::get_service_center(id).await {
                Ok(c) => center.set(Some(c)),
                Err(e) => error_state.set_server_error(&e),
            }
        });
    }));

    match center() {
        Some(c) => rsx! {
            CenterDetailsCard {
                center: c,
                on_status_changed: move |(_, active): (Uuid, bool)| {
                    if let Some(c) = center.write().as_mut() {
                        c.is_active = active;
                    }
                },
            }
        },
        None => rsx! {
            div { class: "card",
                div { class: "card-body",
                    Loading { label: "Loading service center..." }
                    Link { to: Route::service_centers(), class: "btn btn-link", "Back to list" }
                }
            }
        },
    }
}

#[component]
fn CenterDetailsCard(center: ServiceCenter, on_status_changed: EventHandler<(Uuid, bool)>) -> Element {
    let mut error_state = use_error();
    let mut updating = use_signal(|| false);

    let id = center.id;
    let active = center.is_active;
    let status_label = match (updating(), active) {
        (true, _) => "Updating...",
        (false, true) => "Active",
        (false, false) => "Inactive",
    };

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "{center.name}" }
            }
            div { class: "card-body",
                if let Some(photo) = &center.photo_url {
                    img { class: "center-photo", src: "{photo}", alt: "{center.name}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Owner" }
                    div { class: "form-value", "{center.owner_name}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Address" }
                    div { class: "form-value", "{center.address}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Contact" }
                    div { class: "form-value", "{center.contact_number} · {center.email}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Opening Hours" }
                    div { class: "form-value", "{center.hours()}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "VAT Number" }
                    div { class: "form-value form-value-mono", "{center.vat_number}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Registration Number" }
                    div { class: "form-value form-value-mono", "{center.registration_number}" }
                }

                div { class: "divider" }

                h3 { class: "section-header", "Documents" }
                if center.document_urls.is_empty() {
                    p { class: "text-muted", "No documents uploaded" }
                } else {
                    ul { class: "file-list",
                        for (i, url) in center.document_urls.iter().enumerate() {
                            li { key: "{i}", class: "file-list-item",
                                a { href: "{url}", target: "_blank", rel: "noopener",
                                    {url.path_segments().and_then(|mut s| s.next_back()).unwrap_or("document").to_string()}
                                }
                            }
                        }
                    }
                }

                div { class: "divider" }

                h3 { class: "section-header", "Status" }
                Toggle {
                    checked: active,
                    disabled: updating(),
                    label: status_label.to_string(),
                    on_toggle: move |_| {
                        spawn(async move {
                            updating.set(true);
                            match api::set_service_center_status(id, !active).await {
                                Ok(()) => on_status_changed.call((id, !active)),
                                Err(e) => error_state.set_server_error(&e),
                            }
                            updating.set(false);
                        });
                    },
                }
            }
        }
    }
}
