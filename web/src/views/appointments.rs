use crate::{use_current_user, use_error};
use dioxus::prelude::*;
use types::{
    format::format_date,
    models::{Appointment, AppointmentColumn},
    table::{Page, SortDirection, SortState, paginate, sort_rows},
};
use ui::{Badge, BadgeVariant, EmptyState, Loading, PageHeader, Pagination, SortableHeader};

fn status_variant(status: &str) -> BadgeVariant {
    match status.to_ascii_lowercase().as_str() {
        "completed" | "confirmed" => BadgeVariant::Success,
        "pending" | "in progress" => BadgeVariant::Warning,
        "cancelled" | "canceled" => BadgeVariant::Danger,
        _ => BadgeVariant::Neutral,
    }
}

#[component]
pub fn Appointments() -> Element {
    let user = use_current_user();
    let mut appointments = use_signal(Vec::<Appointment>::new);
    let mut loading = use_signal(|| true);
    let mut error_state = use_error();
    // Most recent first
    let mut sort = use_signal(|| SortState {
        column: AppointmentColumn::Date,
        direction: SortDirection::Descending,
    });
    let mut page = use_signal(Page::default);

    use_effect(move || {
        spawn(async move {
            loading.set(true);
            match api::list_appointments().await {
                Ok(a) => appointments.set(a),
                Err(e) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    });

    let sorted = use_memo(move || {
        let mut rows = appointments.read().clone();
        sort_rows(&mut rows, sort());
        rows
    });

    let mut on_sort = move |column: AppointmentColumn| {
        sort.write().toggle(column);
        page.set(Page::first(page().size));
    };

    let visible = paginate(&sorted.read(), page()).to_vec();
    let subtitle = user
        .service_center_name
        .map(|name| format!("Bookings at {name}."))
        .unwrap_or_else(|| "Bookings at your service center.".to_string());

    rsx! {
        div {
            PageHeader { title: "Appointments", subtitle, actions: rsx! {} }

            if loading() {
                Loading { label: "Loading appointments..." }
            } else if sorted.read().is_empty() {
                div { class: "card",
                    EmptyState { message: "No appointments booked." }
                }
            } else {
                div { class: "card",
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    SortableHeader {
                                        label: "Owner",
                                        direction: sort.read().direction_for(AppointmentColumn::Owner),
                                        on_sort: move |_| on_sort(AppointmentColumn::Owner),
                                    }
                                    SortableHeader {
                                        label: "Date",
                                        direction: sort.read().direction_for(AppointmentColumn::Date),
                                        on_sort: move |_| on_sort(AppointmentColumn::Date),
                                    }
                                    th { "Time" }
                                    SortableHeader {
                                        label: "Vehicle",
                                        direction: sort.read().direction_for(AppointmentColumn::Vehicle),
                                        on_sort: move |_| on_sort(AppointmentColumn::Vehicle),
                                    }
                                    th { "Services" }
                                    SortableHeader {
                                        label: "Status",
                                        direction: sort.read().direction_for(AppointmentColumn::Status),
                                        on_sort: move |_| on_sort(AppointmentColumn::Status),
                                    }
                                }
                            }
                            tbody {
                                for appointment in visible {
                                    tr { key: "{appointment.id}",
                                        td { "{appointment.owner_name}" }
                                        td { "{format_date(appointment.date)}" }
                                        td {
                                            {appointment.time.map(|t| t.strftime("%I:%M %p").to_string()).unwrap_or_else(|| "-".to_string())}
                                        }
                                        td {
                                            div { "{appointment.vehicle_number}" }
                                            div { class: "text-muted text-sm", "{appointment.vehicle_type}" }
                                        }
                                        td { {appointment.services.join(", ")} }
                                        td {
                                            Badge {
                                                variant: status_variant(&appointment.status),
                                                label: appointment.status.clone(),
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
        }
    }
}
