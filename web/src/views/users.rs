use super::components::UserFormFields;
use crate::{Route, use_current_user, use_error};
use dioxus::prelude::*;
use types::{
    models::{ServiceCenter, User, UserColumn, UserForm},
    table::{Page, SortState, paginate, sort_rows, total_pages},
};
use ui::{Badge, EmptyState, Loading, Modal, PageHeader, Pagination, SortableHeader};
use uuid::Uuid;

#[component]
pub fn Users(user_id: ReadSignal<Option<Uuid>>) -> Element {
    let mut users = use_signal(Vec::<User>::new);
    let mut centers = use_signal(Vec::<ServiceCenter>::new);
    let mut loading = use_signal(|| true);
    let mut error_state = use_error();
    let mut show_create_form = use_signal(|| false);
    let mut sort = use_signal(|| SortState::new(UserColumn::Name));
    let mut page = use_signal(Page::default);

    // Fetch users and service centers on mount
    use_effect(move || {
        spawn(async move {
            loading.set(true);

            let users_result = api::list_users().await;
            let centers_result = api::list_service_centers().await;

            match (users_result, centers_result) {
                (Ok(u), Ok(c)) => {
                    users.set(u);
                    centers.set(c);
                }
                (Err(e), _) | (_, Err(e)) => {
                    error_state.set_server_error(&e);
                }
            }
            loading.set(false);
        });
    });

    let sorted = use_memo(move || {
        let mut rows = users.read().clone();
        sort_rows(&mut rows, sort());
        rows
    });

    let selected_user = use_memo(move || {
        user_id().and_then(|id| users.read().iter().find(|u| u.id == id).cloned())
    });

    let refresh_users = move || {
        spawn(async move {
            match api::list_users().await {
                Ok(u) => {
                    let pages = total_pages(u.len(), page().size);
                    users.set(u);
                    page.set(page().clamp(pages));
                }
                Err(e) => error_state.set_server_error(&e),
            }
        });
    };

    let center_name = move |id: Option<Uuid>| {
        id.and_then(|id| centers.read().iter().find(|c| c.id == id).map(|c| c.name.clone()))
    };

    let mut on_sort = move |column: UserColumn| {
        sort.write().toggle(column);
        page.set(Page::first(page().size));
    };

    let visible = paginate(&sorted.read(), page()).to_vec();

    rsx! {
        div {
            PageHeader {
                title: "User Management",
                subtitle: "Create, edit and remove console users.",
                actions: rsx! {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| show_create_form.set(true),
                        "Create User"
                    }
                },
            }

            if show_create_form() {
                UserModal {
                    editing: None,
                    centers: centers.read().clone(),
                    on_close: move |_| show_create_form.set(false),
                    on_saved: move |_| {
                        show_create_form.set(false);
                        refresh_users();
                    },
                }
            }

            if loading() {
                Loading { label: "Loading users..." }
            } else {
                div { class: "grid grid-cols-3",
                    div { class: "card",
                        div { class: "card-header",
                            h2 { class: "card-title", "Users" }
                        }
                        if sorted.read().is_empty() {
                            EmptyState { message: "No users yet." }
                        } else {
                            div { class: "table-container",
                                table {
                                    thead {
                                        tr {
                                            SortableHeader {
                                                label: "Name",
                                                direction: sort.read().direction_for(UserColumn::Name),
                                                on_sort: move |_| on_sort(UserColumn::Name),
                                            }
                                            SortableHeader {
                                                label: "Email",
                                                direction: sort.read().direction_for(UserColumn::Email),
                                                on_sort: move |_| on_sort(UserColumn::Email),
                                            }
                                            SortableHeader {
                                                label: "Role",
                                                direction: sort.read().direction_for(UserColumn::Role),
                                                on_sort: move |_| on_sort(UserColumn::Role),
                                            }
                                        }
                                    }
                                    tbody {
                                        for user in visible {
                                            {
                                                let id = user.id;
                                                let is_selected = user_id() == Some(id);
                                                rsx! {
                                                    tr {
                                                        key: "{id}",
                                                        class: if is_selected { "selected" },
                                                        onclick: move |_| {
                                                            navigator().replace(Route::user_detail(id));
                                                        },
                                                        td { "{user.full_name()}" }
                                                        td { "{user.email}" }
                                                        td { "{user.role.label()}" }
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
                    if let Some(u) = selected_user() {
                        UserDetailsCard {
                            station_name: center_name(u.station_id),
                            user: u,
                            centers: centers.read().clone(),
                            on_updated: move |_| refresh_users(),
                            on_deleted: move |_| {
                                refresh_users();
                                navigator().replace(Route::users());
                            },
                        }
                    } else if let Some(id) = user_id() {
                        UnlistedUser { id, on_deleted: move |_| { navigator().replace(Route::users()); } }
                    }
                }
            }
        }
    }
}

/// A user that is not on the loaded list, looked up by id.
#[component]
fn UnlistedUser(id: Uuid, on_deleted: EventHandler<()>) -> Element {
    let mut error_state = use_error();
    let mut user = use_signal(|| None::<User>);

    let mut load = move |id: Uuid| {
        spawn(async move {
            match api::get_user(id).await {
                Ok(u) => user.set(Some(u)),
                Err(e) => error_state.set_server_error(&e),
            }
        });
    };

    use_effect(use_reactive!(|id| load(id)));

    match user() {
        Some(u) => rsx! {
            UserDetailsCard {
                user: u,
                station_name: None,
                centers: Vec::new(),
                on_updated: move |_| load(id),
                on_deleted,
            }
        },
        None => rsx! {
            Loading { label: "Loading user..." }
        },
    }
}

#[component]
fn UserDetailsCard(
    user: User,
    station_name: Option<String>,
    centers: Vec<ServiceCenter>,
    on_updated: EventHandler<()>,
    on_deleted: EventHandler<()>,
) -> Element {
    let mut error_state = use_error();
    let current = use_current_user();
    let mut show_edit = use_signal(|| false);
    let mut show_delete_confirm = use_signal(|| false);
    let mut deleting = use_signal(|| false);

    let user_id = user.id;
    let is_self = current.user_id == user_id.to_string();

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "User Details" }
                Badge { label: user.role.label().to_string() }
            }
            div { class: "card-body",
                div { class: "form-group",
                    span { class: "form-label", "Name" }
                    div { class: "form-value", "{user.full_name()}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Email" }
                    div { class: "form-value", "{user.email}" }
                }
                if user.role.is_station_scoped() {
                    div { class: "form-group",
                        span { class: "form-label", "Service Center" }
                        div { class: "form-value",
                            {station_name.unwrap_or_else(|| "Unassigned".to_string())}
                        }
                    }
                }
                div { class: "form-group",
                    span { class: "form-label", "ID" }
                    div { class: "form-value form-value-mono", "{user.id}" }
                }

                button {
                    class: "btn btn-secondary",
                    onclick: move |_| show_edit.set(true),
                    "Edit User"
                }

                div { class: "divider" }

                h3 { class: "section-header section-header-danger", "Danger Zone" }
                button {
                    class: "btn btn-danger",
                    disabled: is_self,
                    title: if is_self { "You cannot delete your own account" },
                    onclick: move |_| show_delete_confirm.set(true),
                    "Delete User"
                }
            }
        }

        if show_edit() {
            UserModal {
                editing: Some(user.clone()),
                centers,
                on_close: move |_| show_edit.set(false),
                on_saved: move |_| {
                    show_edit.set(false);
                    on_updated.call(());
                },
            }
        }

        if show_delete_confirm() {
            Modal {
                title: "Delete User",
                small: true,
                busy: deleting(),
                on_close: move |_| show_delete_confirm.set(false),
                footer: rsx! {
                    button {
                        class: "btn btn-secondary",
                        disabled: deleting(),
                        onclick: move |_| show_delete_confirm.set(false),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: deleting(),
                        onclick: move |_| {
                            spawn(async move {
                                deleting.set(true);
                                match api::delete_user(user_id).await {
                                    Ok(()) => on_deleted.call(()),
                                    Err(e) => error_state.set_server_error(&e),
                                }
                                deleting.set(false);
                                show_delete_confirm.set(false);
                            });
                        },
                        if deleting() { "Deleting..." } else { "Delete" }
                    }
                },
                p { "Are you sure you want to delete " strong { "{user.full_name()}" } "?" }
                p { class: "text-muted", "This action cannot be undone." }
            }
        }
    }
}

/// Create a user when `editing` is `None`, otherwise edit that user.
#[component]
fn UserModal(
    editing: Option<User>,
    centers: Vec<ServiceCenter>,
    on_close: EventHandler<()>,
    on_saved: EventHandler<()>,
) -> Element {
    let mut error_state = use_error();
    let editing_id = editing.as_ref().map(|u| u.id);
    let creating = editing_id.is_none();
    let form = use_signal(|| editing.as_ref().map(UserForm::from_user).unwrap_or_default());
    let mut saving = use_signal(|| false);

    let problem = form.read().validate(creating).err().map(|e| e.to_string());
    let can_submit = problem.is_none() && !saving();
    let title = if creating { "Create User" } else { "Edit User" };
    let submit_label = match (creating, saving()) {
        (true, true) => "Creating...",
        (true, false) => "Create",
        (false, true) => "Saving...",
        (false, false) => "Save",
    };

    rsx! {
        Modal {
            title,
            busy: saving(),
            on_close: move |_| on_close.call(()),
            footer: rsx! {
                button {
                    class: "btn btn-secondary",
                    disabled: saving(),
                    onclick: move |_| on_close.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    disabled: !can_submit,
                    onclick: move |_| {
                        let submitted = form.read().clone();
                        spawn(async move {
                            saving.set(true);
                            let result = match editing_id {
                                Some(id) => api::update_user(id, submitted).await,
                                None => api::create_user(submitted).await.map(|_| ()),
                            };
                            match result {
                                Ok(()) => on_saved.call(()),
                                Err(e) => error_state.set_server_error(&e),
                            }
                            saving.set(false);
                        });
                    },
                    "{submit_label}"
                }
            },
            UserFormFields { form, centers, creating }
            if let Some(problem) = problem {
                p { class: "form-hint text-muted", "{problem}" }
            }
        }
    }
}
