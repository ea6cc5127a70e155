use dioxus::prelude::*;
use types::{
    Role,
    models::{ServiceCenter, UserForm},
    upload::{FileMeta, UploadKind, guess_content_type},
};
use uuid::Uuid;

#[component]
pub fn UserFormFields(
    form: Signal<UserForm>,
    centers: Vec<ServiceCenter>,
    creating: bool,
) -> Element {
    let current = form.read().clone();
    let role_value = current.role.map(|r| r.name()).unwrap_or_default();
    let station_value = current.station_id.map(|id| id.to_string()).unwrap_or_default();
    let needs_station = current.role.is_some_and(Role::is_station_scoped);

    rsx! {
        div { class: "form-row",
            div { class: "form-group",
                label { class: "form-label", r#for: "first_name", "First Name *" }
                input {
                    id: "first_name",
                    class: "form-input",
                    r#type: "text",
                    placeholder: "e.g. Nimal",
                    value: "{current.first_name}",
                    oninput: move |e| form.write().first_name = e.value(),
                }
            }
            div { class: "form-group",
                label { class: "form-label", r#for: "last_name", "Last Name *" }
                input {
                    id: "last_name",
                    class: "form-input",
                    r#type: "text",
                    placeholder: "e.g. Perera",
                    value: "{current.last_name}",
                    oninput: move |e| form.write().last_name = e.value(),
                }
            }
        }
        div { class: "form-group",
            label { class: "form-label", r#for: "email", "Email *" }
            input {
                id: "email",
                class: "form-input",
                r#type: "email",
                placeholder: "e.g. nimal@example.com",
                value: "{current.email}",
                oninput: move |e| form.write().email = e.value(),
            }
        }
        if creating {
            div { class: "form-group",
                label { class: "form-label", r#for: "password", "Password *" }
                input {
                    id: "password",
                    class: "form-input",
                    r#type: "password",
                    autocomplete: "new-password",
                    oninput: move |e| {
                        let value = e.value();
                        form.write().password = (!value.is_empty()).then_some(value);
                    },
                }
            }
        }
        div { class: "form-group",
            label { class: "form-label", r#for: "role", "Role *" }
            select {
                id: "role",
                class: "form-input",
                value: "{role_value}",
                onchange: move |e| {
                    let role = Role::from_name(&e.value());
                    let mut form = form.write();
                    form.role = role;
                    if !role.is_some_and(Role::is_station_scoped) {
                        form.station_id = None;
                    }
                },
                option { value: "", disabled: true, "Select a role" }
                for role in Role::ALL {
                    option { key: "{role.name()}", value: "{role.name()}", "{role.label()}" }
                }
            }
        }
        if needs_station {
            div { class: "form-group",
                label { class: "form-label", r#for: "station", "Service Center *" }
                select {
                    id: "station",
                    class: "form-input",
                    value: "{station_value}",
                    onchange: move |e| form.write().station_id = Uuid::parse_str(&e.value()).ok(),
                    option { value: "", disabled: true, "Select a service center" }
                    for center in centers {
                        option { key: "{center.id}", value: "{center.id}", "{center.name}" }
                    }
                }
            }
        }
    }
}

/// Describe the files picked in an `<input type="file">`, checking each
/// against `kind`. The browser posts the files themselves with the form.
pub fn picked_files(event: &FormEvent, kind: UploadKind) -> Result<Vec<FileMeta>, String> {
    event
        .files()
        .into_iter()
        .map(|file| {
            let file_name = file.name();
            let content_type = file
                .content_type()
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| guess_content_type(&file_name).to_string());
            let meta = FileMeta {
                file_name,
                content_type,
                size: file.size(),
            };

            meta.validate(kind)
                .map_err(|e| format!("{}: {e}", meta.file_name))?;
            Ok(meta)
        })
        .collect()
}

#[component]
pub fn FileList(files: Vec<FileMeta>) -> Element {
    rsx! {
        ul { class: "file-list",
            for (i, file) in files.iter().enumerate() {
                li { key: "{i}", class: "file-list-item",
                    span { "{file.file_name}" }
                    span { class: "text-muted text-sm", " ({file.size_kb()} KB)" }
                }
            }
        }
    }
}
