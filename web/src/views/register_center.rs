use super::components::{FileList, picked_files};
use crate::{Route, use_error};
use dioxus::prelude::*;
use jiff::civil::Time;
use types::{
    models::{ServiceCenterForm, center_fields as fields, validate_attachments},
    upload::{FileMeta, UploadKind},
};
use ui::PageHeader;

#[component]
fn TextField(
    id: String,
    name: String,
    label: String,
    value: String,
    #[props(default = "text".to_string())] kind: String,
    #[props(default)] placeholder: String,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "form-group",
            label { class: "form-label", r#for: "{id}", "{label} *" }
            input {
                id: "{id}",
                name: "{name}",
                class: "form-input",
                r#type: "{kind}",
                placeholder: "{placeholder}",
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
        }
    }
}

fn format_time(time: Option<Time>) -> String {
    time.map(|t| t.strftime("%H:%M").to_string()).unwrap_or_default()
}

/// Posted straight to the multipart upload route; the server redirects to
/// the new center, or back here with `?error=`.
#[component]
pub fn RegisterServiceCenter(error: Option<String>) -> Element {
    let mut error_state = use_error();
    let mut form = use_signal(ServiceCenterForm::default);
    let mut photo = use_signal(|| None::<FileMeta>);
    let mut documents = use_signal(Vec::<FileMeta>::new);

    let current = form.read().clone();
    let picked_photo = photo.read().clone();
    let picked_documents = documents.read().clone();
    let problem = current
        .validate_details()
        .and_then(|()| validate_attachments(picked_photo.as_ref(), &picked_documents))
        .err()
        .map(|e| e.to_string());

    let on_photo = move |evt: FormEvent| match picked_files(&evt, UploadKind::Photo) {
        Ok(mut files) => {
            photo.set(files.pop());
            error_state.clear();
        }
        Err(message) => {
            photo.set(None);
            error_state.set(message);
        }
    };

    let on_documents = move |evt: FormEvent| match picked_files(&evt, UploadKind::Document) {
        Ok(files) => {
            documents.set(files);
            error_state.clear();
        }
        Err(message) => {
            documents.set(Vec::new());
            error_state.set(message);
        }
    };

    rsx! {
        div {
            PageHeader {
                title: "Register Service Center",
                subtitle: "Every field, a photo and at least one registration document are required.",
                actions: rsx! {
                    Link { to: Route::service_centers(), class: "btn btn-secondary", "Cancel" }
                },
            }

            if let Some(error) = error {
                div { class: "alert alert-error", "{error}" }
            }

            form {
                class: "card",
                action: ServiceCenterForm::SUBMIT_PATH,
                method: "post",
                enctype: "multipart/form-data",
                div { class: "card-body",
                    h3 { class: "section-header", "Details" }
                    TextField {
                        id: "name",
                        name: fields::NAME.to_string(),
                        label: "Service Center Name",
                        value: current.name.clone(),
                        on_input: move |v| form.write().name = v,
                    }
                    TextField {
                        id: "address",
                        name: fields::ADDRESS.to_string(),
                        label: "Address",
                        value: current.address.clone(),
                        on_input: move |v| form.write().address = v,
                    }
                    div { class: "form-row",
                        TextField {
                            id: "owner_name",
                            name: fields::OWNER_NAME.to_string(),
                            label: "Owner Name",
                            value: current.owner_name.clone(),
                            on_input: move |v| form.write().owner_name = v,
                        }
                        TextField {
                            id: "email",
                            name: fields::EMAIL.to_string(),
                            label: "Email",
                            kind: "email",
                            value: current.email.clone(),
                            on_input: move |v| form.write().email = v,
                        }
                    }
                    div { class: "form-row",
                        TextField {
                            id: "vat_number",
                            name: fields::VAT_NUMBER.to_string(),
                            label: "VAT Number",
                            value: current.vat_number.clone(),
                            on_input: move |v| form.write().vat_number = v,
                        }
                        TextField {
                            id: "registration_number",
                            name: fields::REGISTRATION_NUMBER.to_string(),
                            label: "Registration Number",
                            value: current.registration_number.clone(),
                            on_input: move |v| form.write().registration_number = v,
                        }
                    }
                    TextField {
                        id: "contact_number",
                        name: fields::CONTACT_NUMBER.to_string(),
                        label: "Contact Number",
                        kind: "tel",
                        placeholder: "e.g. +94 11 234 5678",
                        value: current.contact_number.clone(),
                        on_input: move |v| form.write().contact_number = v,
                    }
                    div { class: "form-row",
                        TextField {
                            id: "opening_hours",
                            name: fields::OPENING_HOURS.to_string(),
                            label: "Opens",
                            kind: "time",
                            value: format_time(current.opening_hours),
                            on_input: move |v: String| form.write().opening_hours = v.parse().ok(),
                        }
                        TextField {
                            id: "closing_hours",
                            name: fields::CLOSING_HOURS.to_string(),
                            label: "Closes",
                            kind: "time",
                            value: format_time(current.closing_hours),
                            on_input: move |v: String| form.write().closing_hours = v.parse().ok(),
                        }
                    }

                    div { class: "divider" }

                    h3 { class: "section-header", "Uploads" }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "photo", "Photo *" }
                        input {
                            id: "photo",
                            name: fields::PHOTO,
                            class: "form-input",
                            r#type: "file",
                            accept: UploadKind::Photo.accept(),
                            onchange: on_photo,
                        }
                        p { class: "form-hint text-muted text-sm",
                            "JPEG, PNG or WebP, up to {UploadKind::Photo.max_bytes() / (1024 * 1024)} MB."
                        }
                        if let Some(photo) = picked_photo {
                            FileList { files: vec![photo] }
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "documents", "Registration Documents *" }
                        input {
                            id: "documents",
                            name: fields::DOCUMENTS,
                            class: "form-input",
                            r#type: "file",
                            multiple: true,
                            accept: UploadKind::Document.accept(),
                            onchange: on_documents,
                        }
                        p { class: "form-hint text-muted text-sm",
                            "Up to {ServiceCenterForm::MAX_DOCUMENTS} PDF, JPEG or PNG files, {UploadKind::Document.max_bytes() / (1024 * 1024)} MB each."
                        }
                        FileList { files: picked_documents }
                    }

                    div { class: "divider" }

                    if let Some(problem) = problem.clone() {
                        p { class: "form-hint text-muted", "{problem}" }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary",
                        disabled: problem.is_some(),
                        "Register"
                    }
                }
            }
        }
    }
}
