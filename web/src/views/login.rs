use dioxus::document::eval;
use dioxus::prelude::*;
use types::session::REMEMBERED_EMAIL_KEY;

/// Keep `rememberedEmail` in localStorage in step with the checkbox.
fn persist_email(email: &str, remember: bool) {
    let key = serde_json::to_string(REMEMBERED_EMAIL_KEY).unwrap_or_default();
    let js = if remember {
        let value = serde_json::to_string(email).unwrap_or_default();
        format!("localStorage.setItem({key}, {value})")
    } else {
        format!("localStorage.removeItem({key})")
    };
    let _ = eval(&js);
}

#[component]
pub fn Login(error: Option<String>) -> Element {
    let mut email = use_signal(String::new);
    let mut remember = use_signal(|| false);

    // Restore a remembered email on mount
    use_effect(move || {
        spawn(async move {
            let js = format!(
                "return localStorage.getItem({})",
                serde_json::to_string(REMEMBERED_EMAIL_KEY).unwrap_or_default()
            );
            if let Ok(Some(saved)) = eval(&js).join::<Option<String>>().await {
                email.set(saved);
                remember.set(true);
            }
        });
    });

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                div { class: "login-header",
                    h1 { class: "login-title", "Service Console" }
                    p { class: "login-subtitle", "Service Center Administration" }
                }
                if let Some(error) = error {
                    div { class: "alert alert-error", "{error}" }
                }
                form {
                    action: "/auth/login",
                    method: "post",
                    div { class: "form-group",
                        label { class: "form-label", r#for: "email", "Email" }
                        input {
                            id: "email",
                            name: "email",
                            class: "form-input",
                            r#type: "email",
                            required: true,
                            autocomplete: "username",
                            value: "{email}",
                            oninput: move |e| {
                                email.set(e.value());
                                if remember() {
                                    persist_email(&e.value(), true);
                                }
                            },
                        }
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "password", "Password" }
                        input {
                            id: "password",
                            name: "password",
                            class: "form-input",
                            r#type: "password",
                            required: true,
                            autocomplete: "current-password",
                        }
                    }
                    div { class: "form-group",
                        label { class: "checkbox-label",
                            input {
                                r#type: "checkbox",
                                checked: remember(),
                                onchange: move |_| {
                                    let next = !remember();
                                    remember.set(next);
                                    persist_email(&email.read(), next);
                                },
                            }
                            span { "Remember me" }
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary login-btn",
                        "Sign in"
                    }
                }
            }
        }
    }
}
