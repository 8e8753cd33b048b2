use api::models::{RegisterRequest, Role};
use api::{FormController, Landing};
use dioxus::prelude::*;

use crate::hooks::use_form;
use crate::session::use_session;
use crate::views::common::{FieldError, FormBanner, TextField};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

#[component]
pub fn RegisterView(on_landing: EventHandler<Landing>) -> Element {
    let session = use_session();
    let form = use_form(FormController::<RegisterRequest>::create);
    let state = form.state();

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let session = session.session().clone();
        async move {
            controller
                .submit(
                    |request| async move { session.register(&request).await },
                    |landing| on_landing.call(*landing),
                )
                .await;
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-page",
            form {
                class: "form auth-card",
                onsubmit: submit,
                h1 { "Create your account" }
                TextField {
                    label: "Username",
                    value: state.draft.username.clone(),
                    error: state.field_error("username").map(str::to_string),
                    oninput: move |v| form.update(|d| d.username = v),
                }
                TextField {
                    label: "Email",
                    kind: "email",
                    value: state.draft.email.clone(),
                    error: state.field_error("email").map(str::to_string),
                    oninput: move |v| form.update(|d| d.email = v),
                }
                TextField {
                    label: "Password",
                    kind: "password",
                    value: state.draft.password.clone(),
                    error: state.field_error("password").map(str::to_string),
                    oninput: move |v| form.update(|d| d.password = v),
                }
                div {
                    class: "field",
                    span { "I am a" }
                    div {
                        class: "role-picker",
                        for role in [Role::Candidate, Role::Employer] {
                            label {
                                input {
                                    r#type: "radio",
                                    name: "role",
                                    value: "{role}",
                                    checked: state.draft.role == role,
                                    onchange: move |_| form.update(|d| d.role = role),
                                }
                                "{role}"
                            }
                        }
                    }
                    FieldError { message: state.field_error("role").map(str::to_string) }
                }
                FormBanner { status: state.status.clone() }
                button {
                    class: "btn primary",
                    r#type: "submit",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Creating account..." } else { "Register" }
                }
            }
        }
    }
}
