use api::models::LoginRequest;
use api::{FormController, Landing};
use dioxus::prelude::*;

use crate::hooks::use_form;
use crate::session::use_session;
use crate::views::common::{FormBanner, TextField};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Username/password login. The session decides where to land.
#[component]
pub fn LoginView(on_landing: EventHandler<Landing>, on_register: EventHandler<()>) -> Element {
    let session = use_session();
    let form = use_form(FormController::<LoginRequest>::create);
    let state = form.state();

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = form.controller();
        let session = session.session().clone();
        async move {
            controller
                .submit(
                    |request| async move { session.login(&request).await },
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
                h1 { "Welcome back" }
                TextField {
                    label: "Username",
                    value: state.draft.username.clone(),
                    error: state.field_error("username").map(str::to_string),
                    oninput: move |v| form.update(|d| d.username = v),
                }
                TextField {
                    label: "Password",
                    kind: "password",
                    value: state.draft.password.clone(),
                    error: state.field_error("password").map(str::to_string),
                    oninput: move |v| form.update(|d| d.password = v),
                }
                FormBanner { status: state.status.clone() }
                button {
                    class: "btn primary",
                    r#type: "submit",
                    disabled: state.is_submitting(),
                    if state.is_submitting() { "Logging in..." } else { "Login" }
                }
                p {
                    class: "muted",
                    "No account? "
                    a {
                        href: "#",
                        onclick: move |evt| {
                            evt.prevent_default();
                            on_register.call(());
                        },
                        "Register"
                    }
                }
            }
        }
    }
}
