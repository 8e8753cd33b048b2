//! Pieces shared by the views.

use api::FormStatus;
use dioxus::prelude::*;

/// Inline message under a form field.
#[component]
pub fn FieldError(#[props(!optional)] message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            p { class: "field-error", "{message}" }
        }
    }
}

/// Banner for a form's submit status.
#[component]
pub fn FormBanner(
    status: FormStatus,
    /// Shown on success; nothing is shown when empty.
    #[props(default)]
    success: String,
) -> Element {
    match status {
        FormStatus::Error(message) => rsx! {
            div { class: "banner error", "{message}" }
        },
        FormStatus::Success if !success.is_empty() => rsx! {
            div { class: "banner success", "{success}" }
        },
        _ => rsx! {},
    }
}

#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "spinner", "{label}" }
    }
}

/// A labelled single-line text input.
#[component]
pub fn TextField(
    label: String,
    value: String,
    /// The input `type` attribute.
    #[props(default = "text".to_string())]
    kind: String,
    #[props(!optional)] error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        label {
            class: "field",
            span { "{label}" }
            input {
                r#type: "{kind}",
                value: "{value}",
                oninput: move |evt| oninput.call(evt.value()),
            }
            FieldError { message: error }
        }
    }
}

/// A labelled multi-line text input.
#[component]
pub fn TextArea(
    label: String,
    value: String,
    #[props(!optional)] error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        label {
            class: "field",
            span { "{label}" }
            textarea {
                value: "{value}",
                oninput: move |evt| oninput.call(evt.value()),
            }
            FieldError { message: error }
        }
    }
}
