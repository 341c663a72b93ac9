use dioxus::prelude::*;

#[component]
pub fn PageHeader(title: &'static str, subtitle: &'static str) -> Element {
    rsx! {
        div { class: "page-header-content",
            h1 { class: "page-title", "{title}" }
            p { class: "page-subtitle", "{subtitle}" }
        }
    }
}

/// A labelled input bound to a string value.
#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: String,
    oninput: EventHandler<String>,
    #[props(default = "text")] input_type: &'static str,
    #[props(default)] placeholder: &'static str,
    #[props(default)] step: Option<&'static str>,
    #[props(default)] disabled: bool,
) -> Element {
    rsx! {
        div { class: "form-group",
            label { class: "form-label", r#for: id, "{label}" }
            input {
                id,
                class: "form-input",
                r#type: input_type,
                placeholder,
                step,
                disabled,
                value: "{value}",
                oninput: move |e| oninput.call(e.value()),
            }
        }
    }
}

#[component]
pub fn FormMessage(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            p { class: "form-error", "{message}" }
        }
    }
}
