use dioxus::prelude::*;
use types::{Role, User, forms::UserForm};

use super::components::{FormMessage, PageHeader, TextField};
use crate::{use_error, use_session};

#[component]
pub fn ManageUsers() -> Element {
    let session = use_session();
    let mut users = use_signal(Vec::<User>::new);
    let mut loading = use_signal(|| true);
    let mut error_state = use_error();
    let mut show_create_form = use_signal(|| false);
    let mut pending_delete = use_signal(|| None::<User>);
    let mut deleting = use_signal(|| false);

    let refresh_users = move || {
        spawn(async move {
            match api::list_users().await {
                Ok(u) => users.set(u),
                Err(e) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    };

    // Fetch users on mount
    use_effect(move || {
        refresh_users();
    });

    rsx! {
        div {
            div { class: "page-header",
                PageHeader {
                    title: "Manage Users",
                    subtitle: "Create and remove admin and agent accounts.",
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| {
                            refresh_users();
                        },
                        "Refresh"
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| show_create_form.set(true),
                        "Create User"
                    }
                }
            }

            if *show_create_form.read() {
                CreateUserModal {
                    on_close: move |_| show_create_form.set(false),
                    on_created: move |_| {
                        show_create_form.set(false);
                        refresh_users();
                    },
                }
            }

            if let Some(user) = pending_delete() {
                DeleteConfirmModal {
                    user_name: user.name.clone(),
                    deleting: *deleting.read(),
                    on_close: move |_| pending_delete.set(None),
                    on_confirm: move |_| {
                        let user_id = user.id;
                        spawn(async move {
                            deleting.set(true);
                            match api::delete_user(user_id).await {
                                Ok(()) => {
                                    refresh_users();
                                }
                                Err(e) => error_state.set_server_error(&e),
                            }
                            deleting.set(false);
                            pending_delete.set(None);
                        });
                    },
                }
            }

            if *loading.read() {
                div { class: "loading", "Loading users..." }
            } else {
                div { class: "card",
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    th { "User ID" }
                                    th { "Name" }
                                    th { "Email" }
                                    th { "Role" }
                                    th {}
                                }
                            }
                            tbody {
                                for user in users.read().iter() {
                                    {
                                        let is_self = user.email.eq_ignore_ascii_case(&session.email);
                                        let target = user.clone();
                                        rsx! {
                                            tr { key: "{user.id}",
                                                td { "{user.id}" }
                                                td { "{user.name}" }
                                                td { "{user.email}" }
                                                td {
                                                    span { class: "badge badge-{user.role}", "{user.role}" }
                                                }
                                                td { class: "text-right",
                                                    if is_self {
                                                        span { class: "text-muted", "You" }
                                                    } else {
                                                        button {
                                                            class: "btn btn-danger btn-sm",
                                                            onclick: move |_| pending_delete.set(Some(target.clone())),
                                                            "Delete"
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DeleteConfirmModal(
    user_name: String,
    deleting: bool,
    on_close: EventHandler<()>,
    on_confirm: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| if !deleting { on_close.call(()) },
            div { class: "modal modal-sm",
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "Delete User" }
                    if !deleting {
                        button {
                            class: "modal-close",
                            onclick: move |_| on_close.call(()),
                            "×"
                        }
                    }
                }
                div { class: "modal-body",
                    p { "Are you sure you want to delete " strong { "{user_name}" } "?" }
                    p { class: "text-muted", "This action cannot be undone." }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        disabled: deleting,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: deleting,
                        onclick: move |_| on_confirm.call(()),
                        if deleting { "Deleting..." } else { "Delete" }
                    }
                }
            }
        }
    }
}

#[component]
fn CreateUserModal(on_close: EventHandler<()>, on_created: EventHandler<()>) -> Element {
    let mut error_state = use_error();
    let mut form = use_signal(UserForm::default);
    let mut form_error = use_signal(|| None::<String>);
    let mut creating = use_signal(|| false);

    let submit = move |_: MouseEvent| {
        let user = match form.read().validate() {
            Ok(user) => user,
            Err(e) => {
                form_error.set(Some(e.to_string()));
                return;
            }
        };
        form_error.set(None);
        spawn(async move {
            creating.set(true);
            match api::create_user(user).await {
                Ok(()) => on_created.call(()),
                // A taken email and the like belong next to the form.
                Err(e) if ui::is_rejection(&e) => form_error.set(Some(ui::server_message(&e))),
                Err(e) => error_state.set_server_error(&e),
            }
            creating.set(false);
        });
    };

    let current = form();

    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div { class: "modal",
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "Create User" }
                    button {
                        class: "modal-close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                div { class: "modal-body",
                    FormMessage { message: form_error() }
                    TextField {
                        id: "name",
                        label: "Name *",
                        placeholder: "e.g. Priya Sharma",
                        value: current.name.clone(),
                        oninput: move |v| form.write().name = v,
                    }
                    TextField {
                        id: "email",
                        label: "Email *",
                        input_type: "email",
                        placeholder: "e.g. priya@example.com",
                        value: current.email.clone(),
                        oninput: move |v| form.write().email = v,
                    }
                    TextField {
                        id: "password",
                        label: "Password *",
                        input_type: "password",
                        value: current.password.clone(),
                        oninput: move |v| form.write().password = v,
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "role", "Role" }
                        select {
                            id: "role",
                            class: "form-input",
                            value: "{current.role}",
                            onchange: move |e| {
                                if let Ok(role) = e.value().parse::<Role>() {
                                    form.write().role = role;
                                }
                            },
                            option { value: "agent", "Agent" }
                            option { value: "admin", "Admin" }
                        }
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: *creating.read(),
                        onclick: submit,
                        if *creating.read() { "Creating..." } else { "Create" }
                    }
                }
            }
        }
    }
}
