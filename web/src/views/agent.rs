use dioxus::prelude::*;
use types::{Loan, LoanStatus, PaymentReceipt, forms::parse_payment_amount, rupees};

use super::components::{FormMessage, PageHeader, TextField};
use crate::{Route, use_error, use_flash};

#[component]
pub fn AgentOverview() -> Element {
    let mut error_state = use_error();
    let mut loans = use_signal(Vec::<Loan>::new);
    let mut loading = use_signal(|| true);
    let mut paying = use_signal(|| None::<Loan>);
    let mut flash = use_flash();
    let mut notice = use_signal(|| flash.take());

    let refresh_loans = move || {
        spawn(async move {
            match api::list_agent_loans().await {
                Ok(l) => loans.set(l),
                Err(e) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    };

    use_effect(move || {
        refresh_loans();
    });

    rsx! {
        div {
            div { class: "page-header",
                PageHeader {
                    title: "Agent Dashboard",
                    subtitle: "Loans you manage and the payments against them.",
                }
                div { class: "page-header-actions",
                    Link {
                        to: Route::NewLoan {},
                        class: "btn btn-primary",
                        "Issue New Loan"
                    }
                }
            }

            if let Some(message) = notice() {
                div { class: "notice notice-success",
                    span { "{message}" }
                    button {
                        class: "notice-close",
                        onclick: move |_| notice.set(None),
                        "×"
                    }
                }
            }

            if let Some(loan) = paying() {
                PaymentModal {
                    loan,
                    on_close: move |_| paying.set(None),
                    on_recorded: move |receipt: PaymentReceipt| {
                        paying.set(None);
                        notice.set(Some(format!(
                            "{} Remaining balance: {}",
                            receipt.message,
                            rupees(receipt.remaining_balance)
                        )));
                        refresh_loans();
                    },
                }
            }

            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Your Loans" }
                    div { class: "card-actions",
                        button {
                            class: "btn btn-secondary btn-sm",
                            onclick: move |_| {
                                refresh_loans();
                            },
                            "Refresh"
                        }
                    }
                }
                if *loading.read() {
                    div { class: "loading", "Loading loans..." }
                } else {
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    th { "Loan ID" }
                                    th { "Borrower" }
                                    th { class: "text-right", "Amount" }
                                    th { "Loan Date" }
                                    th { "Status" }
                                    th { class: "text-right", "Remaining Balance" }
                                    th {}
                                }
                            }
                            tbody {
                                if loans.read().is_empty() {
                                    tr {
                                        td { colspan: "7", class: "text-muted text-center", "You have not issued any loans yet." }
                                    }
                                }
                                for loan in loans.read().iter() {
                                    {
                                        let target = loan.clone();
                                        let settled = loan.status == LoanStatus::Completed;
                                        rsx! {
                                            tr { key: "{loan.id}",
                                                td { "#{loan.id}" }
                                                td { "{loan.borrower_label()}" }
                                                td { class: "text-right", {rupees(loan.amount)} }
                                                td { "{loan.loan_date}" }
                                                td {
                                                    span { class: "badge badge-{loan.status}", "{loan.status.label()}" }
                                                }
                                                td { class: "text-right", "{loan.remaining_label()}" }
                                                td { class: "text-right",
                                                    button {
                                                        class: "btn btn-primary btn-sm",
                                                        disabled: settled,
                                                        onclick: move |_| {
                                                            notice.set(None);
                                                            paying.set(Some(target.clone()));
                                                        },
                                                        "Record Payment"
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
fn PaymentModal(
    loan: Loan,
    on_close: EventHandler<()>,
    on_recorded: EventHandler<PaymentReceipt>,
) -> Element {
    let mut error_state = use_error();
    let mut amount = use_signal(String::new);
    let mut form_error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let loan_id = loan.id;
    let mut remaining = use_signal(|| loan.remaining_balance);
    let mut checking = use_signal(|| true);

    // The API accrues interest daily, so the balance on the table row may be
    // stale by the time the dialog opens.
    use_effect(move || {
        spawn(async move {
            match api::loan_details(loan_id).await {
                Ok(current) => remaining.set(current.remaining_balance),
                Err(e) => error_state.set_server_error(&e),
            }
            checking.set(false);
        });
    });

    let submit = move |_: MouseEvent| {
        let amount_paid = match parse_payment_amount(&amount.read(), remaining()) {
            Ok(value) => value,
            Err(e) => {
                form_error.set(Some(e.to_string()));
                return;
            }
        };
        form_error.set(None);
        spawn(async move {
            saving.set(true);
            match api::record_payment(loan_id, amount_paid).await {
                Ok(receipt) => on_recorded.call(receipt),
                Err(e) if ui::is_rejection(&e) => form_error.set(Some(ui::server_message(&e))),
                Err(e) => error_state.set_server_error(&e),
            }
            saving.set(false);
        });
    };

    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| if !saving() { on_close.call(()) },
            div { class: "modal modal-sm",
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title", "Record Payment" }
                    button {
                        class: "modal-close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                div { class: "modal-body",
                    div { class: "form-group",
                        span { class: "form-label", "Loan" }
                        div { class: "form-value", "#{loan.id} for {loan.borrower_label()}" }
                    }
                    div { class: "form-group",
                        span { class: "form-label", "Remaining Balance" }
                        div { class: "form-value",
                            if checking() {
                                "Checking..."
                            } else {
                                {remaining().map(rupees).unwrap_or_else(|| "N/A".to_string())}
                            }
                        }
                    }
                    FormMessage { message: form_error() }
                    TextField {
                        id: "amount_paid",
                        label: "Payment Amount",
                        input_type: "number",
                        step: "0.01",
                        placeholder: "e.g. 500",
                        disabled: saving(),
                        value: amount(),
                        oninput: move |v| amount.set(v),
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        disabled: saving(),
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: saving() || checking(),
                        onclick: submit,
                        if saving() { "Saving..." } else { "Submit Payment" }
                    }
                }
            }
        }
    }
}
