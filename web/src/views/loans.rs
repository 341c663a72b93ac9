use dioxus::prelude::*;
use types::{PaymentFrequency, RepaymentMethod, forms::LoanForm};
use ui::LoansTable;

use super::components::{FormMessage, PageHeader, TextField};
use crate::{Route, use_error, use_flash};

#[component]
pub fn AgentLoans() -> Element {
    rsx! {
        div {
            div { class: "page-header",
                PageHeader {
                    title: "My Loans",
                    subtitle: "Loans you can see, filtered by status and paged.",
                }
                div { class: "page-header-actions",
                    Link {
                        to: Route::NewLoan {},
                        class: "btn btn-primary",
                        "Issue New Loan"
                    }
                }
            }
            LoansTable {}
        }
    }
}

fn today() -> String {
    jiff::Zoned::now().date().to_string()
}

#[component]
pub fn NewLoan() -> Element {
    let mut error_state = use_error();
    let mut flash = use_flash();
    let mut form = use_signal(|| LoanForm {
        loan_date: today(),
        ..LoanForm::default()
    });
    let mut form_error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let submit = move |_: MouseEvent| {
        let draft = match form.read().validate() {
            Ok(draft) => draft,
            Err(e) => {
                form_error.set(Some(e.to_string()));
                return;
            }
        };
        form_error.set(None);
        spawn(async move {
            submitting.set(true);
            match api::issue_loan(draft).await {
                Ok(issued) => {
                    tracing::info!(loan_id = issued.loan_id, "loan issued");
                    flash.set(issued.notice());
                    navigator().push(Route::AgentOverview {});
                }
                Err(e) if ui::is_rejection(&e) => form_error.set(Some(ui::server_message(&e))),
                Err(e) => error_state.set_server_error(&e),
            }
            submitting.set(false);
        });
    };

    let current = form();
    let method = current.repayment_method;
    let frequency = current
        .payment_frequency
        .map(|f| f.as_str())
        .unwrap_or("");

    rsx! {
        div {
            div { class: "page-header",
                PageHeader {
                    title: "Issue New Loan",
                    subtitle: "The borrower is created on the fly if they are new.",
                }
            }
            div { class: "card card-narrow",
                div { class: "card-body",
                    FormMessage { message: form_error() }
                    TextField {
                        id: "borrower_name",
                        label: "Borrower Name *",
                        value: current.borrower_name.clone(),
                        oninput: move |v| form.write().borrower_name = v,
                    }
                    TextField {
                        id: "borrower_contact",
                        label: "Borrower Contact",
                        input_type: "tel",
                        placeholder: "Phone number",
                        value: current.borrower_contact.clone(),
                        oninput: move |v| form.write().borrower_contact = v,
                    }
                    TextField {
                        id: "amount",
                        label: "Loan Amount *",
                        input_type: "number",
                        step: "0.01",
                        value: current.amount.clone(),
                        oninput: move |v| form.write().amount = v,
                    }
                    TextField {
                        id: "interest_rate",
                        label: "Interest Rate (%) *",
                        input_type: "number",
                        step: "0.01",
                        value: current.interest_rate.clone(),
                        oninput: move |v| form.write().interest_rate = v,
                    }
                    TextField {
                        id: "loan_date",
                        label: "Loan Date",
                        input_type: "date",
                        value: current.loan_date.clone(),
                        oninput: move |v| form.write().loan_date = v,
                    }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "repayment_method", "Repayment Method" }
                        select {
                            id: "repayment_method",
                            class: "form-input",
                            value: "{method.as_str()}",
                            onchange: move |e| {
                                if let Ok(method) = e.value().parse::<RepaymentMethod>() {
                                    let mut form = form.write();
                                    form.repayment_method = method;
                                    if method == RepaymentMethod::Full {
                                        form.payment_frequency = None;
                                    }
                                }
                            },
                            option { value: "full", "Full Payment" }
                            option { value: "interest", "Interest Only" }
                        }
                    }
                    if method == RepaymentMethod::Interest {
                        div { class: "form-group",
                            label { class: "form-label", r#for: "payment_frequency", "Payment Frequency *" }
                            select {
                                id: "payment_frequency",
                                class: "form-input",
                                value: "{frequency}",
                                onchange: move |e| {
                                    form.write().payment_frequency = e.value().parse::<PaymentFrequency>().ok();
                                },
                                option { value: "", disabled: true, "Choose..." }
                                option { value: "daily", "Daily" }
                                option { value: "monthly", "Monthly" }
                            }
                        }
                    }
                }
                div { class: "card-footer",
                    Link {
                        to: Route::AgentOverview {},
                        class: "btn btn-secondary",
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: submitting(),
                        onclick: submit,
                        if submitting() { "Issuing..." } else { "Issue Loan" }
                    }
                }
            }
        }
    }
}
