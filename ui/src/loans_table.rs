use dioxus::prelude::*;
use types::{Loan, LoanPage, LoanQuery, LoanStatus, PAGE_SIZES, rupees};

use crate::server_message;

/// Paginated list of every loan the signed-in user can see.
///
/// `on_refresh` fires alongside the table's own reload so a page can refresh
/// whatever it shows next to the table.
#[component]
pub fn LoansTable(#[props(default)] on_refresh: Option<EventHandler<()>>) -> Element {
    let mut query = use_signal(LoanQuery::default);
    let mut loans = use_resource(move || {
        let query = query();
        async move { api::list_loans(query).await }
    });

    let current = query();
    let status_value = current
        .status
        .map(|s| s.as_str())
        .unwrap_or("all");

    let body = match &*loans.read() {
        None => rsx! {
            div { class: "loading", "Loading loans..." }
        },
        Some(Err(e)) => {
            let message = server_message(e);
            rsx! {
                div { class: "card-body",
                    p { class: "form-error", "Failed to load loans: {message}" }
                }
            }
        }
        Some(Ok(page)) => {
            let rows = &page.loans;
            rsx! {
                div { class: "table-container",
                    table {
                        thead {
                            tr {
                                th { "Borrower" }
                                th { "Agent" }
                                th { class: "text-right", "Amount" }
                                th { "Loan Date" }
                                th { class: "text-right", "Interest Rate (%)" }
                                th { "Status" }
                                th { "Repayment" }
                                th { class: "text-right", "Remaining Balance" }
                            }
                        }
                        tbody {
                            if rows.is_empty() {
                                tr {
                                    td { colspan: "8", class: "text-muted text-center", "No loans found." }
                                }
                            }
                            for loan in rows.iter() {
                                LoanRow { key: "{loan.id}", loan: loan.clone() }
                            }
                        }
                    }
                }
                Pagination {
                    query: current,
                    page: page.clone(),
                    on_change: move |next| query.set(next),
                }
            }
        }
    };

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "Loans" }
                div { class: "card-actions",
                    label { class: "form-label form-label-inline", r#for: "loan-status", "Status" }
                    select {
                        id: "loan-status",
                        class: "form-input form-input-sm",
                        value: "{status_value}",
                        onchange: move |e| {
                            let status = e.value().parse::<LoanStatus>().ok();
                            let next = query().with_status(status);
                            query.set(next);
                        },
                        option { value: "all", "All" }
                        for status in LoanStatus::ALL {
                            option { key: "{status}", value: "{status}", "{status.label()}" }
                        }
                    }
                    button {
                        class: "btn btn-secondary btn-sm",
                        onclick: move |_| {
                            loans.restart();
                            if let Some(handler) = on_refresh {
                                handler.call(());
                            }
                        },
                        "Refresh"
                    }
                }
            }
            {body}
        }
    }
}

#[component]
fn LoanRow(loan: Loan) -> Element {
    let status_class = format!("badge badge-{}", loan.status);

    rsx! {
        tr {
            td { "{loan.borrower_label()}" }
            td { "{loan.agent_label()}" }
            td { class: "text-right", {rupees(loan.amount)} }
            td { "{loan.loan_date}" }
            td { class: "text-right", "{loan.interest_rate}" }
            td {
                span { class: "{status_class}", "{loan.status.label()}" }
            }
            td { "{loan.repayment_label()}" }
            td { class: "text-right", "{loan.remaining_label()}" }
        }
    }
}

/// Rows-per-page selector and previous/next buttons.
#[component]
pub fn Pagination(query: LoanQuery, page: LoanPage, on_change: EventHandler<LoanQuery>) -> Element {
    let range = page.range_label(&query);
    let has_prev = query.has_prev();
    let has_next = page.has_next(&query);

    rsx! {
        div { class: "pagination",
            label { class: "form-label form-label-inline", r#for: "rows-per-page", "Rows per page" }
            select {
                id: "rows-per-page",
                class: "form-input form-input-sm",
                value: "{query.per_page}",
                onchange: move |e| {
                    if let Ok(per_page) = e.value().parse() {
                        on_change.call(query.with_per_page(per_page));
                    }
                },
                for size in PAGE_SIZES {
                    option { key: "{size}", value: "{size}", "{size}" }
                }
            }
            span { class: "pagination-range", "{range}" }
            button {
                class: "btn btn-secondary btn-sm",
                disabled: !has_prev,
                onclick: move |_| on_change.call(query.prev()),
                "Previous"
            }
            button {
                class: "btn btn-secondary btn-sm",
                disabled: !has_next,
                onclick: move |_| on_change.call(query.next()),
                "Next"
            }
        }
    }
}
