use dioxus::prelude::*;
use types::{AgentOutstanding, LoanMetrics, Payment, rupees};
use ui::{KeyMetrics, Loadable, LoansTable};

use super::components::PageHeader;
use crate::use_error;

const RECENT_PAYMENTS: usize = 10;

#[component]
pub fn AdminOverview() -> Element {
    let mut error_state = use_error();
    let mut metrics = use_signal(|| Loadable::<LoanMetrics>::Loading);
    let mut summary = use_signal(|| Loadable::<Vec<AgentOutstanding>>::Loading);
    let mut payments = use_signal(|| Loadable::<Vec<Payment>>::Loading);

    // Each section loads on its own so one failing call leaves the rest up.
    let refresh = move || {
        spawn(async move {
            let result = api::loan_metrics().await;
            if let Err(e) = &result {
                error_state.set_server_error(e);
            }
            metrics.set(Loadable::settle(&result));
        });
        spawn(async move {
            let result = api::loan_summary().await;
            if let Err(e) = &result {
                error_state.set_server_error(e);
            }
            summary.set(Loadable::settle(&result));
        });
        spawn(async move {
            let result = api::list_payments().await;
            if let Err(e) = &result {
                error_state.set_server_error(e);
            }
            payments.set(Loadable::settle(&result));
        });
    };

    use_effect(move || {
        refresh();
    });

    let metrics_view = match metrics() {
        Loadable::Ready(m) => rsx! {
            KeyMetrics { metrics: m }
        },
        Loadable::Loading => rsx! {
            div { class: "loading", "Loading metrics..." }
        },
        Loadable::Failed(message) => rsx! {
            p { class: "form-error", "Metrics unavailable: {message}" }
        },
    };

    rsx! {
        div {
            div { class: "page-header",
                PageHeader {
                    title: "Admin Dashboard",
                    subtitle: "Loan book overview across all agents.",
                }
            }

            {metrics_view}

            LoansTable {
                on_refresh: move |_| {
                    refresh();
                },
            }

            div { class: "grid grid-cols-2",
                OutstandingByAgent { state: summary() }
                RecentPayments { state: payments() }
            }
        }
    }
}

/// Placeholder for a section that has not loaded, or failed to.
fn section_status<T>(state: &Loadable<T>, what: &str) -> Element {
    match state {
        Loadable::Loading => rsx! {
            div { class: "loading", "Loading {what}..." }
        },
        Loadable::Failed(message) => rsx! {
            div { class: "card-body",
                p { class: "form-error", "Could not load {what}: {message}" }
            }
        },
        Loadable::Ready(_) => rsx! {},
    }
}

#[component]
fn OutstandingByAgent(state: Loadable<Vec<AgentOutstanding>>) -> Element {
    let Some(rows) = state.ready().cloned() else {
        return rsx! {
            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Outstanding by Agent" }
                }
                {section_status(&state, "the summary")}
            }
        };
    };

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "Outstanding by Agent" }
            }
            div { class: "table-container",
                table {
                    thead {
                        tr {
                            th { "Agent" }
                            th { class: "text-right", "Total Outstanding" }
                        }
                    }
                    tbody {
                        if rows.is_empty() {
                            tr {
                                td { colspan: "2", class: "text-muted text-center", "Nothing outstanding." }
                            }
                        }
                        for row in rows {
                            tr { key: "{row.agent_name}",
                                td { "{row.agent_name}" }
                                td { class: "text-right", {rupees(row.total_outstanding)} }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RecentPayments(state: Loadable<Vec<Payment>>) -> Element {
    let Some(payments) = state.ready().cloned() else {
        return rsx! {
            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Recent Payments" }
                }
                {section_status(&state, "payments")}
            }
        };
    };

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "Recent Payments" }
            }
            div { class: "table-container",
                table {
                    thead {
                        tr {
                            th { "Payment" }
                            th { "Loan" }
                            th { "Date" }
                            th { class: "text-right", "Amount Paid" }
                        }
                    }
                    tbody {
                        if payments.is_empty() {
                            tr {
                                td { colspan: "4", class: "text-muted text-center", "No payments recorded yet." }
                            }
                        }
                        for payment in payments.into_iter().take(RECENT_PAYMENTS) {
                            tr { key: "{payment.id}",
                                td { "#{payment.id}" }
                                td { "#{payment.loan_id}" }
                                td {
                                    {payment.payment_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())}
                                }
                                td { class: "text-right", {rupees(payment.amount_paid)} }
                            }
                        }
                    }
                }
            }
        }
    }
}
