use dioxus::prelude::*;
use types::{LoanMetrics, rupees};

#[component]
pub fn MetricCard(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "card metric-card",
            div { class: "metric-label", "{label}" }
            div { class: "metric-value", "{value}" }
        }
    }
}

/// Headline numbers plus the active/completed split.
#[component]
pub fn KeyMetrics(metrics: LoanMetrics) -> Element {
    let shares: Vec<_> = metrics
        .status_shares()
        .into_iter()
        .map(|share| {
            let class = format!("status-{}", share.status);
            let width = format!("width: {:.2}%", share.percent);
            let legend = format!(
                "{}: {} ({:.0}%)",
                share.status.label(),
                share.count,
                share.percent
            );
            (class, width, legend)
        })
        .collect();

    rsx! {
        div { class: "metrics-grid",
            MetricCard { label: "Total Loans", value: metrics.total_loans.to_string() }
            MetricCard { label: "Total Amount Lent", value: rupees(metrics.total_amount_lent) }
            MetricCard { label: "Active Loans", value: metrics.active_loans.to_string() }
            MetricCard { label: "Completed Loans", value: metrics.completed_loans.to_string() }
        }
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "Loan Status Distribution" }
            }
            div { class: "card-body",
                if metrics.total_loans == 0 {
                    p { class: "text-muted", "No loans yet." }
                } else {
                    div { class: "status-bar",
                        for (class, width, legend) in shares.iter().cloned() {
                            div {
                                key: "{class}",
                                class: "status-bar-segment {class}",
                                style: "{width}",
                                title: "{legend}",
                            }
                        }
                    }
                    ul { class: "status-legend",
                        for (class, _, legend) in shares {
                            li { key: "{class}",
                                span { class: "legend-swatch {class}" }
                                "{legend}"
                            }
                        }
                    }
                }
            }
        }
    }
}
