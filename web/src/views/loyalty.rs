use crate::use_error;
use dioxus::prelude::*;
use types::{
    loyalty::{LoyaltyTier, tier_progress},
    models::{CustomerColumn, CustomerPoints},
    table::{Page, SortDirection, SortState, paginate, sort_rows},
};
use ui::{Badge, BadgeVariant, EmptyState, Loading, PageHeader, Pagination, ProgressBar, SortableHeader};

fn tier_variant(tier: &str) -> BadgeVariant {
    match tier {
        "Platinum" | "Gold" => BadgeVariant::Success,
        "Silver" => BadgeVariant::Warning,
        _ => BadgeVariant::Neutral,
    }
}

#[component]
fn TierCell(points: u32, tiers: Vec<LoyaltyTier>) -> Element {
    let Some(progress) = tier_progress(points, &tiers) else {
        return rsx! { span { class: "text-muted", "-" } };
    };

    let hint = match &progress.next {
        Some(next) => format!("{} points to {}", progress.points_to_next, next.name),
        None => "Top tier".to_string(),
    };

    rsx! {
        div { class: "tier-cell",
            Badge {
                variant: tier_variant(&progress.current.name),
                label: progress.current.name.clone(),
            }
            ProgressBar { percent: progress.percent }
            span { class: "text-muted text-sm", "{hint}" }
        }
    }
}

#[component]
pub fn Loyalty() -> Element {
    let mut customers = use_signal(Vec::<CustomerPoints>::new);
    let mut loading = use_signal(|| true);
    let mut error_state = use_error();
    let mut sort = use_signal(|| SortState {
        column: CustomerColumn::Points,
        direction: SortDirection::Descending,
    });
    let mut page = use_signal(Page::default);
    let tiers = use_hook(LoyaltyTier::defaults);

    use_effect(move || {
        spawn(async move {
            loading.set(true);
            match api::list_loyalty().await {
                Ok(c) => customers.set(c),
                Err(e) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    });

    let sorted = use_memo(move || {
        let mut rows = customers.read().clone();
        sort_rows(&mut rows, sort());
        rows
    });

    let mut on_sort = move |column: CustomerColumn| {
        sort.write().toggle(column);
        page.set(Page::first(page().size));
    };

    let visible = paginate(&sorted.read(), page()).to_vec();

    rsx! {
        div {
            PageHeader {
                title: "Loyalty Points",
                subtitle: "Customer point balances and tiers.",
                actions: rsx! {
                    div { class: "tier-legend",
                        for tier in tiers.iter() {
                            span { key: "{tier.name}", class: "text-muted text-sm",
                                "{tier.name} {tier.threshold}+ "
                            }
                        }
                    }
                },
            }

            if loading() {
                Loading { label: "Loading loyalty points..." }
            } else if sorted.read().is_empty() {
                div { class: "card",
                    EmptyState { message: "No customers have earned points yet." }
                }
            } else {
                div { class: "card",
                    div { class: "table-container",
                        table {
                            thead {
                                tr {
                                    SortableHeader {
                                        label: "Customer",
                                        direction: sort.read().direction_for(CustomerColumn::Name),
                                        on_sort: move |_| on_sort(CustomerColumn::Name),
                                    }
                                    th { "Email" }
                                    SortableHeader {
                                        label: "Points",
                                        direction: sort.read().direction_for(CustomerColumn::Points),
                                        on_sort: move |_| on_sort(CustomerColumn::Points),
                                    }
                                    th { "Tier" }
                                }
                            }
                            tbody {
                                for customer in visible {
                                    tr { key: "{customer.customer_id}",
                                        td { "{customer.customer_name}" }
                                        td { "{customer.email}" }
                                        td { class: "form-value-mono", "{customer.points}" }
                                        td {
                                            TierCell { points: customer.points, tiers: tiers.clone() }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    Pagination {
                        page: page(),
                        len: sorted.read().len(),
                        on_change: move |p| page.set(p),
                    }
                }
            }
        }
    }
}
