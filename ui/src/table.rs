use dioxus::prelude::*;
use types::table::{Page, SortDirection, total_pages};

/// Column header that reports clicks; the arrow shows the active direction.
#[component]
pub fn SortableHeader(
    label: String,
    direction: Option<SortDirection>,
    on_sort: EventHandler<()>,
) -> Element {
    rsx! {
        th {
            class: if direction.is_some() { "sortable sorted" } else { "sortable" },
            onclick: move |_| on_sort.call(()),
            "{label}"
            if let Some(direction) = direction {
                span { class: "sort-arrow", " {direction.arrow()}" }
            }
        }
    }
}

#[component]
pub fn Pagination(page: Page, len: usize, on_change: EventHandler<Page>) -> Element {
    let pages = total_pages(len, page.size);
    if pages <= 1 {
        return rsx! {};
    }

    let summary = page
        .range(len)
        .map(|(first, last)| format!("Showing {first}-{last} of {len}"))
        .unwrap_or_default();

    let go = move |number: usize| on_change.call(Page { number, ..page });

    rsx! {
        div { class: "pagination",
            span { class: "pagination-summary text-muted", "{summary}" }
            div { class: "pagination-controls",
                button {
                    class: "btn btn-secondary btn-sm",
                    disabled: page.number <= 1,
                    onclick: move |_| go(page.number - 1),
                    "Previous"
                }
                for number in 1..=pages {
                    button {
                        key: "{number}",
                        class: if number == page.number { "btn btn-primary btn-sm" } else { "btn btn-secondary btn-sm" },
                        onclick: move |_| go(number),
                        "{number}"
                    }
                }
                button {
                    class: "btn btn-secondary btn-sm",
                    disabled: page.number >= pages,
                    onclick: move |_| go(page.number + 1),
                    "Next"
                }
            }
        }
    }
}
