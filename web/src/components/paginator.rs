//! Page buttons under a listing.

use leptos::prelude::*;
use taskmap_common::fetch::Pagination;
use taskmap_common::QueryUpdate;

/// Page slots shown by the paginator; `None` is a gap.
pub fn page_slots(current: u32, pages: u32) -> Vec<Option<u32>> {
    if pages <= 7 {
        return (1..=pages).map(Some).collect();
    }
    let current = current.clamp(1, pages);
    let (start, end) = if current <= 4 {
        (2, 5)
    } else if current >= pages - 3 {
        (pages - 4, pages - 1)
    } else {
        (current - 1, current + 1)
    };

    let mut slots = vec![Some(1)];
    if start > 2 {
        slots.push(None);
    }
    slots.extend((start..=end).map(Some));
    if end < pages - 1 {
        slots.push(None);
    }
    slots.push(Some(pages));
    slots
}

#[component]
pub fn ProjectCardPaginator(pagination: Pagination, set_query: Callback<QueryUpdate>) -> impl IntoView {
    if pagination.pages <= 1 {
        return ().into_any();
    }

    let current = pagination.page;
    let buttons = page_slots(current, pagination.pages)
        .into_iter()
        .map(|slot| match slot {
            Some(page) => view! {
                <button
                    class="page-button"
                    class:active={page == current}
                    on:click=move |_| set_query.run(QueryUpdate::new().set("page", page))
                >
                    {page}
                </button>
            }
            .into_any(),
            None => view! { <span class="page-gap">"…"</span> }.into_any(),
        })
        .collect_view();

    view! { <div class="paginator">{buttons}</div> }.into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_few_pages_all_shown() {
        assert_eq!(page_slots(2, 3), vec![Some(1), Some(2), Some(3)]);
        assert!(page_slots(1, 0).is_empty());
    }

    #[test]
    fn test_gaps_around_current_page() {
        assert_eq!(
            page_slots(10, 20),
            vec![Some(1), None, Some(9), Some(10), Some(11), None, Some(20)]
        );
        assert_eq!(
            page_slots(1, 20),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(20)]
        );
        assert_eq!(
            page_slots(20, 20),
            vec![Some(1), None, Some(16), Some(17), Some(18), Some(19), Some(20)]
        );
    }
}
