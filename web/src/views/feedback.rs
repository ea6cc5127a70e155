use crate::use_error;
use dioxus::prelude::*;
use types::{
    format::{format_timestamp, initials},
    models::{Feedback, average_rating},
};
use ui::{EmptyState, Loading, PageHeader, StarRating};

/// Newest first, keeping only reviews rated at least `min_rating`.
fn filter_feedback(feedback: &[Feedback], min_rating: u8) -> Vec<Feedback> {
    let mut kept: Vec<Feedback> = feedback
        .iter()
        .filter(|f| f.clamped_rating() >= min_rating)
        .cloned()
        .collect();
    kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    kept
}

#[component]
pub fn FeedbackList() -> Element {
    let mut feedback = use_signal(Vec::<Feedback>::new);
    let mut timezone = use_signal(|| "UTC".to_string());
    let mut loading = use_signal(|| true);
    let mut error_state = use_error();
    let mut min_rating = use_signal(|| 0u8);

    use_effect(move || {
        spawn(async move {
            loading.set(true);

            let feedback_result = api::list_feedback().await;
            let tz_result = api::display_timezone().await;

            match (feedback_result, tz_result) {
                (Ok(f), Ok(tz)) => {
                    feedback.set(f);
                    timezone.set(tz);
                }
                (Err(e), _) | (_, Err(e)) => error_state.set_server_error(&e),
            }
            loading.set(false);
        });
    });

    let shown = filter_feedback(&feedback.read(), min_rating());
    let average = average_rating(&feedback.read()).map(|a| (format!("{a:.1}"), a.round() as u8));
    let total = feedback.read().len();
    let tz_name = timezone.read().clone();

    rsx! {
        div {
            PageHeader {
                title: "Customer Feedback",
                subtitle: "Reviews left by customers of your service center.",
                actions: rsx! {
                    select {
                        class: "form-input",
                        value: "{min_rating}",
                        onchange: move |e| {
                            if let Ok(v) = e.value().parse() {
                                min_rating.set(v);
                            }
                        },
                        option { value: "0", "All ratings" }
                        for stars in (1..=Feedback::MAX_RATING).rev() {
                            option { key: "{stars}", value: "{stars}", "{stars}+ stars" }
                        }
                    }
                },
            }

            if loading() {
                Loading { label: "Loading feedback..." }
            } else {
                if let Some((average, stars)) = average {
                    div { class: "card feedback-summary",
                        div { class: "card-body",
                            span { class: "feedback-average", "{average}" }
                            StarRating { rating: stars }
                            span { class: "text-muted", " from {total} reviews" }
                        }
                    }
                }
                if shown.is_empty() {
                    div { class: "card",
                        EmptyState { message: "No feedback matches this filter." }
                    }
                } else {
                    div { class: "feedback-grid",
                        for review in shown {
                            div { key: "{review.id}", class: "card feedback-card",
                                div { class: "card-header",
                                    div { class: "sidebar-avatar", "{initials(&review.client_name)}" }
                                    div {
                                        div { class: "feedback-client", "{review.client_name}" }
                                        div { class: "text-muted text-sm",
                                            "{format_timestamp(review.created_at, &tz_name)}"
                                        }
                                    }
                                    StarRating { rating: review.clamped_rating() }
                                }
                                div { class: "card-body",
                                    if review.comment.is_empty() {
                                        p { class: "text-muted", "No comment left." }
                                    } else {
                                        p { "{review.comment}" }
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

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use uuid::Uuid;

    fn review(rating: u8, seconds: i64) -> Feedback {
        Feedback {
            id: Uuid::from_u128(seconds as u128),
            client_name: "Kamal".to_string(),
            rating,
            service_center: "Colombo North".to_string(),
            comment: String::new(),
            created_at: Timestamp::from_second(seconds).unwrap(),
        }
    }

    #[test]
    fn filter_keeps_ratings_at_or_above_minimum() {
        let all = vec![review(2, 10), review(4, 20), review(5, 30)];
        let kept = filter_feedback(&all, 4);
        assert_eq!(kept.iter().map(|f| f.rating).collect::<Vec<_>>(), vec![5, 4]);
    }

    #[test]
    fn zero_minimum_keeps_everything_newest_first() {
        let all = vec![review(3, 10), review(1, 30), review(5, 20)];
        let kept = filter_feedback(&all, 0);
        assert_eq!(kept.iter().map(|f| f.rating).collect::<Vec<_>>(), vec![1, 5, 3]);
    }
}
