use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyTier {
    pub name: String,
    pub threshold: u32,
}

impl LoyaltyTier {
    pub fn new(name: impl Into<String>, threshold: u32) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }

    /// Bronze, Silver, Gold and Platinum, lowest first.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Bronze", 0),
            Self::new("Silver", 500),
            Self::new("Gold", 1500),
            Self::new("Platinum", 3000),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierProgress {
    pub current: LoyaltyTier,
    pub next: Option<LoyaltyTier>,
    /// 0..=100
    pub percent: u8,
    pub points_to_next: u32,
}

/// Where `points` sits between its tier and the next one.
///
/// `tiers` may be in any order. Returns `None` only when no tier applies,
/// i.e. the list is empty or every threshold is above `points`.
pub fn tier_progress(points: u32, tiers: &[LoyaltyTier]) -> Option<TierProgress> {
    let mut sorted: Vec<&LoyaltyTier> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.threshold);

    let current_idx = sorted.iter().rposition(|t| t.threshold <= points)?;
    let current = sorted[current_idx];
    let next = sorted.get(current_idx + 1).copied();

    let (percent, points_to_next) = match next {
        Some(next) => {
            let span = u64::from(next.threshold - current.threshold);
            let done = u64::from(points - current.threshold);
            let percent = if span == 0 { 100 } else { (done * 100 / span).min(100) };
            (percent as u8, next.threshold - points)
        }
        None => (100, 0),
    };

    Some(TierProgress {
        current: current.clone(),
        next: next.cloned(),
        percent,
        points_to_next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_the_lowest_tier() {
        let progress = tier_progress(0, &LoyaltyTier::defaults()).unwrap();
        assert_eq!(progress.current.name, "Bronze");
        assert_eq!(progress.next.unwrap().name, "Silver");
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.points_to_next, 500);
    }

    #[test]
    fn progress_is_relative_to_current_threshold() {
        let progress = tier_progress(1000, &LoyaltyTier::defaults()).unwrap();
        assert_eq!(progress.current.name, "Silver");
        assert_eq!(progress.percent, 50);
        assert_eq!(progress.points_to_next, 500);
    }

    #[test]
    fn reaching_a_threshold_enters_the_tier() {
        let progress = tier_progress(1500, &LoyaltyTier::defaults()).unwrap();
        assert_eq!(progress.current.name, "Gold");
        assert_eq!(progress.percent, 0);
    }

    #[test]
    fn top_tier_is_complete() {
        let progress = tier_progress(9000, &LoyaltyTier::defaults()).unwrap();
        assert_eq!(progress.current.name, "Platinum");
        assert_eq!(progress.next, None);
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.points_to_next, 0);
    }

    #[test]
    fn tier_order_does_not_matter() {
        let mut tiers = LoyaltyTier::defaults();
        tiers.reverse();
        assert_eq!(tier_progress(700, &tiers).unwrap().current.name, "Silver");
    }

    #[test]
    fn no_applicable_tier() {
        assert_eq!(tier_progress(10, &[]), None);
        assert_eq!(tier_progress(10, &[LoyaltyTier::new("Gold", 100)]), None);
    }
}
