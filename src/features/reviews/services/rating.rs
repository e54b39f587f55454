use rust_decimal::{Decimal, RoundingStrategy};

/// Mean of the review ratings, rounded half away from zero to one decimal.
/// A pharmacy without reviews is rated 0.
pub fn average_rating(ratings: &[i16]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }

    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len()))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
