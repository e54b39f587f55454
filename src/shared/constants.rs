/// Longest free-text search term accepted by the search endpoint
pub const MAX_SEARCH_QUERY_LENGTH: usize = 200;

/// Longest review comment accepted
pub const MAX_REVIEW_COMMENT_LENGTH: u64 = 2000;

/// Inclusive bounds for a review rating
pub const MIN_REVIEW_RATING: i16 = 1;
pub const MAX_REVIEW_RATING: i16 = 5;
