mod review_handler;

pub use review_handler::*;
