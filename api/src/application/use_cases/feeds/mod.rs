pub mod for_you_feed;
pub mod global_feed;
