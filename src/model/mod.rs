pub mod fixture;
pub mod fotmob;
pub mod mastodon;
