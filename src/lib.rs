pub mod error;
pub mod events;
pub mod fotmob;
pub mod handler;
pub mod logging;
pub mod mastodon;
pub mod mistral;
pub mod model;
pub mod notify;
pub mod orchestrator;
pub mod resolver;
pub mod rotation;
pub mod scheduler;
pub mod secrets;
pub mod settings;
pub mod store;
pub mod twilio;

pub use error::{Error, Result};
