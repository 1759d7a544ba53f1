pub mod webhook;

pub use webhook::mobile_push_webhook;
