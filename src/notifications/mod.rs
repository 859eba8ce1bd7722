//! Client notification state and the operations that keep it current.

mod service;
mod state;

pub use service::NotificationService;
pub use state::NotificationState;
