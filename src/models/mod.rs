//! Data models for the notice board API.
//!
//! Field names follow the server's JSON documents (`_id`, camelCase) so the
//! types decode responses directly.

mod notice;
mod notification;
mod user;

pub use notice::*;
pub use notification::*;
pub use user::*;
