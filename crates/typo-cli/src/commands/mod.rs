pub mod diff;
pub mod dispatch;
pub mod history;
pub mod revision;
pub mod schema;
