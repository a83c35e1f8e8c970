pub mod chat;
pub mod dispatch;
pub mod list;
pub mod refresh;
pub mod show;
