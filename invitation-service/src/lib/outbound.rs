pub mod notifications;
pub mod repositories;
