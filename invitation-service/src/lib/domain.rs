pub mod confirmation;
pub mod dashboard;
pub mod errors;
pub mod event;
pub mod guest;
pub mod session;
pub mod user;
