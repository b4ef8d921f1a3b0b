pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::confirmation;
pub use domain::dashboard;
pub use domain::event;
pub use domain::guest;
pub use domain::session;
pub use domain::user;
pub use outbound::repositories;
