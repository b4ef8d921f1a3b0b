pub mod event;
pub mod guest;
pub mod memory;
pub mod retry;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod test_db;

pub use event::PostgresEventRepository;
pub use guest::PostgresGuestRepository;
pub use memory::InMemoryStore;
pub use retry::StoragePolicy;
pub use session::PostgresSessionStore;
pub use user::PostgresCredentialStore;
