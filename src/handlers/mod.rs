pub mod auth;
pub mod feedback;
pub mod orders;
pub mod profile;
pub mod wallet;
