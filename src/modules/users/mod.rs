pub mod controller;
pub mod directory;
pub mod router;
pub mod service;

pub use directory::PgUserDirectory;
pub use router::{init_profile_router, init_users_router};
