pub mod controller;
pub mod router;

pub use router::{init_auth_gated_router, init_auth_router};
