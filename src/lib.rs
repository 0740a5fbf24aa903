//! # Printshop API
//!
//! Backend for a printer shop: catalog, cart and orders behind a session
//! layer whose tokens are revoked by rotating per-user signing secrets.
//!
//! ## Layout
//!
//! ```text
//! src/
//! ├── cli/          # create-admin, add-demo-data
//! ├── middleware/   # Authorization Gate and caller extractors
//! ├── modules/      # auth, users (+profile), producers, products, cart, orders
//! ├── docs.rs       # OpenAPI
//! ├── router.rs     # route tree and layers
//! ├── state.rs      # shared application state
//! └── validator.rs  # ValidatedJson / QueryParams extractors
//! ```
//!
//! The auth engine itself lives in `printshop-auth`; Redis storage for the
//! signing secrets in `printshop-cache`.
//!
//! ## Access control
//!
//! Each route template and method is mapped to the roles allowed to call it in
//! `config/access.json`. Callers without a token are guests. Unlisted routes
//! are denied.
//!
//! ## API documentation
//!
//! - Swagger UI: `/swagger-ui`
//! - Scalar: `/scalar`

pub mod cli;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use printshop_auth;
pub use printshop_config;
pub use printshop_core;
pub use printshop_db;
pub use printshop_models;
