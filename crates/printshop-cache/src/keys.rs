//! Secret key layout.
//!
//! Access secrets live under `token_<user id>` and refresh secrets under
//! `refresh_<user id>`, optionally behind a `<namespace>:` prefix.

use printshop_auth::TokenPurpose;
use printshop_models::UserId;

pub fn secret_key(namespace: &str, purpose: TokenPurpose, user_id: UserId) -> String {
    if namespace.is_empty() {
        format!("{}{}", purpose.key_prefix(), user_id)
    } else {
        format!("{}:{}{}", namespace, purpose.key_prefix(), user_id)
    }
}
