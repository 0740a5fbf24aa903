//! Administrative commands behind the `printshop-cli` binary.

use std::{path::Path, time::Duration};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use printshop_auth::{AuthError, SecretStore, SecretStoreError, SessionManager, TokenPurpose};
use printshop_models::{
    RegisterRequest, User, UserChanges, UserId, UserRole,
    producers::CreateProducerRequest,
    products::{CreateProductRequest, ProductStatus},
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::modules::{producers::service::ProducerService, products::service::ProductService};

#[derive(Debug)]
pub enum CreateAdminOutcome {
    Created(User),
    EmailTaken,
}

/// Registers a regular account and promotes it to admin.
pub async fn create_admin(
    sessions: &SessionManager,
    request: RegisterRequest,
) -> anyhow::Result<CreateAdminOutcome> {
    request.validate().context("invalid admin details")?;

    let user = match sessions.register(request).await {
        Ok(user) => user,
        Err(AuthError::EmailAlreadyExists) => return Ok(CreateAdminOutcome::EmailTaken),
        Err(e) => return Err(e).context("failed to register user"),
    };

    let changes = UserChanges {
        role: Some(UserRole::Admin),
        ..Default::default()
    };
    let admin = sessions
        .directory()
        .update(user.id, changes)
        .await
        .context("failed to promote user")?
        .ok_or_else(|| anyhow!("user {} disappeared before promotion", user.id))?;

    info!(user.id = %admin.id, "Admin created");
    Ok(CreateAdminOutcome::Created(admin))
}

#[derive(Debug, Deserialize)]
pub struct DemoEntry {
    pub producer: CreateProducerRequest,
    #[serde(default)]
    pub products: Vec<DemoProduct>,
}

#[derive(Debug, Deserialize)]
pub struct DemoProduct {
    pub name: String,
    pub price: f64,
    pub status: ProductStatus,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub producers: usize,
    pub products: usize,
}

pub fn parse_demo_data(raw: &str) -> anyhow::Result<Vec<DemoEntry>> {
    let entries: Vec<DemoEntry> = serde_json::from_str(raw).context("malformed demo data")?;
    for entry in &entries {
        entry
            .producer
            .validate()
            .with_context(|| format!("invalid producer {:?}", entry.producer.name))?;
    }
    Ok(entries)
}

/// Loads producers and their products from a JSON file.
pub async fn add_demo_data(db: &PgPool, path: &Path) -> anyhow::Result<DemoSummary> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries = parse_demo_data(&raw)?;

    let mut summary = DemoSummary::default();
    for entry in entries {
        let producer = ProducerService::create_producer(db, entry.producer)
            .await
            .map_err(|e| e.error.context("failed to create producer"))?;
        summary.producers += 1;

        for product in entry.products {
            let request = CreateProductRequest {
                name: product.name,
                price: product.price,
                producer_id: producer.id,
                status: product.status,
            };
            request
                .validate()
                .with_context(|| format!("invalid product {:?}", request.name))?;
            ProductService::create_product(db, request)
                .await
                .map_err(|e| e.error.context("failed to create product"))?;
            summary.products += 1;
        }
    }

    Ok(summary)
}

/// Secret store for CLI sessions, which register users but never issue tokens.
#[derive(Debug, Default)]
pub struct OfflineSecretStore;

#[async_trait]
impl SecretStore for OfflineSecretStore {
    async fn set_secret(
        &self,
        _user_id: UserId,
        purpose: TokenPurpose,
        _secret: &str,
        _ttl: Duration,
    ) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::Unavailable(anyhow!(
            "cannot store {purpose} secret from the CLI"
        )))
    }

    async fn get_secret(
        &self,
        _user_id: UserId,
        _purpose: TokenPurpose,
    ) -> Result<String, SecretStoreError> {
        Err(SecretStoreError::NotFound)
    }

    async fn delete_secret(
        &self,
        _user_id: UserId,
        _purpose: TokenPurpose,
    ) -> Result<(), SecretStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printshop_auth::memory::MemoryUserDirectory;
    use printshop_core::CredentialHasher;
    use printshop_models::UserStatus;
    use std::sync::Arc;

    fn sessions() -> SessionManager {
        SessionManager::new(
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(OfflineSecretStore),
            CredentialHasher::salted_sha256("cli-salt"),
            Duration::from_secs(60),
            Duration::from_secs(60),
        )
    }

    fn admin_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Anna".into(),
            last_name: "Smirnova".into(),
            email: email.into(),
            password: "adminpass123".into(),
        }
    }

    #[tokio::test]
    async fn test_create_admin_promotes_new_user() {
        let sessions = sessions();

        let outcome = create_admin(&sessions, admin_request("anna@example.com"))
            .await
            .unwrap();

        let CreateAdminOutcome::Created(admin) = outcome else {
            panic!("expected a new admin");
        };
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_create_admin_with_taken_email() {
        let sessions = sessions();
        create_admin(&sessions, admin_request("anna@example.com"))
            .await
            .unwrap();

        let outcome = create_admin(&sessions, admin_request("anna@example.com"))
            .await
            .unwrap();
        assert!(matches!(outcome, CreateAdminOutcome::EmailTaken));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_invalid_details() {
        let mut request = admin_request("not-an-email");
        request.password = "short".into();

        assert!(create_admin(&sessions(), request).await.is_err());
    }

    #[tokio::test]
    async fn test_offline_store_cannot_issue_tokens() {
        let sessions = sessions();
        create_admin(&sessions, admin_request("anna@example.com"))
            .await
            .unwrap();

        let err = sessions
            .login("anna@example.com", "adminpass123")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_parse_demo_data() {
        let raw = r#"[
            {
                "producer": {"name": "Epson", "description": "Japanese printer maker"},
                "products": [
                    {"name": "EcoTank L3250", "price": 189.99, "status": "published"},
                    {"name": "WorkForce WF-2930", "price": 79.5, "status": "hidden"}
                ]
            },
            {"producer": {"name": "Brother", "description": "Laser printers"}}
        ]"#;

        let entries = parse_demo_data(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].products.len(), 2);
        assert_eq!(entries[0].products[1].status, ProductStatus::Hidden);
        assert!(entries[1].products.is_empty());
    }

    #[test]
    fn test_parse_demo_data_rejects_invalid_producer() {
        let raw = r#"[{"producer": {"name": "HP", "description": "Printers"}}]"#;
        assert!(parse_demo_data(raw).is_err());
    }

    #[test]
    fn test_demo_file_is_valid() {
        let raw = include_str!("../../demo/demo-data.json");
        let entries = parse_demo_data(raw).unwrap();
        assert!(!entries.is_empty());
    }
}
