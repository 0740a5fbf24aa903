use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use printshop_models::{
    LoginRequest, RefreshTokenRequest, RegisterRequest, TokenPair, User, UserRole, UserStatus,
    cart::{AddToCartRequest, CartItem},
    orders::{Order, OrderItem, OrderProductRequest, OrderStatus, UpdateOrderRequest},
    producers::{CreateProducerRequest, Producer, UpdateProducerRequest},
    products::{CreateProductRequest, Product, ProductStatus, UpdateProductRequest},
    users::{UpdateProfileRequest, UpdateUserRequest},
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::refresh_tokens,
        crate::modules::auth::controller::logout,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::producers::controller::list_producers,
        crate::modules::producers::controller::get_producer,
        crate::modules::producers::controller::create_producer,
        crate::modules::producers::controller::update_producer,
        crate::modules::producers::controller::delete_producer,
        crate::modules::products::controller::list_products,
        crate::modules::products::controller::get_product,
        crate::modules::products::controller::create_product,
        crate::modules::products::controller::update_product,
        crate::modules::products::controller::delete_product,
        crate::modules::cart::controller::get_cart,
        crate::modules::cart::controller::set_cart_item,
        crate::modules::orders::controller::list_orders,
        crate::modules::orders::controller::create_order,
        crate::modules::orders::controller::get_order,
        crate::modules::orders::controller::update_order,
        crate::modules::orders::controller::delete_order,
    ),
    components(
        schemas(
            ErrorResponse,
            LoginRequest,
            RegisterRequest,
            RefreshTokenRequest,
            TokenPair,
            User,
            UserRole,
            UserStatus,
            UpdateProfileRequest,
            UpdateUserRequest,
            Producer,
            CreateProducerRequest,
            UpdateProducerRequest,
            Product,
            ProductStatus,
            CreateProductRequest,
            UpdateProductRequest,
            CartItem,
            AddToCartRequest,
            Order,
            OrderItem,
            OrderStatus,
            OrderProductRequest,
            UpdateOrderRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration and token rotation"),
        (name = "Profile", description = "The signed-in user's own account"),
        (name = "Users", description = "User administration"),
        (name = "Producers", description = "Catalog producers"),
        (name = "Products", description = "Catalog products"),
        (name = "Cart", description = "The signed-in user's cart"),
        (name = "Orders", description = "Orders placed from the cart")
    ),
    info(
        title = "Printshop API",
        version = "0.1.0",
        description = "Printer shop backend with per-user rotating token secrets.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_versioned_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/auth"));
        assert!(doc.paths.paths.contains_key("/api/v1/orders/{id}"));
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
