//! Test Helpers

use crate::{
    auth::{AuthService, AuthServiceError, Principal, Role, Signup},
    domain::{
        addresses::models::NewAddress,
        catalog::models::{NewProduct, ProductUuid},
    },
    test::TestContext,
};

/// Sign up a customer named "Ada Lovelace" and return their principal.
pub(crate) async fn create_customer(
    ctx: &TestContext,
    email: &str,
) -> Result<Principal, AuthServiceError> {
    let issued = ctx
        .auth
        .signup(Signup {
            email: email.to_string(),
            password: "correct horse".to_string(),
            full_name: "Ada Lovelace".to_string(),
        })
        .await?;

    Ok(Principal::customer(issued.profile.uuid))
}

/// Sign up a user and promote them to admin.
pub(crate) async fn create_admin(
    ctx: &TestContext,
    email: &str,
) -> Result<Principal, AuthServiceError> {
    let customer = create_customer(ctx, email).await?;

    ctx.auth.set_role(email, Role::Admin).await?;

    Ok(Principal::admin(customer.user))
}

/// An active, uncategorised product whose slug is derived from `name`.
pub(crate) fn new_product(name: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        category_uuid: None,
        name: name.to_string(),
        slug: String::new(),
        description: None,
        price,
        compare_at_price: None,
        images: vec![format!(
            "https://cdn.example.com/{}.jpg",
            name.to_lowercase()
        )],
        stock,
        is_active: true,
        is_featured: false,
    }
}

pub(crate) fn new_address() -> NewAddress {
    NewAddress {
        full_name: "Ada Lovelace".to_string(),
        phone: Some("+44 20 7946 0000".to_string()),
        address_line1: "12 St James's Square".to_string(),
        address_line2: None,
        city: "London".to_string(),
        state: None,
        postal_code: "SW1Y 4JH".to_string(),
        country: "GB".to_string(),
        is_default: false,
    }
}
