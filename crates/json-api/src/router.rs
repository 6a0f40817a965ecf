//! API Router

use salvo::Router;

use crate::{
    addresses, admin,
    auth::{
        self,
        middleware::{authenticate, require_admin},
    },
    cart, catalog, deals, orders, pricing, reviews,
};

/// Routes mounted under `/api`.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(public_routes())
        .push(
            Router::new()
                .hoop(authenticate)
                .push(customer_routes())
                .push(Router::with_path("admin").hoop(require_admin).push(admin_routes())),
        )
}

fn public_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("auth")
                .push(Router::with_path("signup").post(auth::signup::handler))
                .push(Router::with_path("login").post(auth::login::handler))
                .push(Router::with_path("verify-email").post(auth::verify_email::handler)),
        )
        .push(
            Router::with_path("categories")
                .get(catalog::list_categories::handler)
                .push(Router::with_path("{slug}").get(catalog::get_category::handler)),
        )
        .push(
            Router::with_path("products")
                .get(catalog::list_products::handler)
                .push(
                    Router::with_path("{slug}")
                        .get(catalog::get_product::handler)
                        .push(Router::with_path("reviews").get(reviews::index::handler)),
                ),
        )
        .push(Router::with_path("deals/active").get(deals::active::handler))
        .push(Router::with_path("pricing").get(pricing::handler))
}

fn customer_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("auth")
                .push(Router::with_path("logout").post(auth::logout::handler))
                .push(
                    Router::with_path("me")
                        .get(auth::me::handler)
                        .put(auth::update_me::handler),
                )
                .push(Router::with_path("update-password").post(auth::update_password::handler)),
        )
        .push(
            Router::with_path("products/{slug}/reviews").post(reviews::create::handler),
        )
        .push(Router::with_path("reviews/{id}").delete(reviews::delete::handler))
        .push(
            Router::with_path("cart")
                .get(cart::get::handler)
                .post(cart::upsert::handler)
                .push(Router::with_path("clear").delete(cart::clear::handler))
                .push(
                    Router::with_path("{id}")
                        .patch(cart::update::handler)
                        .delete(cart::remove::handler),
                ),
        )
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(addresses::get::handler)
                        .put(addresses::update::handler)
                        .delete(addresses::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{id}").get(orders::get::handler)),
        )
}

fn admin_routes() -> Router {
    Router::new()
        .push(Router::with_path("stats").get(admin::stats::handler))
        .push(Router::with_path("customers").get(admin::customers::handler))
        .push(
            Router::with_path("products")
                .get(catalog::admin_products::handler)
                .post(catalog::create_product::handler)
                .push(
                    Router::with_path("{id}")
                        .put(catalog::update_product::handler)
                        .delete(catalog::delete_product::handler),
                ),
        )
        .push(
            Router::with_path("categories")
                .post(catalog::create_category::handler)
                .push(
                    Router::with_path("{id}")
                        .put(catalog::update_category::handler)
                        .delete(catalog::delete_category::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::admin_index::handler)
                .push(
                    Router::with_path("{id}")
                        .get(orders::get::handler)
                        .patch(orders::update_status::handler),
                ),
        )
        .push(
            Router::with_path("deals")
                .get(deals::index::handler)
                .post(deals::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(deals::get::handler)
                        .put(deals::update::handler)
                        .delete(deals::delete::handler),
                ),
        )
}
