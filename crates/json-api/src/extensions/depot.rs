//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use storefront_app::auth::Principal;

const PRINCIPAL_DEPOT_KEY: &str = "principal";

/// Typed access to values stored in the depot by hoops.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated principal, or 401 when the route was reached without one.
    fn principal_or_401(&self) -> Result<Principal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.insert(PRINCIPAL_DEPOT_KEY, principal);
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.get::<Principal>(PRINCIPAL_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
