use eco_domain::Coordinate;
use std::future::Future;

/// Outcome of the location permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Device geolocation capability.
pub trait LocationProvider: Send + Sync {
    fn request_permission(&self) -> impl Future<Output = Permission> + Send;

    /// Last known position, if the device can report one.
    fn current_position(&self) -> impl Future<Output = Option<Coordinate>> + Send;
}

/// Fixed answer provider for hosts without a positioning device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticLocation {
    permission: Permission,
    position: Option<Coordinate>,
}

impl StaticLocation {
    #[must_use]
    pub const fn granted(position: Option<Coordinate>) -> Self {
        Self { permission: Permission::Granted, position }
    }

    #[must_use]
    pub const fn denied() -> Self {
        Self { permission: Permission::Denied, position: None }
    }
}

impl LocationProvider for StaticLocation {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn current_position(&self) -> Option<Coordinate> {
        self.position
    }
}
