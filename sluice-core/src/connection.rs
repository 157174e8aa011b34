/// Handle to an open database connection.
///
/// The engine never talks to the database itself, it only needs to know which
/// implementation sits behind the handle to pick the matching dialect and to
/// partition its caches.
pub trait Connection: Send + Sync {
    /// Name of the driver, matches [`Driver::NAME`](crate::Driver::NAME).
    fn driver_name(&self) -> &'static str;
}

/// Opaque transaction handle, forwarded untouched to the schema provider.
pub trait Transaction: Send + Sync {}

impl<C: Connection + ?Sized> Connection for &C {
    fn driver_name(&self) -> &'static str {
        (**self).driver_name()
    }
}
