use sluice_core::{Connection, Driver, Transaction};

/// Connection handle that only knows which driver it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TestConnection {
    driver: &'static str,
}

impl TestConnection {
    pub const fn new(driver: &'static str) -> Self {
        Self { driver }
    }

    pub fn of<D: Driver>() -> Self {
        Self::new(D::NAME)
    }
}

impl Connection for TestConnection {
    fn driver_name(&self) -> &'static str {
        self.driver
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TestTransaction;

impl Transaction for TestTransaction {}
