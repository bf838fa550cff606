//! HTTP surface for the DIBS gateway integration.
//!
//! Exposes the server-to-server callback endpoint the gateway posts to after
//! the hosted payment flow, wired to the adapter and an order store.

pub mod routes;
pub mod storage;

use std::sync::Arc;

use dibs_gateway::{OrderStore, PaymentGateway};

/// Shared application state handed to the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub orders: Arc<dyn OrderStore>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PaymentGateway>, orders: Arc<dyn OrderStore>) -> Self {
        Self { gateway, orders }
    }
}
