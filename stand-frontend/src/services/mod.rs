pub mod backend_client;
pub mod catalog;
pub mod invoicing;
pub mod metrics;
pub mod pricing;
pub mod purchasing;
pub mod stands;
pub mod statistics;
