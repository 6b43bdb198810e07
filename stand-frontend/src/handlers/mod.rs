pub mod app;
pub mod catalog;
pub mod contacts;
pub mod invoices;
pub mod metrics;
pub mod navigation;
pub mod pdf;
pub mod pricing;
pub mod purchases;
pub mod stands;
pub mod statistics;
