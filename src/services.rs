pub mod audit_service;
pub mod order_service;
pub mod payment_service;
pub mod status_service;
pub mod table_service;
