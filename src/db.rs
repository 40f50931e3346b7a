pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod history_repo;
pub use history_repo::HistoryRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod table_repo;
pub use table_repo::TableRepository;
