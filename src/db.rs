pub mod user_repo;
pub use user_repo::UserRepository;
pub mod society_repo;
pub use society_repo::SocietyRepository;
pub mod maintenance_repo;
pub use maintenance_repo::MaintenanceRepository;
pub mod cache;
pub use cache::BalanceCache;
