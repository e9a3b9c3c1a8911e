pub mod accrual;
pub mod auth;
pub mod maintenance_service;
pub mod society_service;

pub use auth::AuthService;
pub use maintenance_service::MaintenanceService;
pub use society_service::SocietyService;
