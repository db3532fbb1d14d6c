// Logique métier : validation des règles, traduction des erreurs BD en AppError

pub mod account_service;
pub mod statistic_service;
pub mod user_service;

pub use account_service::AccountService;
pub use statistic_service::StatisticService;
pub use user_service::UserService;
