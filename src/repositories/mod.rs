// Accès base de données, un repository par table.
// Toutes les lectures excluent les lignes supprimées (deleted_at non NULL).

pub mod account_repository;
pub mod statistic_repository;
pub mod user_repository;

pub use account_repository::AccountRepository;
pub use statistic_repository::StatisticRepository;
pub use user_repository::UserRepository;
