// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Liste des modules:
//   - users : Utilisateurs (admin / user)
//   - accounts : Comptes de trading, chacun avec son token API
//   - statistics : Snapshots de performance ingérés par compte
//   - dto : Requêtes / réponses de l'API
//   - health : Health check
//
// Points d'attention:
//   - Soft delete partout : `deleted_at` non NULL = ligne invisible
//   - created_at / updated_at gérés par `before_save`
//
// ============================================================================

pub mod accounts;
pub mod dto;
pub mod health;
pub mod statistics;
pub mod users;
