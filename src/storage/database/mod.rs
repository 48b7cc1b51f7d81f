//! Alert store implementation using SeaORM

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;

pub use seaorm_db::SeaOrmDatabase as Database;
pub use seaorm_db::{
    AdmissionOutcome, AlertAdmission, AlertTransition, EscalationOutcome,
    EscalationRequest, JobCompletion, OpenAlertDecision, SYSTEM_ACTOR,
};
