// Module declarations
mod alert_ops;
mod connection;
mod escalation_ops;
mod maintenance_ops;
mod notification_ops;
mod report_ops;
mod retention_ops;
mod types;


// Re-export public types
pub use alert_ops::{AlertTransition, SYSTEM_ACTOR};
pub use types::{
    AdmissionOutcome, AlertAdmission, EscalationOutcome, EscalationRequest, JobCompletion,
    OpenAlertDecision, SeaOrmDatabase,
};
