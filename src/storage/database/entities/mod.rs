/// Alert entity module
pub mod alert;
/// Escalation record entity module
pub mod alert_escalation;
/// Maintenance task entity module
pub mod maintenance_task;
/// Notification job entity module
pub mod notification_job;

pub use alert::Entity as Alert;
pub use alert_escalation::Entity as AlertEscalation;
pub use maintenance_task::Entity as MaintenanceTask;
pub use notification_job::Entity as NotificationJob;
