//! Maintenance task scheduling

mod scheduler;

pub use scheduler::MaintenanceScheduler;

#[cfg(test)]
mod tests;
