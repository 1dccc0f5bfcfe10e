//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` + `Deserialize` entity struct matching the backend
//!   row, with `Option`al fields for foreign-key expansions
//! - A `Serialize` + `Validate` create DTO for inserts
//! - An all-`Option` update DTO for partial patches, where applicable

pub mod application;
pub mod job;
pub mod message;
pub mod payment;
pub mod profile;

pub use application::{Application, ApplicationStatus, CreateApplication};
pub use job::{BudgetType, CreateJob, Job, JobFilters, JobListing, JobStatus, UpdateJob};
pub use message::{Message, MessageType, NewMessage};
pub use payment::{CreatePayment, Payment, PaymentStatus};
pub use profile::{FreelancerFilters, Profile, Role, UpdateProfile, UpsertProfile};
