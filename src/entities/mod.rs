pub mod incubator;
pub mod investor;
pub mod mentor;
pub mod mentor_availability;
pub mod startup;
pub mod tool;

pub use incubator::Entity as Incubator;
pub use investor::Entity as Investor;
pub use mentor::Entity as Mentor;
pub use mentor_availability::Entity as MentorAvailability;
pub use startup::Entity as Startup;
pub use tool::Entity as Tool;

pub use investor::VerificationStatus;
pub use mentor_availability::DayOfWeek;
pub use startup::StartupStatus;
pub use tool::{Tags, ToolStatus};
