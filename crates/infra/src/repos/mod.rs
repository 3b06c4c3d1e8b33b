pub mod notifications;
pub mod profiles;
pub mod results;
pub mod students;

pub use notifications::NotificationRepo;
pub use profiles::ProfileRepo;
pub use results::{NewCompetitionResult, ResultFilter, ResultRepo};
pub use students::{
    AssignSummary, ChangeSummary, NewStudent, RemoveSummary, StudentRepo, StudentSearch,
};
