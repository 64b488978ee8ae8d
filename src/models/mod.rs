pub mod category;
pub mod field;
pub mod outcome;
pub mod record;
pub mod template;

pub use category::TrainingPath;
pub use field::{Field, SENTINEL};
pub use outcome::{DispatchOutcome, DispatchReport, OutcomeStatus};
pub use record::{Dataset, DatasetRow, LessonDetails, Record};
pub use template::TemplateVariant;
