pub mod completion;
pub(crate) mod links;

pub use completion::{
    required_fields, CompletionAssessment, RequiredField, MIN_SUBMISSION_COMPLETION,
};
