pub mod submission;

pub use submission::{
    KindFailure, Submission, SubmissionOutcome, SubmissionEvent, SubmissionPolicy,
    SUBMISSION_FAILED_MESSAGE,
};
