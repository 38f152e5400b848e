mod submission;

pub use submission::{
    no_photo, IntakeOutcome, NewIntake, PhotoWrite, Submission, SubmissionRow, SubmissionStatus, SubmissionWithProduct,
};
