pub mod submission_handler;

pub use submission_handler::{
    __path_get_submission, __path_list_my_submissions, __path_list_submissions,
    __path_submit_return, __path_update_submission_status, get_submission, list_my_submissions,
    list_submissions, submit_return, update_submission_status,
};
