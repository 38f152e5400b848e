mod intake_service;
mod ledger_service;

pub use intake_service::{IntakeService, PhotoUpload, SubmitReturn};
pub use ledger_service::LedgerService;
