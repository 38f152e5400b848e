//! Intake workflow and submission ledger.
//!
//! A return arrives as a product name plus a classifier confidence. The
//! product is resolved by name (created on first sight), the confidence is
//! turned into a decision, and the submission is recorded. Operators then
//! review the ledger and may overturn the decision.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/submissions` | Submit a return (multipart) |
//! | GET | `/api/submissions` | Full ledger, newest first (admin) |
//! | GET | `/api/submissions/mine` | Caller's own submissions |
//! | GET | `/api/submissions/{id}` | Single submission (admin) |
//! | PUT | `/api/submissions/{id}/status` | Override the decision (admin) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgSubmissionRepository, SubmissionRepository};
pub use services::{IntakeService, LedgerService};
