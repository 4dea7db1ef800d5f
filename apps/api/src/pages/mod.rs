//! Page orchestration: each page gathers the records it shows, merges them
//! with local state, and returns a themed view model. Mutations are issued
//! here too; the HTTP layer in `handlers` only adapts requests.

pub mod applicants;
pub mod feedback;
pub mod handlers;
pub mod interviews;
pub mod mount;
pub mod questions;
pub mod take;

use crate::errors::AppError;

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn interview_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Interview {id} not found"))
}

fn applicant_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Applicant {id} not found"))
}
