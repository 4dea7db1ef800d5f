//! Row models for the remote resources. The backend owns these records;
//! this crate only reads and writes them through `records`.

pub mod answer;
pub mod applicant;
pub mod interview;
pub mod question;
