use serde_json::json;

use crate::models::applicant::{Applicant, ApplicantStatus, NewApplicant};
use crate::rest::{Query, RestBackend, RestError};

use super::{decode_rows, echoed_row, first_row, to_body};

const RESOURCE: &str = "applicant";

pub async fn list_applicants(
    rest: &dyn RestBackend,
    interview_id: i64,
) -> Result<Vec<Applicant>, RestError> {
    let path = Query::table(RESOURCE)
        .eq("interview_id", interview_id)
        .order_asc("id")
        .path();
    decode_rows(rest.get(&path).await?)
}

pub async fn list_all_applicants(rest: &dyn RestBackend) -> Result<Vec<Applicant>, RestError> {
    decode_rows(rest.get(&Query::table(RESOURCE).order_asc("id").path()).await?)
}

pub async fn get_applicant(rest: &dyn RestBackend, id: i64) -> Result<Option<Applicant>, RestError> {
    first_row(rest.get(&Query::table(RESOURCE).eq("id", id).path()).await?)
}

pub async fn create_applicant(
    rest: &dyn RestBackend,
    applicant: &NewApplicant,
) -> Result<Applicant, RestError> {
    let rows = rest.post(RESOURCE, &to_body(applicant)?).await?;
    echoed_row(rows, "applicant insert")
}

pub async fn update_applicant(
    rest: &dyn RestBackend,
    id: i64,
    applicant: &NewApplicant,
) -> Result<Option<Applicant>, RestError> {
    let path = Query::table(RESOURCE).eq("id", id).path();
    first_row(rest.patch(&path, &to_body(applicant)?).await?)
}

pub async fn set_applicant_status(
    rest: &dyn RestBackend,
    id: i64,
    status: ApplicantStatus,
) -> Result<Option<Applicant>, RestError> {
    let path = Query::table(RESOURCE).eq("id", id).path();
    first_row(rest.patch(&path, &json!({ "interview_status": status })).await?)
}

pub async fn delete_applicant(rest: &dyn RestBackend, id: i64) -> Result<(), RestError> {
    rest.delete(&Query::table(RESOURCE).eq("id", id).path()).await
}
