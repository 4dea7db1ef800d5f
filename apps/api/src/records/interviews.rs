use crate::models::interview::{Interview, NewInterview};
use crate::rest::{Query, RestBackend, RestError};

use super::{decode_rows, echoed_row, first_row, to_body};

const RESOURCE: &str = "interview";

pub async fn list_interviews(rest: &dyn RestBackend) -> Result<Vec<Interview>, RestError> {
    let rows = rest.get(&Query::table(RESOURCE).order_asc("id").path()).await?;
    decode_rows(rows)
}

pub async fn get_interview(rest: &dyn RestBackend, id: i64) -> Result<Option<Interview>, RestError> {
    let rows = rest.get(&Query::table(RESOURCE).eq("id", id).path()).await?;
    first_row(rows)
}

pub async fn create_interview(
    rest: &dyn RestBackend,
    interview: &NewInterview,
) -> Result<Interview, RestError> {
    let rows = rest.post(RESOURCE, &to_body(interview)?).await?;
    echoed_row(rows, "interview insert")
}

/// Returns `None` when no interview has this id.
pub async fn update_interview(
    rest: &dyn RestBackend,
    id: i64,
    interview: &NewInterview,
) -> Result<Option<Interview>, RestError> {
    let path = Query::table(RESOURCE).eq("id", id).path();
    first_row(rest.patch(&path, &to_body(interview)?).await?)
}

pub async fn delete_interview(rest: &dyn RestBackend, id: i64) -> Result<(), RestError> {
    rest.delete(&Query::table(RESOURCE).eq("id", id).path()).await
}
