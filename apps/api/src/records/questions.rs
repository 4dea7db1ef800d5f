use crate::models::question::{NewQuestion, Question};
use crate::rest::{Query, RestBackend, RestError};

use super::{decode_rows, echoed_row, first_row, to_body};

const RESOURCE: &str = "question";

pub async fn list_questions(
    rest: &dyn RestBackend,
    interview_id: i64,
) -> Result<Vec<Question>, RestError> {
    let path = Query::table(RESOURCE)
        .eq("interview_id", interview_id)
        .order_asc("id")
        .path();
    decode_rows(rest.get(&path).await?)
}

/// Every question visible to the caller, across interviews.
pub async fn list_all_questions(rest: &dyn RestBackend) -> Result<Vec<Question>, RestError> {
    decode_rows(rest.get(&Query::table(RESOURCE).order_asc("id").path()).await?)
}

pub async fn get_question(rest: &dyn RestBackend, id: i64) -> Result<Option<Question>, RestError> {
    first_row(rest.get(&Query::table(RESOURCE).eq("id", id).path()).await?)
}

pub async fn create_question(
    rest: &dyn RestBackend,
    question: &NewQuestion,
) -> Result<Question, RestError> {
    let rows = rest.post(RESOURCE, &to_body(question)?).await?;
    echoed_row(rows, "question insert")
}

pub async fn update_question(
    rest: &dyn RestBackend,
    id: i64,
    question: &NewQuestion,
) -> Result<Option<Question>, RestError> {
    let path = Query::table(RESOURCE).eq("id", id).path();
    first_row(rest.patch(&path, &to_body(question)?).await?)
}

pub async fn delete_question(rest: &dyn RestBackend, id: i64) -> Result<(), RestError> {
    rest.delete(&Query::table(RESOURCE).eq("id", id).path()).await
}
