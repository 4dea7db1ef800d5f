use serde_json::Value;
use tracing::warn;

use crate::models::answer::{Answer, NewAnswer};
use crate::rest::{Query, RestBackend, RestError};

use super::to_body;

const RESOURCE: &str = "application_answer";

/// Normalizes raw answer rows. Rows missing their key columns are skipped.
fn normalize(rows: Vec<Value>) -> Vec<Answer> {
    rows.iter()
        .filter_map(|row| {
            let answer = Answer::from_row(row);
            if answer.is_none() {
                warn!("Skipping malformed answer row: {row}");
            }
            answer
        })
        .collect()
}

pub async fn list_answers(
    rest: &dyn RestBackend,
    applicant_id: i64,
) -> Result<Vec<Answer>, RestError> {
    let path = Query::table(RESOURCE)
        .eq("applicant_id", applicant_id)
        .order_asc("id")
        .path();
    Ok(normalize(rest.get(&path).await?))
}

pub async fn get_answer(rest: &dyn RestBackend, id: i64) -> Result<Option<Answer>, RestError> {
    let rows = rest.get(&Query::table(RESOURCE).eq("id", id).path()).await?;
    Ok(normalize(rows).into_iter().next())
}

pub async fn create_answer(rest: &dyn RestBackend, answer: &NewAnswer) -> Result<Answer, RestError> {
    let rows = rest.post(RESOURCE, &to_body(answer)?).await?;
    normalize(rows)
        .into_iter()
        .next()
        .ok_or_else(|| RestError::Shape("answer insert returned no row".to_string()))
}

pub async fn update_answer(
    rest: &dyn RestBackend,
    id: i64,
    answer: &NewAnswer,
) -> Result<Option<Answer>, RestError> {
    let path = Query::table(RESOURCE).eq("id", id).path();
    Ok(normalize(rest.patch(&path, &to_body(answer)?).await?)
        .into_iter()
        .next())
}

pub async fn delete_answer(rest: &dyn RestBackend, id: i64) -> Result<(), RestError> {
    rest.delete(&Query::table(RESOURCE).eq("id", id).path()).await
}
