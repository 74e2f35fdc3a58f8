//! Wire types for run requests (REST).

use serde::Serialize;

use super::RunInputs;

/// Body of `POST /api/v1/run/{id}`.
#[derive(Debug, Serialize)]
pub struct RunRequest<'a> {
    pub id: &'a str,
    pub inputs: &'a RunInputs,
}
