use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SalaryRequest {
    pub month: String,
    pub amount: i64,
}
