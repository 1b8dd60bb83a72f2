use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordPayment {
    pub enrollment_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub reference_number: Option<String>,
}
