use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct BoughtResponse {
    pub id: Uuid,
    pub bought_by: Uuid,
}
