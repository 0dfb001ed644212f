// --- File: crates/studylink_messages/src/models.rs ---
use serde::Deserialize;
use studylink_db::models::FileRef;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: String,
    pub body: Option<String>,
    pub file: Option<FileRef>,
}

#[derive(Deserialize, Debug)]
pub struct EditMessageRequest {
    pub body: String,
}
