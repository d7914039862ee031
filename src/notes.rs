use chrono::DateTime;
use chrono::Utc;

#[derive(Clone, Debug)]
pub struct Note {
    pub id: i64,
    pub note_name: String,
    pub folder_id: i64,
    pub content: String,
    pub modified: DateTime<Utc>,
}
