#[derive(Clone, Debug)]
pub struct Folder {
    pub id: i64,
    pub folder_name: String,
}
