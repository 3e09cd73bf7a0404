use serde::{Deserialize, Serialize};

/// App-wide settings singleton: Google Drive/Sheets connectivity flags and
/// credentials. One instance per store, fully replaced on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub drive_connected: bool,
    #[serde(default)]
    pub drive_folder_name: String,
    #[serde(default)]
    pub auto_sync: bool,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub google_client_id: String,
    #[serde(default)]
    pub google_api_key: String,
    #[serde(default)]
    pub google_sheet_id: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            drive_connected: false,
            drive_folder_name: String::new(),
            auto_sync: false,
            email_notifications: true,
            google_client_id: String::new(),
            google_api_key: String::new(),
            google_sheet_id: String::new(),
        }
    }
}
