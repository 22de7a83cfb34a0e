use serde::{Deserialize, Serialize};

/// Body for `POST /tickets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewTicket {
    pub title: String,
    pub description: String,
}
