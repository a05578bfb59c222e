use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: UserStats,
    pub calendar_events: i64,
    pub events_by_type: BTreeMap<String, i64>,
    pub diary_entries: i64,
    pub weekly_entries: i64,
    pub support_resources: i64,
    pub support_by_category: BTreeMap<String, i64>,
    pub books: BTreeMap<&'static str, i64>,
    pub stored_reports: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    pub registered_last_30_days: i64,
}
