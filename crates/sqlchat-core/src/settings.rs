//! Per-user settings rows.

use crate::db::enum_col;
use crate::{Result, Store};
use rusqlite::{params, OptionalExtension};
use sqlchat_types::UserSettings;
use uuid::Uuid;

impl Store {
    /// Settings for a user, falling back to defaults when no row exists.
    pub fn get_settings(&self, user_id: Uuid) -> Result<UserSettings> {
        Ok(self.find_settings(user_id)?.unwrap_or_default())
    }

    /// The stored settings row, if any.
    pub fn find_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>> {
        let conn = self.conn()?;
        let settings = conn
            .query_row(
                "SELECT theme, query_timeout, show_sql_queries FROM user_settings WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| {
                    let timeout: i64 = row.get(1)?;
                    Ok(UserSettings {
                        theme: enum_col(row, 0)?,
                        query_timeout: timeout.max(1) as u64,
                        show_sql_queries: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    /// Insert or replace the settings row.
    pub fn put_settings(&self, user_id: Uuid, settings: &UserSettings) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO user_settings (user_id, theme, query_timeout, show_sql_queries)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                theme = excluded.theme,
                query_timeout = excluded.query_timeout,
                show_sql_queries = excluded.show_sql_queries
            "#,
            params![
                user_id.to_string(),
                settings.theme.as_str(),
                settings.query_timeout as i64,
                settings.show_sql_queries,
            ],
        )?;
        Ok(())
    }
}
