//! User rows and the extended profile stored alongside them.

use crate::db::{enum_col, now_ts, opt_ts_col, to_ts, ts_col, uuid_col};
use crate::{Result, SqlChatError, Store};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sqlchat_types::{ProfileUpdate, Role, User, UserProfile, UserSettings};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, is_active, last_login, created_at";

impl Store {
    /// Insert a user together with a default settings row.
    ///
    /// Fails with `UserExists` when the e-mail is already registered.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let exists: bool = tx.query_row(
            "SELECT COUNT(*) > 0 FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        if exists {
            return Err(SqlChatError::UserExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::User,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        };

        tx.execute(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
            "#,
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.role.as_str(),
                to_ts(user.created_at),
            ],
        )?;

        let defaults = UserSettings::default();
        tx.execute(
            "INSERT INTO user_settings (user_id, theme, query_timeout, show_sql_queries) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id.to_string(),
                defaults.theme.as_str(),
                defaults.query_timeout as i64,
                defaults.show_sql_queries,
            ],
        )?;

        tx.commit()?;
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.to_string()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn touch_last_login(&self, id: Uuid) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![now_ts(), id.to_string()],
        )?;
        Ok(())
    }

    /// Activate or deactivate an account. Deactivated users cannot log in.
    pub fn set_user_active(&self, id: Uuid, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE users SET is_active = ?1 WHERE id = ?2",
            params![active, id.to_string()],
        )?;
        if changed == 0 {
            return Err(SqlChatError::NotFound("User"));
        }
        Ok(())
    }

    pub fn get_profile(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                "SELECT name, email, bio, company, avatar FROM users WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok(UserProfile {
                        name: row.get(0)?,
                        email: row.get(1)?,
                        bio: row.get(2)?,
                        company: row.get(3)?,
                        avatar: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    /// Merge a partial profile update and return the stored result.
    pub fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(SqlChatError::Validation("Name cannot be empty".to_string()));
            }
        }

        {
            let conn = self.conn()?;
            let changed = conn.execute(
                r#"
                UPDATE users SET
                    name = COALESCE(?1, name),
                    bio = COALESCE(?2, bio),
                    company = COALESCE(?3, company),
                    avatar = COALESCE(?4, avatar)
                WHERE id = ?5
                "#,
                params![
                    update.name.as_deref().map(str::trim),
                    update.bio,
                    update.company,
                    update.avatar,
                    id.to_string(),
                ],
            )?;
            if changed == 0 {
                return Err(SqlChatError::NotFound("User"));
            }
        }

        self.get_profile(id)?.ok_or(SqlChatError::NotFound("User"))
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: enum_col(row, 4)?,
        is_active: row.get(5)?,
        last_login: opt_ts_col(row, 6)?,
        created_at: ts_col(row, 7)?,
    })
}
