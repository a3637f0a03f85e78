//! Team table operations

use super::{from_json, parse_uuid, push_set_contains, push_text_clause, to_json, SqliteStore};
use crate::models::{Paging, Team};
use crate::repository::{TeamQuery, TeamRepository};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use sr_common::storage::with_deadline;
use sr_common::Result;
use uuid::Uuid;

const COLUMNS: &str = "id, name, alias, country, dsv_id, state_id, address, contact, website, \
                       logo_url, color_set, first_meeting, participation";

fn team_from_row(row: &SqliteRow) -> Result<Team> {
    let id: String = row.try_get("id")?;
    let alias: String = row.try_get("alias")?;
    let address: String = row.try_get("address")?;
    let contact: String = row.try_get("contact")?;
    let color_set: String = row.try_get("color_set")?;
    let participation: String = row.try_get("participation")?;

    Ok(Team {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        alias: from_json(&alias)?,
        country: row.try_get("country")?,
        dsv_id: row.try_get("dsv_id")?,
        state_id: row.try_get("state_id")?,
        address: from_json(&address)?,
        contact: from_json(&contact)?,
        website: row.try_get("website")?,
        logo_url: row.try_get("logo_url")?,
        color_set: from_json(&color_set)?,
        first_meeting: row.try_get("first_meeting")?,
        participation: from_json(&participation)?,
    })
}

#[async_trait]
impl TeamRepository for SqliteStore {
    async fn get(&self, id: Uuid) -> Result<Option<Team>> {
        with_deadline("team.get", self.timeout, async {
            let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = ?", COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(team_from_row).transpose()
        })
        .await
    }

    async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Team>> {
        with_deadline("team.get_by_dsv_id", self.timeout, async {
            let row = sqlx::query(&format!(
                "SELECT {} FROM teams WHERE dsv_id = ? ORDER BY name, id LIMIT 1",
                COLUMNS
            ))
            .bind(dsv_id)
            .fetch_optional(&self.pool)
            .await?;
            row.as_ref().map(team_from_row).transpose()
        })
        .await
    }

    async fn search(&self, query: &TeamQuery, paging: &Paging) -> Result<Vec<Team>> {
        with_deadline("team.search", self.timeout, async {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("SELECT {} FROM teams WHERE 1 = 1", COLUMNS));

            if let Some(meeting) = &query.meeting {
                push_set_contains(&mut builder, "teams", "participation", meeting.clone());
            }
            push_text_clause(&mut builder, "teams", &query.text, &[]);

            builder.push(" ORDER BY name, id LIMIT ");
            builder.push_bind(paging.sql_limit());
            builder.push(" OFFSET ");
            builder.push_bind(paging.sql_offset());

            let rows = builder.build().fetch_all(&self.pool).await?;
            rows.iter().map(team_from_row).collect()
        })
        .await
    }

    async fn count(&self, meeting: Option<&str>) -> Result<u64> {
        with_deadline("team.count", self.timeout, async {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("SELECT COUNT(*) FROM teams WHERE 1 = 1");
            if let Some(meeting) = meeting {
                push_set_contains(&mut builder, "teams", "participation", meeting.to_string());
            }
            let count = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn insert(&self, team: &Team) -> Result<()> {
        with_deadline("team.insert", self.timeout, async {
            sqlx::query(&format!(
                "INSERT INTO teams ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                COLUMNS
            ))
            .bind(team.id.to_string())
            .bind(&team.name)
            .bind(to_json(&team.alias)?)
            .bind(&team.country)
            .bind(team.dsv_id)
            .bind(team.state_id)
            .bind(to_json(&team.address)?)
            .bind(to_json(&team.contact)?)
            .bind(&team.website)
            .bind(&team.logo_url)
            .bind(to_json(&team.color_set)?)
            .bind(&team.first_meeting)
            .bind(to_json(&team.participation)?)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn replace(&self, team: &Team) -> Result<bool> {
        with_deadline("team.replace", self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE teams SET
                    name = ?, alias = ?, country = ?, dsv_id = ?, state_id = ?, address = ?,
                    contact = ?, website = ?, logo_url = ?, color_set = ?, first_meeting = ?,
                    participation = ?
                WHERE id = ?
                "#,
            )
            .bind(&team.name)
            .bind(to_json(&team.alias)?)
            .bind(&team.country)
            .bind(team.dsv_id)
            .bind(team.state_id)
            .bind(to_json(&team.address)?)
            .bind(to_json(&team.contact)?)
            .bind(&team.website)
            .bind(&team.logo_url)
            .bind(to_json(&team.color_set)?)
            .bind(&team.first_meeting)
            .bind(to_json(&team.participation)?)
            .bind(team.id.to_string())
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        with_deadline("team.delete", self.timeout, async {
            let result = sqlx::query("DELETE FROM teams WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
