//! Athlete table operations

use super::{
    from_json, id_text, parse_uuid, push_set_contains, push_text_clause, to_json, SqliteStore,
};
use crate::models::{Athlete, Paging};
use crate::repository::{AthleteQuery, AthleteRepository};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use sr_common::storage::with_deadline;
use sr_common::Result;
use uuid::Uuid;

const COLUMNS: &str = "id, name, firstname, lastname, year, dsv_id, gender, alias, team_id, \
                       first_meeting, participation";

fn athlete_from_row(row: &SqliteRow) -> Result<Athlete> {
    let id: String = row.try_get("id")?;
    let team_id: String = row.try_get("team_id")?;
    let alias: String = row.try_get("alias")?;
    let participation: String = row.try_get("participation")?;

    Ok(Athlete {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        firstname: row.try_get("firstname")?,
        lastname: row.try_get("lastname")?,
        year: row.try_get("year")?,
        dsv_id: row.try_get("dsv_id")?,
        gender: row.try_get("gender")?,
        alias: from_json(&alias)?,
        team_id: parse_uuid(&team_id)?,
        team: Default::default(),
        first_meeting: row.try_get("first_meeting")?,
        participation: from_json(&participation)?,
    })
}

impl SqliteStore {
    async fn fetch_athletes(&self, mut builder: QueryBuilder<'_, Sqlite>) -> Result<Vec<Athlete>> {
        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(athlete_from_row).collect()
    }
}

#[async_trait]
impl AthleteRepository for SqliteStore {
    async fn get(&self, id: Uuid) -> Result<Option<Athlete>> {
        with_deadline("athlete.get", self.timeout, async {
            let row = sqlx::query(&format!("SELECT {} FROM athletes WHERE id = ?", COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(athlete_from_row).transpose()
        })
        .await
    }

    async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Athlete>> {
        with_deadline("athlete.get_by_dsv_id", self.timeout, async {
            let row = sqlx::query(&format!(
                "SELECT {} FROM athletes WHERE dsv_id = ? ORDER BY name, id LIMIT 1",
                COLUMNS
            ))
            .bind(dsv_id)
            .fetch_optional(&self.pool)
            .await?;
            row.as_ref().map(athlete_from_row).transpose()
        })
        .await
    }

    async fn search(&self, query: &AthleteQuery, paging: &Paging) -> Result<Vec<Athlete>> {
        with_deadline("athlete.search", self.timeout, async {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("SELECT {} FROM athletes WHERE 1 = 1", COLUMNS));

            if let Some(year) = query.year {
                builder.push(" AND year = ");
                builder.push_bind(year);
            }
            if let Some(team_id) = query.team_id {
                builder.push(" AND team_id = ");
                builder.push_bind(team_id.to_string());
            }
            if let Some(meeting) = &query.meeting {
                push_set_contains(&mut builder, "athletes", "participation", meeting.clone());
            }
            push_text_clause(
                &mut builder,
                "athletes",
                &query.text,
                &["firstname", "lastname", "dsv_id"],
            );

            builder.push(" ORDER BY name, id LIMIT ");
            builder.push_bind(paging.sql_limit());
            builder.push(" OFFSET ");
            builder.push_bind(paging.sql_offset());

            self.fetch_athletes(builder).await
        })
        .await
    }

    async fn insert(&self, athlete: &Athlete) -> Result<()> {
        with_deadline("athlete.insert", self.timeout, async {
            sqlx::query(&format!(
                "INSERT INTO athletes ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                COLUMNS
            ))
            .bind(athlete.id.to_string())
            .bind(&athlete.name)
            .bind(&athlete.firstname)
            .bind(&athlete.lastname)
            .bind(athlete.year)
            .bind(athlete.dsv_id)
            .bind(&athlete.gender)
            .bind(to_json(&athlete.alias)?)
            .bind(id_text(athlete.team_id))
            .bind(&athlete.first_meeting)
            .bind(to_json(&athlete.participation)?)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn replace(&self, athlete: &Athlete) -> Result<bool> {
        with_deadline("athlete.replace", self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE athletes SET
                    name = ?, firstname = ?, lastname = ?, year = ?, dsv_id = ?, gender = ?,
                    alias = ?, team_id = ?, first_meeting = ?, participation = ?
                WHERE id = ?
                "#,
            )
            .bind(&athlete.name)
            .bind(&athlete.firstname)
            .bind(&athlete.lastname)
            .bind(athlete.year)
            .bind(athlete.dsv_id)
            .bind(&athlete.gender)
            .bind(to_json(&athlete.alias)?)
            .bind(id_text(athlete.team_id))
            .bind(&athlete.first_meeting)
            .bind(to_json(&athlete.participation)?)
            .bind(athlete.id.to_string())
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        with_deadline("athlete.delete", self.timeout, async {
            let result = sqlx::query("DELETE FROM athletes WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
