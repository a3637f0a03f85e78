//! Certificate table operations

use super::{id_text, parse_uuid, SqliteStore};
use crate::models::Certificate;
use crate::repository::{CertificateQuery, CertificateRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use sr_common::storage::with_deadline;
use sr_common::{Error, Result};
use uuid::Uuid;

const COLUMNS: &str =
    "id, name, athlete_id, meeting, path, url, hidden, downloads, ordering, added_at, updated_at";

fn parse_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Internal(format!("invalid stored timestamp '{}': {}", s, e)))
        })
        .transpose()
}

fn certificate_from_row(row: &SqliteRow) -> Result<Certificate> {
    let id: String = row.try_get("id")?;
    let athlete_id: String = row.try_get("athlete_id")?;

    Ok(Certificate {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        athlete_id: parse_uuid(&athlete_id)?,
        meeting: row.try_get("meeting")?,
        path: row.try_get("path")?,
        url: row.try_get("url")?,
        hidden: row.try_get("hidden")?,
        downloads: row.try_get("downloads")?,
        ordering: row.try_get("ordering")?,
        added_at: parse_timestamp(row.try_get("added_at")?)?,
        updated_at: parse_timestamp(row.try_get("updated_at")?)?,
    })
}

#[async_trait]
impl CertificateRepository for SqliteStore {
    async fn get(&self, id: Uuid) -> Result<Option<Certificate>> {
        with_deadline("certificate.get", self.timeout, async {
            let row = sqlx::query(&format!("SELECT {} FROM certificates WHERE id = ?", COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
            row.as_ref().map(certificate_from_row).transpose()
        })
        .await
    }

    async fn search(&self, query: &CertificateQuery) -> Result<Vec<Certificate>> {
        with_deadline("certificate.search", self.timeout, async {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("SELECT {} FROM certificates WHERE 1 = 1", COLUMNS));

            if let Some(athlete_id) = query.athlete_id {
                builder.push(" AND athlete_id = ");
                builder.push_bind(athlete_id.to_string());
            }
            if let Some(meeting) = &query.meeting {
                builder.push(" AND meeting = ");
                builder.push_bind(meeting.clone());
            }
            builder.push(" ORDER BY ordering, id");

            let rows = builder.build().fetch_all(&self.pool).await?;
            rows.iter().map(certificate_from_row).collect()
        })
        .await
    }

    async fn count(&self, meeting: Option<&str>) -> Result<u64> {
        with_deadline("certificate.count", self.timeout, async {
            let count: i64 = match meeting {
                Some(meeting) => {
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM certificates WHERE meeting = ?")
                        .bind(meeting)
                        .fetch_one(&self.pool)
                        .await?
                }
                None => {
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM certificates")
                        .fetch_one(&self.pool)
                        .await?
                }
            };
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn insert(&self, certificate: &Certificate) -> Result<()> {
        with_deadline("certificate.insert", self.timeout, async {
            sqlx::query(&format!(
                "INSERT INTO certificates ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                COLUMNS
            ))
            .bind(certificate.id.to_string())
            .bind(&certificate.name)
            .bind(id_text(certificate.athlete_id))
            .bind(&certificate.meeting)
            .bind(&certificate.path)
            .bind(&certificate.url)
            .bind(certificate.hidden)
            .bind(certificate.downloads)
            .bind(certificate.ordering)
            .bind(certificate.added_at.map(|dt| dt.to_rfc3339()))
            .bind(certificate.updated_at.map(|dt| dt.to_rfc3339()))
            .execute(&self.pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn replace(&self, certificate: &Certificate) -> Result<bool> {
        with_deadline("certificate.replace", self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE certificates SET
                    name = ?, athlete_id = ?, meeting = ?, path = ?, url = ?, hidden = ?,
                    downloads = ?, ordering = ?, added_at = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(&certificate.name)
            .bind(id_text(certificate.athlete_id))
            .bind(&certificate.meeting)
            .bind(&certificate.path)
            .bind(&certificate.url)
            .bind(certificate.hidden)
            .bind(certificate.downloads)
            .bind(certificate.ordering)
            .bind(certificate.added_at.map(|dt| dt.to_rfc3339()))
            .bind(certificate.updated_at.map(|dt| dt.to_rfc3339()))
            .bind(certificate.id.to_string())
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        with_deadline("certificate.delete", self.timeout, async {
            let result = sqlx::query("DELETE FROM certificates WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
