//! Certificate CRUD

use crate::models::Certificate;
use crate::repository::{CertificateQuery, CertificateRepository};
use chrono::Utc;
use sr_common::{Error, Result};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct CertificateService {
    certificates: Arc<dyn CertificateRepository>,
}

impl CertificateService {
    pub fn new(certificates: Arc<dyn CertificateRepository>) -> Self {
        Self { certificates }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Certificate>> {
        self.certificates.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Certificate>> {
        self.certificates.search(&CertificateQuery::default()).await
    }

    pub async fn list_by_athlete(&self, athlete_id: Uuid) -> Result<Vec<Certificate>> {
        let query = CertificateQuery {
            athlete_id: Some(athlete_id),
            ..CertificateQuery::default()
        };
        self.certificates.search(&query).await
    }

    pub async fn list_by_athlete_and_meeting(
        &self,
        athlete_id: Uuid,
        meeting: &str,
    ) -> Result<Vec<Certificate>> {
        let query = CertificateQuery {
            athlete_id: Some(athlete_id),
            meeting: Some(meeting.to_string()),
        };
        self.certificates.search(&query).await
    }

    pub async fn count(&self) -> Result<u64> {
        self.certificates.count(None).await
    }

    pub async fn count_by_meeting(&self, meeting: &str) -> Result<u64> {
        self.certificates.count(Some(meeting)).await
    }

    /// Store under a fresh id with both timestamps set to now
    pub async fn create(&self, mut certificate: Certificate) -> Result<Certificate> {
        let now = Utc::now();
        certificate.id = Uuid::new_v4();
        certificate.added_at = Some(now);
        certificate.updated_at = Some(now);

        self.certificates.insert(&certificate).await?;
        info!(certificate_id = %certificate.id, athlete_id = %certificate.athlete_id, "Certificate added");
        Ok(certificate)
    }

    /// Full replace; `added_at` is kept from the stored record
    pub async fn update(&self, mut certificate: Certificate) -> Result<Certificate> {
        if certificate.id.is_nil() {
            return Err(Error::InvalidInput("certificate id is required".to_string()));
        }
        let not_found = || Error::NotFound(format!("certificate {}", certificate.id));

        let stored = self.certificates.get(certificate.id).await?.ok_or_else(not_found)?;
        certificate.added_at = stored.added_at;
        certificate.updated_at = Some(Utc::now());

        if !self.certificates.replace(&certificate).await? {
            return Err(not_found());
        }
        info!(certificate_id = %certificate.id, "Certificate updated");
        Ok(certificate)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.certificates.delete(id).await? {
            return Err(Error::NotFound(format!("certificate {}", id)));
        }
        info!(certificate_id = %id, "Certificate deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn service() -> CertificateService {
        CertificateService::new(Arc::new(MemoryStore::new()))
    }

    fn certificate(athlete_id: Uuid, meeting: &str, ordering: i64) -> Certificate {
        Certificate {
            name: format!("{} #{}", meeting, ordering),
            athlete_id,
            meeting: meeting.to_string(),
            ordering,
            ..Certificate::default()
        }
    }

    #[tokio::test]
    async fn test_create_stamps_timestamps() {
        let created = service()
            .create(certificate(Uuid::new_v4(), "M1", 1))
            .await
            .unwrap();

        assert!(!created.id.is_nil());
        assert!(created.added_at.is_some());
        assert_eq!(created.added_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_update_keeps_added_at() {
        let service = service();
        let created = service.create(certificate(Uuid::new_v4(), "M1", 1)).await.unwrap();

        let mut changed = created.clone();
        changed.added_at = None;
        changed.hidden = true;
        let updated = service.update(changed).await.unwrap();

        assert_eq!(updated.added_at, created.added_at);
        assert!(updated.updated_at >= created.updated_at);
        assert!(updated.hidden);
    }

    #[tokio::test]
    async fn test_listing_by_athlete_in_ordering() {
        let service = service();
        let athlete = Uuid::new_v4();
        service.create(certificate(athlete, "M1", 2)).await.unwrap();
        service.create(certificate(athlete, "M2", 1)).await.unwrap();
        service.create(certificate(Uuid::new_v4(), "M1", 0)).await.unwrap();

        let orderings: Vec<i64> = service
            .list_by_athlete(athlete)
            .await
            .unwrap()
            .iter()
            .map(|c| c.ordering)
            .collect();
        assert_eq!(orderings, vec![1, 2]);

        assert_eq!(service.list_by_athlete_and_meeting(athlete, "M1").await.unwrap().len(), 1);
        assert_eq!(service.count().await.unwrap(), 3);
        assert_eq!(service.count_by_meeting("M1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_certificate() {
        let service = service();
        let mut ghost = certificate(Uuid::new_v4(), "M1", 0);
        ghost.id = Uuid::new_v4();

        assert!(service.update(ghost.clone()).await.unwrap_err().is_not_found());
        assert!(service.delete(ghost.id).await.unwrap_err().is_not_found());
    }
}
