//! Business rules for the club-admin event operations.
//!
//! Every operation takes a [`ClubAdmin`], so the access guard has already
//! run. Inputs are validated before the poster is stored and the poster is
//! stored before the row is written. Store failures become
//! [`AppError::Persistence`] with an operation-specific message.

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::ClubAdmin;
use crate::models::event::{parse_date, parse_time};
use crate::models::{CreateEventRequest, Event, EventPatch, NewEvent, Registrant, UpdateEventRequest};
use crate::repository::EventRepository;
use crate::storage::BlobStore;
use crate::utils::error::AppError;

const CREATE_FAILED: &str = "Error creating event";
const UPDATE_FAILED: &str = "Error updating event";
const LIST_FAILED: &str = "Error fetching events";
const REGISTRATIONS_FAILED: &str = "Error fetching registrations";
const DELETE_FAILED: &str = "Error deleting event";

#[derive(Clone)]
pub struct EventService {
    repo: Arc<dyn EventRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { repo, blobs }
    }

    /// Returns the new event's id, which is not echoed to HTTP callers.
    pub async fn create(
        &self,
        admin: &ClubAdmin,
        request: CreateEventRequest,
    ) -> Result<i64, AppError> {
        let date = parse_date(&request.date)?;
        let time = parse_time(&request.time)?;

        let poster = match request.poster {
            Some(upload) => Some(
                self.blobs
                    .store(upload)
                    .await
                    .map_err(|e| AppError::persistence(CREATE_FAILED, e))?,
            ),
            None => None,
        };

        let event = NewEvent {
            title: request.title,
            description: request.description,
            date,
            time,
            location: request.location,
            poster,
            created_by: admin.id(),
            club_name: admin.club_name().map(str::to_string),
        };

        let id = self
            .repo
            .insert(event)
            .await
            .map_err(|e| AppError::persistence(CREATE_FAILED, e))?;

        info!(event_id = id, created_by = admin.id(), "Event created");
        Ok(id)
    }

    /// `event_id` is `None` when the path id cannot name any row. The form is
    /// still validated, then nothing is written, as for an id with no match.
    pub async fn update(
        &self,
        admin: &ClubAdmin,
        event_id: Option<i64>,
        request: UpdateEventRequest,
    ) -> Result<(), AppError> {
        let mut patch = EventPatch::from_request(&request)?;
        if patch.is_empty() && request.poster.is_none() {
            return Err(AppError::validation("No fields provided for update"));
        }

        let Some(event_id) = event_id else {
            debug!(actor_id = admin.id(), "Update targets no event");
            return Ok(());
        };

        if let Some(upload) = request.poster {
            let reference = self
                .blobs
                .store(upload)
                .await
                .map_err(|e| AppError::persistence(UPDATE_FAILED, e))?;
            patch.poster = Some(reference);
        }

        let affected = self
            .repo
            .update(event_id, &patch)
            .await
            .map_err(|e| AppError::persistence(UPDATE_FAILED, e))?;

        info!(event_id, actor_id = admin.id(), affected, "Event updated");
        Ok(())
    }

    pub async fn list_own(&self, admin: &ClubAdmin) -> Result<Vec<Event>, AppError> {
        self.repo
            .list_by_creator(admin.id())
            .await
            .map_err(|e| AppError::persistence(LIST_FAILED, e))
    }

    // Any club admin may read any event's roster.
    pub async fn registrations(
        &self,
        _admin: &ClubAdmin,
        event_id: Option<i64>,
    ) -> Result<Vec<Registrant>, AppError> {
        let Some(event_id) = event_id else {
            return Ok(Vec::new());
        };

        self.repo
            .list_registrants(event_id)
            .await
            .map_err(|e| AppError::persistence(REGISTRATIONS_FAILED, e))
    }

    /// Registrations pointing at the event are left in place.
    pub async fn delete(&self, admin: &ClubAdmin, event_id: Option<i64>) -> Result<(), AppError> {
        let Some(event_id) = event_id else {
            debug!(actor_id = admin.id(), "Delete targets no event");
            return Ok(());
        };

        let affected = self
            .repo
            .delete(event_id)
            .await
            .map_err(|e| AppError::persistence(DELETE_FAILED, e))?;

        info!(event_id, actor_id = admin.id(), affected, "Event deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{authorize, Actor, Role};
    use crate::repository::InMemoryEventRepository;
    use crate::storage::{BlobStoreError, PosterUpload};
    use async_trait::async_trait;
    use axum::body::Bytes;
    use chrono::{NaiveDate, NaiveTime};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingBlobStore {
        stored: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl BlobStore for RecordingBlobStore {
        async fn store(&self, upload: PosterUpload) -> Result<String, BlobStoreError> {
            if self.fail {
                return Err(io::Error::other("disk full").into());
            }
            let n = self.stored.fetch_add(1, Ordering::SeqCst) + 1;
            let ext = upload.file_name.rsplit('.').next().unwrap_or_default();
            Ok(format!("/uploads/{n}.{ext}"))
        }
    }

    fn chess_admin() -> ClubAdmin {
        authorize(Some(Actor::new(
            1,
            Role::ClubAdmin,
            Some("Chess Club".to_string()),
        )))
        .unwrap()
    }

    fn setup(blobs: RecordingBlobStore) -> (EventService, Arc<InMemoryEventRepository>, Arc<RecordingBlobStore>) {
        let repo = Arc::new(InMemoryEventRepository::new());
        let blobs = Arc::new(blobs);
        let service = EventService::new(repo.clone(), blobs.clone());
        (service, repo, blobs)
    }

    fn finals_night(poster: Option<PosterUpload>) -> CreateEventRequest {
        CreateEventRequest {
            title: "Finals Night".to_string(),
            description: "desc".to_string(),
            date: "2024-05-01".to_string(),
            time: "18:00".to_string(),
            location: "Hall A".to_string(),
            poster,
        }
    }

    fn png() -> PosterUpload {
        PosterUpload {
            file_name: "poster.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"png"),
        }
    }

    #[tokio::test]
    async fn test_create_takes_owner_from_actor() {
        let (service, repo, blobs) = setup(RecordingBlobStore::default());

        service
            .create(&chess_admin(), finals_night(Some(png())))
            .await
            .unwrap();

        let events = repo.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.created_by, 1);
        assert_eq!(event.club_name.as_deref(), Some("Chess Club"));
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(event.time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(event.poster.as_deref(), Some("/uploads/1.png"));
        assert_eq!(blobs.stored.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_without_poster_stores_null() {
        let (service, repo, blobs) = setup(RecordingBlobStore::default());

        service.create(&chess_admin(), finals_night(None)).await.unwrap();

        assert_eq!(repo.events()[0].poster, None);
        assert_eq!(blobs.stored.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_with_bad_date_writes_nothing() {
        let (service, repo, blobs) = setup(RecordingBlobStore::default());
        let mut request = finals_night(Some(png()));
        request.date = "May 1st".to_string();

        let err = service.create(&chess_admin(), request).await.unwrap_err();

        assert_eq!(err.public_message(), "Invalid date");
        assert_eq!(repo.call_count(), 0);
        assert_eq!(blobs.stored.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_blob_failure_is_persistence_error() {
        let (service, repo, _) = setup(RecordingBlobStore {
            fail: true,
            ..Default::default()
        });

        let err = service
            .create(&chess_admin(), finals_night(Some(png())))
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "Error creating event");
        assert_eq!(repo.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_repository_failure() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        repo.fail_with("connection reset");

        let err = service.create(&chess_admin(), finals_night(None)).await.unwrap_err();
        assert_eq!(err.public_message(), "Error creating event");
    }

    #[tokio::test]
    async fn test_update_title_only() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        let admin = chess_admin();
        let id = service.create(&admin, finals_night(None)).await.unwrap();

        let request = UpdateEventRequest {
            title: Some("New Title".to_string()),
            ..Default::default()
        };
        service.update(&admin, Some(id), request).await.unwrap();

        let event = &repo.events()[0];
        assert_eq!(event.title, "New Title");
        assert_eq!(event.description, "desc");
        assert_eq!(event.location, "Hall A");
        assert_eq!(event.created_by, 1);
        assert_eq!(event.club_name.as_deref(), Some("Chess Club"));
    }

    #[tokio::test]
    async fn test_update_by_other_admin_keeps_owner() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        let id = service.create(&chess_admin(), finals_night(None)).await.unwrap();

        let other = authorize(Some(Actor::new(
            9,
            Role::ClubAdmin,
            Some("Drama Club".to_string()),
        )))
        .unwrap();
        let request = UpdateEventRequest {
            location: Some("Stage".to_string()),
            ..Default::default()
        };
        service.update(&other, Some(id), request).await.unwrap();

        let event = &repo.events()[0];
        assert_eq!(event.location, "Stage");
        assert_eq!(event.created_by, 1);
        assert_eq!(event.club_name.as_deref(), Some("Chess Club"));
    }

    #[tokio::test]
    async fn test_update_poster_only() {
        let (service, repo, blobs) = setup(RecordingBlobStore::default());
        let admin = chess_admin();
        let id = service.create(&admin, finals_night(None)).await.unwrap();

        let request = UpdateEventRequest {
            poster: Some(png()),
            ..Default::default()
        };
        service.update(&admin, Some(id), request).await.unwrap();

        assert_eq!(repo.events()[0].poster.as_deref(), Some("/uploads/1.png"));
        assert_eq!(blobs.stored.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_without_storage() {
        let (service, repo, _) = setup(RecordingBlobStore::default());

        let err = service
            .update(&chess_admin(), Some(1), UpdateEventRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.public_message(), "No fields provided for update");
        assert_eq!(repo.call_count(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_event_is_success() {
        let (service, _, _) = setup(RecordingBlobStore::default());
        let request = UpdateEventRequest {
            title: Some("Ghost".to_string()),
            ..Default::default()
        };

        assert!(service.update(&chess_admin(), Some(404), request).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_repository_failure() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        repo.fail_with("timeout");
        let request = UpdateEventRequest {
            title: Some("x".to_string()),
            ..Default::default()
        };

        let err = service.update(&chess_admin(), Some(1), request).await.unwrap_err();
        assert_eq!(err.public_message(), "Error updating event");
    }

    #[tokio::test]
    async fn test_list_own_filters_by_creator() {
        let (service, _, _) = setup(RecordingBlobStore::default());
        let chess = chess_admin();
        let drama = authorize(Some(Actor::new(2, Role::ClubAdmin, None))).unwrap();
        service.create(&chess, finals_night(None)).await.unwrap();
        service.create(&drama, finals_night(None)).await.unwrap();
        service.create(&chess, finals_night(None)).await.unwrap();

        let mine = service.list_own(&chess).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.created_by == 1));

        let theirs = service.list_own(&drama).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].club_name, None);
    }

    #[tokio::test]
    async fn test_registrations_join_students() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        repo.add_user(10, "Ada", "ada@campus.edu");
        repo.add_user(11, "Linus", "linus@campus.edu");
        repo.add_registration(5, 10);
        repo.add_registration(5, 11);
        repo.add_registration(6, 10);

        let roster = service.registrations(&chess_admin(), Some(5)).await.unwrap();
        let names: Vec<_> = roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Linus"]);

        let empty = service.registrations(&chess_admin(), Some(99)).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_leaves_registrations() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        let admin = chess_admin();
        let id = service.create(&admin, finals_night(None)).await.unwrap();
        repo.add_registration(id, 10);

        service.delete(&admin, Some(id)).await.unwrap();
        service.delete(&admin, Some(id)).await.unwrap();

        assert!(repo.events().is_empty());
        assert_eq!(repo.registration_count(), 1);
    }

    #[tokio::test]
    async fn test_read_failures_use_operation_messages() {
        let (service, repo, _) = setup(RecordingBlobStore::default());
        repo.fail_with("down");
        let admin = chess_admin();

        let list = service.list_own(&admin).await.unwrap_err();
        assert_eq!(list.public_message(), "Error fetching events");

        let roster = service.registrations(&admin, Some(1)).await.unwrap_err();
        assert_eq!(roster.public_message(), "Error fetching registrations");

        let delete = service.delete(&admin, Some(1)).await.unwrap_err();
        assert_eq!(delete.public_message(), "Error deleting event");
    }

    #[tokio::test]
    async fn test_unaddressable_id_touches_nothing() {
        let (service, repo, blobs) = setup(RecordingBlobStore::default());
        let admin = chess_admin();

        let request = UpdateEventRequest {
            title: Some("Ghost".to_string()),
            poster: Some(png()),
            ..Default::default()
        };
        service.update(&admin, None, request).await.unwrap();
        service.delete(&admin, None).await.unwrap();
        let roster = service.registrations(&admin, None).await.unwrap();

        assert!(roster.is_empty());
        assert_eq!(repo.call_count(), 0);
        assert_eq!(blobs.stored.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unaddressable_id_still_validates_update() {
        let (service, _, _) = setup(RecordingBlobStore::default());

        let err = service
            .update(&chess_admin(), None, UpdateEventRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "No fields provided for update");
    }
}
