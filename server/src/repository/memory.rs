//! In-memory [`EventRepository`], used by the test suites.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{Event, EventPatch, NewEvent, Registrant};
use crate::repository::{EventRepository, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    events: Vec<Event>,
    users: Vec<Registrant>,
    registrations: Vec<(i64, i64)>,
    failure: Option<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts the call, then fails if a failure has been injected.
    fn begin(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables();
        if let Some(reason) = &tables.failure {
            return Err(RepositoryError::Unavailable(reason.clone()));
        }
        Ok(tables)
    }

    /// Makes every following call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.tables().failure = Some(reason.into());
    }

    pub fn add_user(&self, id: i64, name: &str, email: &str) {
        self.tables().users.push(Registrant {
            id,
            name: name.to_string(),
            email: email.to_string(),
        });
    }

    pub fn add_registration(&self, event_id: i64, student_id: i64) {
        self.tables().registrations.push((event_id, student_id));
    }

    pub fn events(&self) -> Vec<Event> {
        self.tables().events.clone()
    }

    pub fn registration_count(&self) -> usize {
        self.tables().registrations.len()
    }

    /// Number of repository operations attempted so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<i64, RepositoryError> {
        let mut tables = self.begin()?;
        tables.next_id += 1;
        let id = tables.next_id;
        tables.events.push(Event {
            id,
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            poster: event.poster,
            created_by: event.created_by,
            club_name: event.club_name,
        });
        Ok(id)
    }

    async fn update(&self, id: i64, patch: &EventPatch) -> Result<u64, RepositoryError> {
        let mut tables = self.begin()?;
        let mut affected = 0;
        for event in tables.events.iter_mut().filter(|e| e.id == id) {
            patch.apply(event);
            affected += 1;
        }
        Ok(affected)
    }

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, RepositoryError> {
        let tables = self.begin()?;
        Ok(tables
            .events
            .iter()
            .filter(|e| e.created_by == creator_id)
            .cloned()
            .collect())
    }

    async fn list_registrants(&self, event_id: i64) -> Result<Vec<Registrant>, RepositoryError> {
        let tables = self.begin()?;
        Ok(tables
            .registrations
            .iter()
            .filter(|(event, _)| *event == event_id)
            .filter_map(|(_, student)| tables.users.iter().find(|u| u.id == *student))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<u64, RepositoryError> {
        let mut tables = self.begin()?;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        Ok((before - tables.events.len()) as u64)
    }
}
