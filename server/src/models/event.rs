use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::storage::PosterUpload;
use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub poster: Option<String>,
    pub created_by: i64,
    pub club_name: Option<String>,
}

/// Row to insert. `created_by` and `club_name` always come from the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub poster: Option<String>,
    pub created_by: i64,
    pub club_name: Option<String>,
}

/// Event fields a client may set on update, in assignment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    Description,
    Date,
    Time,
    Location,
}

impl EventField {
    pub const UPDATABLE: [EventField; 5] = [
        EventField::Title,
        EventField::Description,
        EventField::Date,
        EventField::Time,
        EventField::Location,
    ];

    /// Form field name, which is also the column name.
    pub fn name(self) -> &'static str {
        match self {
            EventField::Title => "title",
            EventField::Description => "description",
            EventField::Date => "date",
            EventField::Time => "time",
            EventField::Location => "location",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::UPDATABLE.into_iter().find(|field| field.name() == name)
    }
}

/// Multipart payload shared by create and update. Unknown form fields never
/// reach this type.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub poster: Option<PosterUpload>,
}

impl EventForm {
    pub fn set(&mut self, field: EventField, value: String) {
        let slot = match field {
            EventField::Title => &mut self.title,
            EventField::Description => &mut self.description,
            EventField::Date => &mut self.date,
            EventField::Time => &mut self.time,
            EventField::Location => &mut self.location,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub poster: Option<PosterUpload>,
}

impl CreateEventRequest {
    pub fn from_form(form: EventForm) -> Result<Self, AppError> {
        fn required(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        match (
            required(form.title),
            required(form.description),
            required(form.date),
            required(form.time),
            required(form.location),
        ) {
            (Some(title), Some(description), Some(date), Some(time), Some(location)) => Ok(Self {
                title,
                description,
                date,
                time,
                location,
                poster: form.poster,
            }),
            _ => Err(AppError::validation("Missing required fields")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub poster: Option<PosterUpload>,
}

impl From<EventForm> for UpdateEventRequest {
    fn from(form: EventForm) -> Self {
        Self {
            title: form.title,
            description: form.description,
            date: form.date,
            time: form.time,
            location: form.location,
            poster: form.poster,
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| AppError::validation("Invalid date"))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::validation("Invalid time"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchValue<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Time(NaiveTime),
}

/// Subset of an event's fields to overwrite in one update.
///
/// `created_by` and `club_name` have no slot here, so an update can never
/// reassign them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub poster: Option<String>,
}

struct PatchDescriptor {
    column: &'static str,
    value: fn(&EventPatch) -> Option<PatchValue<'_>>,
}

static PATCH_DESCRIPTORS: [PatchDescriptor; 6] = [
    PatchDescriptor {
        column: "title",
        value: |p| p.title.as_deref().map(PatchValue::Text),
    },
    PatchDescriptor {
        column: "description",
        value: |p| p.description.as_deref().map(PatchValue::Text),
    },
    PatchDescriptor {
        column: "date",
        value: |p| p.date.map(PatchValue::Date),
    },
    PatchDescriptor {
        column: "time",
        value: |p| p.time.map(PatchValue::Time),
    },
    PatchDescriptor {
        column: "location",
        value: |p| p.location.as_deref().map(PatchValue::Text),
    },
    PatchDescriptor {
        column: "poster",
        value: |p| p.poster.as_deref().map(PatchValue::Text),
    },
];

impl EventPatch {
    /// Validates the client-supplied fields. The poster reference is attached
    /// separately once the upload has been stored.
    pub fn from_request(request: &UpdateEventRequest) -> Result<Self, AppError> {
        if request.title.as_deref() == Some("") {
            return Err(AppError::validation("Title cannot be empty"));
        }

        Ok(Self {
            title: request.title.clone(),
            description: request.description.clone(),
            date: request.date.as_deref().map(parse_date).transpose()?,
            time: request.time.as_deref().map(parse_time).transpose()?,
            location: request.location.clone(),
            poster: None,
        })
    }

    /// `(column, value)` pairs for every field present, in a fixed order
    /// with `poster` last.
    pub fn assignments(&self) -> impl Iterator<Item = (&'static str, PatchValue<'_>)> + '_ {
        PATCH_DESCRIPTORS
            .iter()
            .filter_map(move |d| (d.value)(self).map(|value| (d.column, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().next().is_none()
    }

    pub fn apply(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            event.description.clone_from(description);
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(location) = &self.location {
            event.location.clone_from(location);
        }
        if let Some(poster) = &self.poster {
            event.poster = Some(poster.clone());
        }
    }
}
