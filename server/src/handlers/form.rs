use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use tracing::debug;

use crate::models::{EventField, EventForm};
use crate::storage::PosterUpload;
use crate::utils::error::AppError;

const POSTER_FIELD: &str = "poster";

/// Reads the request body into an [`EventForm`].
///
/// A missing or non-multipart body reads as an empty form. Text parts
/// outside the updatable field set are dropped. A `poster` part only counts
/// as an upload when it carries a file name; browsers submit an empty,
/// nameless part when no file was chosen.
pub async fn read_event_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<EventForm, AppError> {
    let mut form = EventForm::default();

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "No multipart body, reading empty form");
            return Ok(form);
        }
    };

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == POSTER_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;

            match file_name {
                Some(file_name) if !(file_name.is_empty() && bytes.is_empty()) => {
                    form.poster = Some(PosterUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                _ => debug!("Ignoring poster part without a file"),
            }
            continue;
        }

        match EventField::from_name(&name) {
            Some(event_field) => form.set(event_field, field.text().await?),
            None => debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}
