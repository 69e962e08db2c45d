//! Remote note service client over blocking HTTP.
//!
//! # Responsibility
//! - Map client operations onto `POST` endpoints with JSON bodies.
//! - Decode the `/getAll` payload into a populated `User`.
//!
//! # Invariants
//! - Only `/getAll` responses are interpreted; mutation responses are ignored.
//! - Non-200 `/getAll` responses yield `Ok(None)`.
//! - No retries: each operation issues exactly one request.

use super::config::ClientConfig;
use super::error::{DbRequestError, DbRequestResult};
use super::NoteDbClient;
use crate::logging::sanitize_message;
use crate::model::category::Category;
use crate::model::key::{CategoryKey, UserKey};
use crate::model::user::User;
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

const GET_ALL_ENDPOINT: &str = "getAll";
const ADD_NOTE_ENDPOINT: &str = "addToDo";
const REMOVE_NOTE_ENDPOINT: &str = "removeToDo";
const ADD_CATEGORY_ENDPOINT: &str = "addType";
const MAX_LOGGED_NOTE_CHARS: usize = 64;

#[derive(Debug, Serialize)]
struct GetAllBody<'a> {
    user: &'a str,
}

#[derive(Debug, Serialize)]
struct NoteBody<'a> {
    list: &'a str,
    user: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct CategoryBody<'a> {
    list: &'a str,
}

/// `/getAll` payload: category name to notes.
type CategoryNotes = HashMap<String, Vec<String>>;

/// Client for the remote note service.
#[derive(Debug, Clone)]
pub struct HttpNoteDbClient {
    http: Client,
    base_url: String,
}

impl HttpNoteDbClient {
    /// Builds a client for the configured server.
    ///
    /// # Errors
    /// - Returns a transport error when the HTTP backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> DbRequestResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| DbRequestError::transport("client_build", err))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client for the default server.
    pub fn with_defaults() -> DbRequestResult<Self> {
        Self::new(&ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for one endpoint.
    pub fn url(&self, suffix: &str) -> String {
        format!("{}/{}", self.base_url, suffix)
    }

    fn post<B: Serialize>(
        &self,
        operation: &'static str,
        endpoint: &str,
        body: &B,
    ) -> DbRequestResult<Response> {
        let started_at = Instant::now();
        let response = self
            .http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .map_err(|err| {
                warn!(
                    "event=remote_request module=client status=error op={operation} endpoint=/{endpoint} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                DbRequestError::transport(operation, err)
            })?;
        info!(
            "event=remote_request module=client status=ok op={operation} endpoint=/{endpoint} http_status={} duration_ms={}",
            response.status().as_u16(),
            started_at.elapsed().as_millis()
        );
        Ok(response)
    }

    fn send_note(
        &self,
        operation: &'static str,
        endpoint: &str,
        key: &CategoryKey,
        note: &str,
    ) -> DbRequestResult<()> {
        info!(
            "event=remote_request module=client status=start op={operation} user={} category={} note={}",
            key.owner.name,
            key.name,
            sanitize_message(note, MAX_LOGGED_NOTE_CHARS)
        );
        let body = NoteBody {
            list: &key.name,
            user: &key.owner.name,
            name: note,
        };
        self.post(operation, endpoint, &body)?;
        Ok(())
    }
}

impl NoteDbClient for HttpNoteDbClient {
    fn get_user(&self, key: &UserKey) -> DbRequestResult<Option<User>> {
        const OPERATION: &str = "get_user";
        info!(
            "event=remote_request module=client status=start op={OPERATION} user={}",
            key.name
        );

        let response = self.post(
            OPERATION,
            GET_ALL_ENDPOINT,
            &GetAllBody { user: &key.name },
        )?;

        if response.status() != StatusCode::OK {
            info!(
                "event=user_fetch module=client status=absent user={} http_status={}",
                key.name,
                response.status().as_u16()
            );
            return Ok(None);
        }

        let text = response
            .text()
            .map_err(|err| DbRequestError::transport(OPERATION, err))?;
        // An empty or `null` body is the service's "no such user" answer.
        let payload: Option<CategoryNotes> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).map_err(|err| DbRequestError::decode(OPERATION, err))?
        };
        let Some(payload) = payload else {
            info!(
                "event=user_fetch module=client status=absent user={} http_status=200",
                key.name
            );
            return Ok(None);
        };

        Ok(Some(build_user(key, payload)))
    }

    fn add_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        self.send_note("add_note", ADD_NOTE_ENDPOINT, key, note)
    }

    fn remove_note(&self, key: &CategoryKey, note: &str) -> DbRequestResult<()> {
        self.send_note("remove_note", REMOVE_NOTE_ENDPOINT, key, note)
    }

    fn create_category(&self, key: &CategoryKey) -> DbRequestResult<()> {
        const OPERATION: &str = "create_category";
        info!(
            "event=remote_request module=client status=start op={OPERATION} user={} category={}",
            key.owner.name, key.name
        );
        self.post(
            OPERATION,
            ADD_CATEGORY_ENDPOINT,
            &CategoryBody { list: &key.name },
        )?;
        Ok(())
    }
}

fn build_user(key: &UserKey, payload: CategoryNotes) -> User {
    let mut user = User::from_key(key.clone());
    for (name, notes) in payload {
        // Map keys are unique and owned by `key`, so insertion cannot fail.
        let _ = user.insert_category(Category::with_notes(key.clone(), name, notes));
    }
    user
}
