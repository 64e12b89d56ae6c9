use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::uploads::UploadedFile;

/// Name of the multipart file field carrying a recipe photo
pub const PHOTO_FIELD: &str = "photo";

/// Request body decoded from JSON, urlencoded or multipart form data.
///
/// Form encodings land in a JSON object of strings; a field named `key[]`
/// collects every occurrence into an array under `key`.
#[derive(Debug, Default)]
pub struct Payload {
    body: Value,
    photo: Option<UploadedFile>,
}

impl Payload {
    pub fn json(body: Value) -> Self {
        Self { body, photo: None }
    }

    pub fn empty() -> Self {
        Self::json(Value::Null)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// A string field; anything else (missing, number, list) is `None`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.body.get(key).and_then(Value::as_str)
    }

    /// A list field, given either as an array or as a string holding a JSON array
    pub fn list(&self, key: &str) -> Option<Vec<Value>> {
        as_list(self.body.get(key)?)
    }

    /// Ids for bulk deletes: the body itself when it is an array, else the `ids` field
    pub fn id_list(&self) -> Option<Vec<Value>> {
        match &self.body {
            Value::Array(items) => Some(items.clone()),
            _ => self.list("ids"),
        }
    }

    pub fn photo(&self) -> Option<&UploadedFile> {
        self.photo.as_ref()
    }

    pub fn take_photo(&mut self) -> Option<UploadedFile> {
        self.photo.take()
    }

    fn from_fields<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields = Map::new();
        for (name, value) in pairs {
            insert_field(&mut fields, &name, value);
        }
        Self::json(Value::Object(fields))
    }
}

fn as_list(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn insert_field(fields: &mut Map<String, Value>, name: &str, value: String) {
    match name.strip_suffix("[]") {
        Some(key) => {
            let entry = fields
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            match entry {
                Value::Array(items) => items.push(Value::String(value)),
                other => *other = Value::Array(vec![Value::String(value)]),
            }
        }
        None => {
            fields.insert(name.to_string(), Value::String(value));
        }
    }
}

fn content_type(req: &Request) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}

async fn read_multipart(mut multipart: Multipart) -> Result<Payload, ApiError> {
    let mut pairs = Vec::new();
    let mut photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;

            // An empty file input is sent as a nameless, zero-length part
            if name == PHOTO_FIELD && !(file_name.is_empty() && bytes.is_empty()) {
                photo = Some(UploadedFile { file_name, content_type, bytes });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        pairs.push((name, value));
    }

    let mut payload = Payload::from_fields(pairs);
    payload.photo = photo;
    Ok(payload)
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req);

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload::empty());
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let pairs = url::form_urlencoded::parse(&bytes).into_owned();
            return Ok(Payload::from_fields(pairs));
        }

        serde_json::from_slice::<Value>(&bytes)
            .map(Payload::json)
            .map_err(|e| ApiError::invalid_json(format!("Invalid JSON body: {}", e)))
    }
}
