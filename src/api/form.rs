//! Multipart form decoding
//!
//! Text parts are kept in arrival order. File parts with no content are
//! dropped, which is what a browser sends for an untouched file input.
//! Array values may arrive as indexed keys (`testNames[0]`), bracket keys
//! (`testNames[]`) or repeated plain keys.

use axum::extract::Multipart;

use crate::api::error::ApiError;
use crate::core::avatars::AvatarUpload;

/// Decoded multipart form
#[derive(Debug, Default)]
pub struct FormData {
    text: Vec<(String, String)>,
    files: Vec<(String, AvatarUpload)>,
}

impl FormData {
    /// Buffers every part of the request
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for malformed multipart bodies and for
    /// bodies over the configured size limit.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field.bytes().await?;
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files
                        .push((name, AvatarUpload::new(Some(filename), bytes.to_vec())));
                }
                None => {
                    let value = field.text().await?;
                    form.text.push((name, value));
                }
            }
        }

        tracing::debug!(
            text_fields = form.text.len(),
            files = form.files.len(),
            "Multipart form decoded"
        );
        Ok(form)
    }

    /// First non-blank value for `name`, trimmed
    pub fn text(&self, name: &str) -> Option<String> {
        self.text
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Like [`Self::text`] but fails with a 400 naming the field
    pub fn require(&self, name: &str) -> Result<String, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))
    }

    /// Values for an array field, ordered by index where one is given
    ///
    /// Blank values are skipped.
    pub fn list(&self, name: &str) -> Vec<String> {
        let mut entries: Vec<(usize, String)> = self
            .text
            .iter()
            .enumerate()
            .filter_map(|(position, (key, value))| {
                let order = array_position(key, name, position)?;
                let value = value.trim();
                (!value.is_empty()).then(|| (order, value.to_string()))
            })
            .collect();

        entries.sort_by_key(|(order, _)| *order);
        entries.into_iter().map(|(_, value)| value).collect()
    }

    /// Removes and returns the file uploaded under `name`
    pub fn take_file(&mut self, name: &str) -> Option<AvatarUpload> {
        let index = self.files.iter().position(|(key, _)| key == name)?;
        Some(self.files.remove(index).1)
    }
}

/// Sort position of `key` within array `name`, or `None` if it belongs to
/// another field
fn array_position(key: &str, name: &str, position: usize) -> Option<usize> {
    let rest = key.strip_prefix(name)?;
    if rest.is_empty() {
        return Some(position);
    }

    let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        Some(position)
    } else {
        inner.parse().ok()
    }
}
