//! JSON body extractor that never rejects.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Decodes the request body as JSON, falling back to `T::default()` when the
/// body is empty, malformed, or of the wrong shape.
///
/// Field-level checks are left to the service layer, so a garbage body
/// surfaces as the same validation error as an empty one.
///
/// ```ignore
/// async fn create(LenientJson(input): LenientJson<CreateProductRequest>) -> Response {
///     // input is CreateProductRequest::default() for `{not json`
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientJson<T>(pub T);

impl<T> LenientJson<T>
where
    T: DeserializeOwned + Default,
{
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self(T::default());
        }

        match serde_json::from_slice(bytes) {
            Ok(value) => Self(value),
            Err(err) => {
                tracing::debug!(error = %err, "undecodable JSON body, using defaults");
                Self(T::default())
            }
        }
    }
}

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Only a body that cannot be read at all (e.g. over the size limit) is rejected.
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self::from_bytes(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Input {
        #[serde(default)]
        name: String,
        #[serde(default)]
        stock: Option<i32>,
    }

    #[test]
    fn test_decodes_valid_json() {
        let LenientJson(input) = LenientJson::<Input>::from_bytes(br#"{"name":"pen","stock":0}"#);
        assert_eq!(
            input,
            Input {
                name: "pen".into(),
                stock: Some(0)
            }
        );
    }

    #[test]
    fn test_malformed_json_becomes_default() {
        let LenientJson(input) = LenientJson::<Input>::from_bytes(b"{not json");
        assert_eq!(input, Input::default());
    }

    #[test]
    fn test_wrong_types_become_default() {
        let LenientJson(input) = LenientJson::<Input>::from_bytes(br#"{"stock":"many"}"#);
        assert_eq!(input, Input::default());
    }

    #[test]
    fn test_empty_body_becomes_default() {
        let LenientJson(input) = LenientJson::<Input>::from_bytes(b"  \n");
        assert_eq!(input, Input::default());
    }

    #[tokio::test]
    async fn test_extractor_ignores_content_type() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(axum::body::Body::from(r#"{"name":"lamp"}"#))
            .unwrap();

        let LenientJson(input) = LenientJson::<Input>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(input.name, "lamp");
        assert_eq!(input.stock, None);
    }
}
