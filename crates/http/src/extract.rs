//! Request body extraction tolerant of JSON and HTML form submissions.

use std::convert::Infallible;

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body decoded from `application/json` or `application/x-www-form-urlencoded`.
///
/// Never rejects: a missing, mistyped, or unparsable body yields
/// `T::default()` so handlers report the absent field themselves.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        let parsed = if is_form {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| rejection.body_text())
        } else {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text())
        };

        match parsed {
            Ok(value) => Ok(Self(value)),
            Err(reason) => {
                tracing::debug!(%reason, "request body ignored");
                Ok(Self(T::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct TitleBody {
        title: Option<String>,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> TitleBody {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        let Payload(value) = Payload::<TitleBody>::from_request(request, &())
            .await
            .unwrap();
        value
    }

    #[tokio::test]
    async fn reads_json_bodies() {
        let value = extract(Some("application/json"), r#"{"title":"Dune"}"#).await;
        assert_eq!(value.title.as_deref(), Some("Dune"));
    }

    #[tokio::test]
    async fn reads_form_bodies() {
        let value = extract(
            Some("application/x-www-form-urlencoded"),
            "title=The+Left+Hand+of+Darkness",
        )
        .await;
        assert_eq!(value.title.as_deref(), Some("The Left Hand of Darkness"));
    }

    #[tokio::test]
    async fn falls_back_to_default() {
        assert_eq!(extract(None, "").await, TitleBody::default());
        assert_eq!(
            extract(Some("application/json"), "{not json").await,
            TitleBody::default()
        );
        assert_eq!(
            extract(Some("application/json"), r#"{"title":42}"#).await,
            TitleBody::default()
        );
    }
}
