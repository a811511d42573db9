use std::fmt;

use axum::extract::{FromRequest, Json, Request};
use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};
use tracing::warn;

use crate::application::errors::{ApiError, AppError};
use crate::domain::listing::{DEFAULT_PAGE_SIZE, PageRequest};

/// JSON request body whose rejections use the API's `{ "message" }` shape.
#[derive(Debug)]
pub(crate) struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: Send + 'static,
    Json<T>: FromRequest<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|_| {
            warn!("failed to parse JSON payload");
            ApiError::from(AppError::validation("Invalid JSON payload"))
        })?;
        Ok(Self(payload))
    }
}

/// `?page=&limit=` for paginated listings. Values that are missing or not
/// positive integers fall back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

impl ListQuery {
    pub fn into_request(self) -> PageRequest {
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
        PageRequest::new(page, limit)
    }
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Accepts `4`, `4.0`, `"4"` or `null`/missing. Anything else deserializes to
/// `None` so the handler can report the field as missing.
pub(crate) fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientInteger;

    impl Visitor<'_> for LenientInteger {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer, a numeric string, or null")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(i64::try_from(value).ok())
        }

        #[allow(clippy::float_cmp)] // exact integral check
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                Ok(Some(value as i64))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.trim().parse::<i64>().ok())
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientInteger)
}
