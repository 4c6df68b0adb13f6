//! Item body extractor for write routes

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use bytes::Bytes;
use serde::de::Error as _;
use serde_json::{Map, Value};
use todo_core::Item;

/// JSON request body decoded as an [`Item`].
///
/// Unlike `axum::Json` this does not look at the `Content-Type` header.
/// Decoding follows [`decode_item`], and every failure is rejected with
/// [`ApiError::InvalidPayload`].
#[derive(Debug)]
pub struct ItemPayload(pub Item);

#[async_trait]
impl<S> FromRequest<S> for ItemPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            ApiError::InvalidPayload
        })?;

        decode_item(&body)
            .map(ItemPayload)
            .map_err(|e| {
                tracing::debug!("Rejected item payload: {}", e);
                ApiError::InvalidPayload
            })
    }
}

/// Decode the first JSON value in `body` as an [`Item`].
///
/// Anything after that value is ignored. A `null` body yields an empty
/// item, object keys match field names case-insensitively and `null` fields
/// keep their defaults.
pub fn decode_item(body: &[u8]) -> serde_json::Result<Item> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| serde_json::Error::custom("empty request body"))??;

    match first {
        Value::Null => Ok(Item::default()),
        Value::Object(fields) => {
            let fields: Map<String, Value> = fields
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect();
            serde_json::from_value(Value::Object(fields))
        }
        other => Err(serde_json::Error::custom(format!(
            "expected an object, found {}",
            other
        ))),
    }
}
