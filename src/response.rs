//! Standard response envelope helpers: `{ success, data, message?, pagination? }`.

use crate::pagination::Pagination;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

pub type Reply<T> = (StatusCode, Json<Success<T>>);

fn envelope<T: Serialize>(status: StatusCode, data: T, message: Option<String>, pagination: Option<Pagination>) -> Reply<T> {
    (
        status,
        Json(Success {
            success: true,
            data,
            message,
            pagination,
        }),
    )
}

pub fn ok<T: Serialize>(data: T) -> Reply<T> {
    envelope(StatusCode::OK, data, None, None)
}

pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Reply<T> {
    envelope(StatusCode::OK, data, Some(message.into()), None)
}

pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> Reply<T> {
    envelope(StatusCode::CREATED, data, Some(message.into()), None)
}

pub fn paginated<T: Serialize>(data: Vec<T>, pagination: Pagination) -> Reply<Vec<T>> {
    envelope(StatusCode::OK, data, None, Some(pagination))
}

/// Delete/logout style replies with no payload.
pub fn done(message: impl Into<String>) -> Reply<Option<()>> {
    envelope(StatusCode::OK, None, Some(message.into()), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::validate_pagination_params;

    #[test]
    fn success_envelope_shape() {
        let (status, Json(body)) = created(serde_json::json!({"id": 1}), "Создано");
        assert_eq!(status, StatusCode::CREATED);
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["id"], 1);
        assert_eq!(v["message"], "Создано");
        assert!(v.get("pagination").is_none());
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let (_, Json(body)) = paginated(vec![1, 2], Pagination::new(validate_pagination_params(1, 2), 5));
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["pagination"]["totalPages"], 3);
        assert_eq!(v["pagination"]["hasNext"], true);
    }
}
