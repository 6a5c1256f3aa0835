//! HTTP handlers: public catalog and forms, auth, and the admin back-office.

pub mod auth;
pub mod categories;
pub mod certificates;
pub mod contacts;
pub mod products;
pub mod questionnaires;
pub mod site;
pub mod stats;
pub mod users;

use crate::error::AppError;
use uuid::Uuid;

fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str.trim()).map_err(|_| AppError::BadRequest("Некорректный идентификатор".into()))
}

/// `true`/`false` (also `1`/`0`) query flags; anything else means "no filter".
fn parse_flag(v: Option<&str>) -> Option<bool> {
    match v.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => Some(true),
        Some("false") | Some("0") => Some(false),
        _ => None,
    }
}

fn found<T>(row: Option<T>, message: &str) -> Result<T, AppError> {
    row.ok_or_else(|| AppError::NotFound(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert_eq!(parse_flag(Some("true")), Some(true));
        assert_eq!(parse_flag(Some(" FALSE ")), Some(false));
        assert_eq!(parse_flag(Some("0")), Some(false));
        assert_eq!(parse_flag(Some("maybe")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn ids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("42"), Err(AppError::BadRequest(_))));
    }
}
