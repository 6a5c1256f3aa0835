//! Builds parameterized list/count queries. Identifiers come from code only, values are always parameters.

use crate::case::to_snake_case;
use crate::pagination::PageParams;
use crate::sql::PgBindValue;

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

/// WHERE-clause accumulator over a fixed FROM clause.
#[derive(Debug, Clone)]
pub struct ListQuery {
    from: String,
    conditions: Vec<String>,
    params: Vec<PgBindValue>,
    order_by: Option<String>,
}

/// Escape LIKE wildcards so user input matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// ORDER BY from client `sortBy`/`sortOrder`. The column (camelCase accepted) must be in
/// `allowed`, given as `(api_snake_name, sql_expression)`; anything else yields `default`.
pub fn order_clause(sort_by: Option<&str>, sort_order: Option<&str>, allowed: &[(&str, &str)], default: &str) -> String {
    let Some(requested) = sort_by.map(to_snake_case) else {
        return default.to_string();
    };
    let Some((_, expr)) = allowed.iter().find(|(name, _)| *name == requested) else {
        return default.to_string();
    };
    let direction = match sort_order.map(str::to_ascii_lowercase).as_deref() {
        Some("desc") => "DESC",
        _ => "ASC",
    };
    format!("{} {}", expr, direction)
}

impl ListQuery {
    pub fn new(from: &str) -> Self {
        ListQuery {
            from: from.to_string(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: None,
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// `column = $n`
    pub fn eq(&mut self, column: &str, value: impl Into<PgBindValue>) -> &mut Self {
        let n = self.push_param(value.into());
        self.conditions.push(format!("{} = ${}", column, n));
        self
    }

    /// `column = $n::pg_type`, for enum columns filtered by their text value.
    pub fn eq_cast(&mut self, column: &str, value: impl Into<PgBindValue>, pg_type: &str) -> &mut Self {
        let n = self.push_param(value.into());
        self.conditions.push(format!("{} = ${}::{}", column, n, pg_type));
        self
    }

    /// Case-insensitive substring match on any of `columns`. Blank terms add nothing.
    pub fn search(&mut self, columns: &[&str], term: &str) -> &mut Self {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        let n = self.push_param(PgBindValue::String(like_pattern(term)));
        let ors: Vec<String> = columns
            .iter()
            .map(|c| format!("{} ILIKE ${}", c, n))
            .collect();
        self.conditions.push(format!("({})", ors.join(" OR ")));
        self
    }

    pub fn order_by(&mut self, clause: &str) -> &mut Self {
        self.order_by = Some(clause.to_string());
        self
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// `SELECT columns FROM .. WHERE .. ORDER BY .. LIMIT $n OFFSET $m`
    pub fn select(&self, columns: &str, page: PageParams) -> QueryBuf {
        let mut params = self.params.clone();
        let mut sql = format!("SELECT {} FROM {}{}", columns, self.from, self.where_clause());
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        params.push(PgBindValue::I64(page.limit));
        params.push(PgBindValue::I64(page.offset));
        sql.push_str(&format!(" LIMIT ${} OFFSET ${}", params.len() - 1, params.len()));
        QueryBuf { sql, params }
    }

    /// `SELECT ... ` without paging, for small unpaginated lists.
    pub fn select_all(&self, columns: &str) -> QueryBuf {
        let mut sql = format!("SELECT {} FROM {}{}", columns, self.from, self.where_clause());
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        QueryBuf {
            sql,
            params: self.params.clone(),
        }
    }

    /// `SELECT COUNT(*) FROM .. WHERE ..` with the same filters.
    pub fn count(&self) -> QueryBuf {
        QueryBuf {
            sql: format!("SELECT COUNT(*) FROM {}{}", self.from, self.where_clause()),
            params: self.params.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::validate_pagination_params;

    #[test]
    fn builds_filtered_page_and_count() {
        let mut q = ListQuery::new("products p");
        q.eq("p.is_active", true)
            .search(&["p.name", "p.description"], "насос")
            .order_by("p.sort_order ASC");
        let page = q.select("p.id, p.name", validate_pagination_params(2, 10));
        assert_eq!(
            page.sql,
            "SELECT p.id, p.name FROM products p WHERE p.is_active = $1 AND (p.name ILIKE $2 OR p.description ILIKE $2) ORDER BY p.sort_order ASC LIMIT $3 OFFSET $4"
        );
        assert_eq!(page.params.len(), 4);
        assert_eq!(page.params[2], PgBindValue::I64(10));
        assert_eq!(page.params[3], PgBindValue::I64(10));

        let count = q.count();
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) FROM products p WHERE p.is_active = $1 AND (p.name ILIKE $2 OR p.description ILIKE $2)"
        );
        assert_eq!(count.params.len(), 2);
    }

    #[test]
    fn no_filters_no_where() {
        let q = ListQuery::new("contact_requests");
        assert_eq!(q.count().sql, "SELECT COUNT(*) FROM contact_requests");
    }

    #[test]
    fn enum_cast_and_blank_search() {
        let mut q = ListQuery::new("contact_requests");
        q.eq_cast("status", "new", "contact_status").search(&["name"], "   ");
        assert_eq!(q.count().sql, "SELECT COUNT(*) FROM contact_requests WHERE status = $1::contact_status");
    }

    #[test]
    fn order_clause_whitelist() {
        let allowed = [("name", "p.name"), ("created_at", "p.created_at")];
        assert_eq!(order_clause(Some("createdAt"), Some("DESC"), &allowed, "p.sort_order ASC"), "p.created_at DESC");
        assert_eq!(order_clause(Some("name"), None, &allowed, "p.sort_order ASC"), "p.name ASC");
        assert_eq!(order_clause(Some("password_hash"), None, &allowed, "p.sort_order ASC"), "p.sort_order ASC");
        assert_eq!(order_clause(None, Some("desc"), &allowed, "p.sort_order ASC"), "p.sort_order ASC");
    }

    #[test]
    fn like_wildcards_escaped() {
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }
}
