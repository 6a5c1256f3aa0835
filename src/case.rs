//! Identifier case conversion between API (camelCase) and database (snake_case) names.

/// Convert a single identifier from snake_case to camelCase.
/// e.g. "category_id" -> "categoryId", "created_at" -> "createdAt"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a single identifier from camelCase to snake_case.
/// e.g. "sortOrder" -> "sort_order", "createdAt" -> "created_at"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_and_snake() {
        assert_eq!(to_camel_case("expiry_date"), "expiryDate");
        assert_eq!(to_camel_case("name"), "name");
        assert_eq!(to_snake_case("isActive"), "is_active");
        assert_eq!(to_snake_case("sort_order"), "sort_order");
    }
}
