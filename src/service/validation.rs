//! Form and payload validation with per-field messages.

use crate::case::to_camel_case;
use crate::error::AppError;
use crate::models::*;
use crate::util::{format_date_long, is_valid_phone, normalize_phone, sanitize_input};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 255;
pub const COMMENT_MAX: usize = 1000;
pub const TITLE_MAX: usize = 200;
pub const URL_MAX: usize = 2048;
pub const PASSWORD_MIN: usize = 8;

fn person_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Zа-яА-ЯёЁ\s'.\-]+$").expect("static name pattern"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
}

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("static slug pattern"))
}

/// Field name -> first message. Keys are stored in camelCase as the client sends them.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(to_camel_case(field)).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::fields(self.0))
        }
    }
}

fn trimmed(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Required on create (`partial == false`); when present, non-blank and at most `max` chars.
fn text_field(errors: &mut FieldErrors, field: &str, value: &Option<String>, partial: bool, max: usize) {
    match (value, trimmed(value)) {
        (None, _) if partial => {}
        (_, None) => errors.add(field, "Обязательное поле"),
        (_, Some(s)) if char_len(s) > max => errors.add(field, format!("Не более {} символов", max)),
        _ => {}
    }
}

fn optional_max(errors: &mut FieldErrors, field: &str, value: &Option<String>, max: usize) {
    if let Some(s) = trimmed(value) {
        if char_len(s) > max {
            errors.add(field, format!("Не более {} символов", max));
        }
    }
}

fn url_field(errors: &mut FieldErrors, field: &str, value: &Option<String>, partial: bool) {
    text_field(errors, field, value, partial, URL_MAX);
    if let Some(s) = trimmed(value) {
        if !(s.starts_with('/') || s.starts_with("http://") || s.starts_with("https://")) {
            errors.add(field, "Укажите ссылку (http(s)://… или /…)");
        }
    }
}

fn slug_field(errors: &mut FieldErrors, value: &Option<String>) {
    if let Some(s) = trimmed(value) {
        if !slug_re().is_match(s) {
            errors.add("slug", "Только латинские буквы в нижнем регистре, цифры и дефисы");
        }
    }
}

fn sort_order_field(errors: &mut FieldErrors, value: Option<i32>) {
    if matches!(value, Some(n) if n < 0) {
        errors.add("sort_order", "Порядок не может быть отрицательным");
    }
}

fn optional_clean(v: &Option<String>) -> Option<String> {
    trimmed(v).map(sanitize_input)
}

/// Validate a public contact/order form and produce the sanitized record to insert.
pub fn validate_contact_form(form: &ContactForm, source: ContactSource) -> Result<NewContactRequest, AppError> {
    let mut errors = FieldErrors::default();

    let name = trimmed(&form.name);
    match name {
        None => errors.add("name", "Введите имя"),
        Some(n) if char_len(n) < NAME_MIN => errors.add("name", "Имя должно содержать минимум 2 символа"),
        Some(n) if char_len(n) > NAME_MAX => errors.add("name", "Имя должно содержать не более 100 символов"),
        Some(n) if !person_name_re().is_match(n) => {
            errors.add("name", "Имя может содержать только буквы, пробелы и дефис")
        }
        Some(_) => {}
    }

    let phone = trimmed(&form.phone);
    match phone {
        None => errors.add("phone", "Введите номер телефона"),
        Some(p) if !is_valid_phone(p) => {
            errors.add("phone", "Введите корректный номер телефона (+7XXXXXXXXXX или 8XXXXXXXXXX)")
        }
        Some(_) => {}
    }

    if let Some(e) = trimmed(&form.email) {
        if char_len(e) > EMAIL_MAX || !email_re().is_match(e) {
            errors.add("email", "Введите корректный email");
        }
    }
    optional_max(&mut errors, "company", &form.company, TITLE_MAX);
    optional_max(&mut errors, "comment", &form.comment, COMMENT_MAX);
    optional_max(&mut errors, "product_name", &form.product_name, TITLE_MAX);
    if !form.consent {
        errors.add("consent", "Необходимо согласие на обработку персональных данных");
    }
    errors.into_result()?;

    let (Some(name), Some(phone)) = (name, phone.and_then(normalize_phone)) else {
        return Err(AppError::validation("Проверьте правильность заполнения полей"));
    };
    Ok(NewContactRequest {
        name: sanitize_input(name),
        phone,
        email: trimmed(&form.email).map(str::to_lowercase),
        company: optional_clean(&form.company),
        message: optional_clean(&form.comment),
        product_id: form.product_id,
        product_name: optional_clean(&form.product_name),
        source,
    })
}

pub fn validate_category(input: &CategoryInput, partial: bool) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    text_field(&mut errors, "name", &input.name, partial, TITLE_MAX);
    slug_field(&mut errors, &input.slug);
    optional_max(&mut errors, "description", &input.description, COMMENT_MAX * 5);
    sort_order_field(&mut errors, input.sort_order);
    errors.into_result()
}

pub fn validate_product(input: &ProductInput, partial: bool) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    text_field(&mut errors, "name", &input.name, partial, TITLE_MAX);
    slug_field(&mut errors, &input.slug);
    optional_max(&mut errors, "short_description", &input.short_description, COMMENT_MAX);
    if !partial && input.category_id.is_none() {
        errors.add("category_id", "Выберите категорию");
    }
    if let Some(spec) = &input.specifications {
        if !matches!(spec, Value::Object(_)) {
            errors.add("specifications", "Характеристики должны быть объектом");
        }
    }
    if let Some(images) = &input.images {
        for url in images {
            url_field(&mut errors, "images", &Some(url.clone()), false);
        }
    }
    sort_order_field(&mut errors, input.sort_order);
    errors.into_result()
}

/// Expiry, when both dates are known, must come after issue.
pub fn check_certificate_dates(issue: Option<NaiveDate>, expiry: Option<NaiveDate>) -> Result<(), AppError> {
    match (issue, expiry) {
        (Some(i), Some(e)) if e <= i => {
            let mut errors = FieldErrors::default();
            errors.add(
                "expiry_date",
                format!("Дата окончания должна быть позже даты выдачи ({})", format_date_long(i)),
            );
            errors.into_result()
        }
        _ => Ok(()),
    }
}

pub fn validate_certificate(input: &CertificateInput, partial: bool) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    text_field(&mut errors, "title", &input.title, partial, TITLE_MAX);
    url_field(&mut errors, "image_url", &input.image_url, partial);
    optional_max(&mut errors, "description", &input.description, COMMENT_MAX * 5);
    sort_order_field(&mut errors, input.sort_order);
    errors.into_result()?;
    check_certificate_dates(input.issue_date, input.expiry_date)
}

pub fn validate_questionnaire(input: &QuestionnaireInput, partial: bool) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    text_field(&mut errors, "title", &input.title, partial, TITLE_MAX);
    text_field(&mut errors, "category", &input.category, partial, NAME_MAX);
    url_field(&mut errors, "file_url", &input.file_url, partial);
    sort_order_field(&mut errors, input.sort_order);
    errors.into_result()
}

pub fn validate_user(input: &UserInput, partial: bool) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    text_field(&mut errors, "email", &input.email, partial, EMAIL_MAX);
    if let Some(e) = trimmed(&input.email) {
        if !email_re().is_match(e) {
            errors.add("email", "Введите корректный email");
        }
    }
    text_field(&mut errors, "name", &input.name, partial, NAME_MAX);
    match trimmed(&input.password) {
        None if !partial => errors.add("password", "Обязательное поле"),
        Some(p) if char_len(p) < PASSWORD_MIN => errors.add("password", "Пароль должен содержать минимум 8 символов"),
        _ => {}
    }
    if !partial && input.role.is_none() {
        errors.add("role", "Выберите роль");
    }
    if let Some(p) = trimmed(&input.phone) {
        if !is_valid_phone(p) {
            errors.add("phone", "Введите корректный номер телефона");
        }
    }
    optional_max(&mut errors, "department", &input.department, TITLE_MAX);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_of(err: AppError) -> BTreeMap<String, String> {
        match err {
            AppError::Validation { fields, .. } => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn form(name: &str, phone: &str) -> ContactForm {
        ContactForm {
            name: Some(name.into()),
            phone: Some(phone.into()),
            consent: true,
            ..Default::default()
        }
    }

    #[test]
    fn valid_order_form_is_normalized() {
        let mut f = form("  Иван Петров ", "8 (999) 123-45-67");
        f.email = Some("Ivan@Example.com".into());
        f.comment = Some("<b>Срочно</b>".into());
        let rec = validate_contact_form(&f, ContactSource::Order).unwrap();
        assert_eq!(rec.name, "Иван Петров");
        assert_eq!(rec.phone, "+79991234567");
        assert_eq!(rec.email.as_deref(), Some("ivan@example.com"));
        assert_eq!(rec.message.as_deref(), Some("&lt;b&gt;Срочно&lt;&#x2F;b&gt;"));
        assert_eq!(rec.source, ContactSource::Order);
    }

    #[test]
    fn collects_every_failing_field() {
        let f = ContactForm {
            name: Some("И".into()),
            phone: Some("12345".into()),
            email: Some("not-an-email".into()),
            comment: Some("x".repeat(COMMENT_MAX + 1)),
            consent: false,
            ..Default::default()
        };
        let fields = fields_of(validate_contact_form(&f, ContactSource::Contact).unwrap_err());
        let keys: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["comment", "consent", "email", "name", "phone"]);
    }

    #[test]
    fn missing_required_fields() {
        let fields = fields_of(validate_contact_form(&ContactForm::default(), ContactSource::Contact).unwrap_err());
        assert_eq!(fields["name"], "Введите имя");
        assert_eq!(fields["phone"], "Введите номер телефона");
        assert!(fields.contains_key("consent"));
    }

    #[test]
    fn name_rejects_digits() {
        let fields = fields_of(validate_contact_form(&form("R2D2", "+79991234567"), ContactSource::Contact).unwrap_err());
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn product_create_requires_name_and_category() {
        let fields = fields_of(validate_product(&ProductInput::default(), false).unwrap_err());
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("categoryId"));
        assert!(validate_product(&ProductInput::default(), true).is_ok());
    }

    #[test]
    fn product_specifications_must_be_object() {
        let input = ProductInput {
            specifications: Some(serde_json::json!(["power", "10kW"])),
            slug: Some("Bad Slug".into()),
            images: Some(vec!["ftp://x".into()]),
            ..Default::default()
        };
        let fields = fields_of(validate_product(&input, true).unwrap_err());
        assert!(fields.contains_key("specifications"));
        assert!(fields.contains_key("slug"));
        assert!(fields.contains_key("images"));
    }

    #[test]
    fn certificate_dates_must_be_ordered() {
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd);
        assert!(check_certificate_dates(d(2024, 1, 1), d(2027, 1, 1)).is_ok());
        assert!(check_certificate_dates(d(2024, 1, 1), None).is_ok());
        let fields = fields_of(check_certificate_dates(d(2024, 3, 15), d(2023, 1, 1)).unwrap_err());
        assert_eq!(fields["expiryDate"], "Дата окончания должна быть позже даты выдачи (15 марта 2024 г.)");
        assert!(check_certificate_dates(d(2024, 1, 1), d(2024, 1, 1)).is_err());
    }

    #[test]
    fn blank_value_counts_as_missing_even_on_update() {
        let input = CategoryInput {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_category(&input, true).is_err());
    }

    #[test]
    fn user_rules() {
        let input = UserInput {
            email: Some("moderator@example.com".into()),
            name: Some("Мария".into()),
            password: Some("short".into()),
            role: Some(Role::Moderator),
            ..Default::default()
        };
        let fields = fields_of(validate_user(&input, false).unwrap_err());
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["password"]);

        let update = UserInput {
            phone: Some("+79991234567".into()),
            ..Default::default()
        };
        assert!(validate_user(&update, true).is_ok());
    }

    #[test]
    fn questionnaire_requires_file_link() {
        let input = QuestionnaireInput {
            title: Some("Опросный лист".into()),
            category: Some("pumps".into()),
            file_url: Some("files/list.pdf".into()),
            ..Default::default()
        };
        let fields = fields_of(validate_questionnaire(&input, false).unwrap_err());
        assert!(fields.contains_key("fileUrl"));
    }
}
