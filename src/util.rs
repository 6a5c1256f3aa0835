//! Formatting and string helpers shared by handlers and validation.
//!
//! Display formatters follow the site's Russian conventions. Validation messages and
//! request logs use the date and text ones; `format_currency` is exported for library
//! callers rendering prices.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::OnceLock;

const MONTHS_GENITIVE: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

/// Whole-ruble amount with space thousands separators, e.g. `1 000 ₽`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{} ₽", grouped)
    } else {
        format!("{} ₽", grouped)
    }
}

/// `dd.mm.yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// `15 марта 2024 г.`
pub fn format_date_long(date: NaiveDate) -> String {
    format!(
        "{} {} {} г.",
        date.day(),
        MONTHS_GENITIVE[date.month0() as usize],
        date.year()
    )
}

/// `dd.mm.yyyy HH:MM` (UTC).
pub fn format_date_time(dt: DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\+7|8)\d{10}$").expect("static phone pattern"))
}

fn strip_phone_punctuation(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// Russian numbers: `+7XXXXXXXXXX` or `8XXXXXXXXXX`. Spaces, dashes and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_re().is_match(&strip_phone_punctuation(phone))
}

/// Canonical `+7XXXXXXXXXX` form of a valid phone.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let stripped = strip_phone_punctuation(phone);
    if !phone_re().is_match(&stripped) {
        return None;
    }
    let national = stripped.strip_prefix("+7").or_else(|| stripped.strip_prefix('8'))?;
    Some(format!("+7{}", national))
}

/// Trim and HTML-escape `< > " ' /`. `&` is left alone so reapplying is a no-op.
pub fn sanitize_input(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

/// Partition items by key; groups are ordered by first appearance and keep input order.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

/// Cut to `max_chars` characters, appending `…` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

fn transliterate(c: char) -> Option<&'static str> {
    Some(match c {
        'а' => "a", 'б' => "b", 'в' => "v", 'г' => "g", 'д' => "d", 'е' => "e", 'ё' => "e",
        'ж' => "zh", 'з' => "z", 'и' => "i", 'й' => "y", 'к' => "k", 'л' => "l", 'м' => "m",
        'н' => "n", 'о' => "o", 'п' => "p", 'р' => "r", 'с' => "s", 'т' => "t", 'у' => "u",
        'ф' => "f", 'х' => "h", 'ц' => "ts", 'ч' => "ch", 'ш' => "sh", 'щ' => "sch", 'ъ' => "",
        'ы' => "y", 'ь' => "", 'э' => "e", 'ю' => "yu", 'я' => "ya",
        _ => return None,
    })
}

/// URL slug: lowercase, Cyrillic transliterated, runs of other characters collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        let piece: Option<String> = if c.is_ascii_alphanumeric() {
            Some(c.to_string())
        } else {
            transliterate(c).map(str::to_string)
        };
        match piece {
            Some(p) if p.is_empty() => {}
            Some(p) => {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push_str(&p);
            }
            None => pending_dash = true,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(1000.0), "1 000 ₽");
        assert_eq!(format_currency(0.0), "0 ₽");
        assert_eq!(format_currency(999.0), "999 ₽");
        assert_eq!(format_currency(1234567.4), "1 234 567 ₽");
        assert_eq!(format_currency(-25000.0), "-25 000 ₽");
        assert_eq!(format_currency(99.5), "100 ₽");
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(d), "05.03.2024");
        assert_eq!(format_date_long(d), "5 марта 2024 г.");
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 18, 7, 0).unwrap();
        assert_eq!(format_date_time(dt), "31.12.2024 18:07");
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("+79991234567"));
        assert!(is_valid_phone("89991234567"));
        assert!(is_valid_phone("+7 (999) 123-45-67"));
        assert!(!is_valid_phone("79991234567"));
        assert!(!is_valid_phone("+7999123456"));
        assert!(!is_valid_phone("+799912345678"));
        assert!(!is_valid_phone("+19991234567"));
        assert!(!is_valid_phone("8999abc4567"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("8 (999) 123-45-67").as_deref(), Some("+79991234567"));
        assert_eq!(normalize_phone("+79991234567").as_deref(), Some("+79991234567"));
        assert_eq!(normalize_phone("12345"), None);
    }

    #[test]
    fn sanitize_escapes_markup() {
        assert_eq!(
            sanitize_input(" <script>alert('x')</script> "),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(sanitize_input("a \"b\""), "a &quot;b&quot;");
        assert_eq!(sanitize_input("Tom & Jerry"), "Tom & Jerry");
    }

    #[test]
    fn sanitize_does_not_double_escape() {
        for input in ["<b>bold</b>", "it's \"quoted\" / slashed", "plain"] {
            let once = sanitize_input(input);
            assert_eq!(sanitize_input(&once), once);
        }
    }

    #[test]
    fn group_by_partitions_every_item_once() {
        let items = vec![("pumps", 1), ("valves", 2), ("pumps", 3), ("tanks", 4), ("valves", 5)];
        let groups = group_by(items.clone(), |(k, _)| *k);
        let keys: Vec<_> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["pumps", "valves", "tanks"]);
        let total: usize = groups.iter().map(|(_, v)| v.len()).sum();
        assert_eq!(total, items.len());
        for (k, members) in &groups {
            assert!(members.iter().all(|(mk, _)| mk == k));
        }
        assert_eq!(groups[0].1, vec![("pumps", 1), ("pumps", 3)]);
    }

    #[test]
    fn group_by_empty() {
        let groups = group_by(Vec::<u8>::new(), |x| *x);
        assert!(groups.is_empty());
    }

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate_text("Насос", 10), "Насос");
        assert_eq!(truncate_text("Центробежный насос", 11), "Центробежны…");
        assert_eq!(truncate_text("ab cd", 3), "ab…");
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("Насосное оборудование"), "nasosnoe-oborudovanie");
        assert_eq!(slugify("  Pump X-200 / Pro  "), "pump-x-200-pro");
        assert_eq!(slugify("Щит №5"), "schit-5");
        assert_eq!(slugify("Объём"), "obem");
        assert_eq!(slugify("!!!"), "");
    }
}
