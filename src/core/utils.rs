use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
};
use unicode_normalization::{
    char::is_combining_mark,
    UnicodeNormalization,
};

pub trait FoldForSearch {
    fn fold_for_search(&self) -> String;
}

// "Horta São João" -> "horta sao joao", composed or decomposed
impl FoldForSearch for str {
    fn fold_for_search(&self) -> String {
        self.nfkd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
    }
}

impl FoldForSearch for String {
    fn fold_for_search(&self) -> String {
        self.as_str().fold_for_search()
    }
}

/// Parses the date shapes the API and its forms produce: RFC 3339, ISO
/// date-time without offset, ISO date and `dd/mm/yyyy`.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
