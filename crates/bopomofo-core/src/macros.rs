//! Input macros: `MACRO@…` strings expanded to today's date before a
//! reading is looked up in the language model. Unrecognized `MACRO@…`
//! strings and ordinary (non-macro) strings pass through unchanged.

use time::OffsetDateTime;

use crate::numeric::{chinese_numbers, ChineseNumberCase};

const PREFIX: &str = "MACRO@";

/// Expands `input` if it names a recognized macro, otherwise returns it
/// unchanged. `today` supplies the date to render (injected so callers
/// can test deterministically instead of reading the system clock).
pub fn expand(input: &str, today: OffsetDateTime) -> String {
    match input {
        "MACRO@DATE_TODAY_SHORT" => date_today_short(today),
        "MACRO@DATE_TODAY_MEDIUM" => date_today_medium(today),
        "MACRO@DATE_TODAY_MEDIUM_ROC" => date_today_medium_roc(today),
        "MACRO@DATE_TODAY_MEDIUM_CHINESE" => date_today_medium_chinese(today),
        _ => input.to_string(),
    }
}

/// Whether `input` looks like a macro reference at all (recognized or not).
pub fn is_macro(input: &str) -> bool {
    input.starts_with(PREFIX)
}

fn date_today_short(today: OffsetDateTime) -> String {
    format!("{}/{}/{}", today.year(), today.month() as u8, today.day())
}

fn date_today_medium(today: OffsetDateTime) -> String {
    format!("{}年{}月{}日", today.year(), today.month() as u8, today.day())
}

fn date_today_medium_roc(today: OffsetDateTime) -> String {
    let roc_year = today.year() - 1911;
    format!("民國{}年{}月{}日", roc_year, today.month() as u8, today.day())
}

fn date_today_medium_chinese(today: OffsetDateTime) -> String {
    let year_digits: String = today
        .year()
        .to_string()
        .chars()
        .map(|c| {
            let digit = c.to_digit(10).expect("year is all ASCII digits") as usize;
            chinese_digit(digit)
        })
        .collect();
    let month = chinese_numbers::generate(&(today.month() as u8).to_string(), "", ChineseNumberCase::Lowercase);
    let day = chinese_numbers::generate(&today.day().to_string(), "", ChineseNumberCase::Lowercase);
    format!("{year_digits}年{month}月{day}日")
}

fn chinese_digit(digit: usize) -> &'static str {
    const DIGITS: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
    DIGITS[digit]
}
