//! Pure numeral formatters for the special input modes (`MACRO@CHINESE_*`
//! and Suzhou/Roman numeral candidates): digit strings in, formatted
//! Chinese/Suzhou/Roman numeral strings out. No state, no I/O.

/// Case used by [`chinese_numbers::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChineseNumberCase {
    Lowercase,
    Uppercase,
}

/// Style used by [`roman_numbers::convert_from_int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomanNumbersStyle {
    Alphabets,
    FullWidthUpper,
    FullWidthLower,
}

fn trim_zeros_at_start(input: &str) -> &str {
    input.trim_start_matches('0')
}

fn trim_zeros_at_end(input: &str) -> &str {
    input.trim_end_matches('0')
}

fn left_pad(input: &str, to_length: usize, pad: char) -> String {
    if input.len() >= to_length {
        return input.to_string();
    }
    let mut padded = String::with_capacity(to_length);
    for _ in 0..(to_length - input.len()) {
        padded.push(pad);
    }
    padded.push_str(input);
    padded
}

/// Formats decimal digit strings as traditional Chinese numerals.
pub mod chinese_numbers {
    use super::{left_pad, trim_zeros_at_end, trim_zeros_at_start, ChineseNumberCase};

    const LOWER_DIGITS: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
    const UPPER_DIGITS: [&str; 10] = ["零", "壹", "貳", "參", "肆", "伍", "陸", "柒", "捌", "玖"];
    const LOWER_PLACES: [&str; 4] = ["千", "百", "十", ""];
    const UPPER_PLACES: [&str; 4] = ["仟", "佰", "拾", ""];
    const HIGHER_PLACES: [&str; 12] = [
        "", "萬", "億", "兆", "京", "垓", "秭", "穰", "溝", "澗", "正", "載",
    ];

    fn digits(case: ChineseNumberCase) -> &'static [&'static str; 10] {
        match case {
            ChineseNumberCase::Lowercase => &LOWER_DIGITS,
            ChineseNumberCase::Uppercase => &UPPER_DIGITS,
        }
    }

    fn places(case: ChineseNumberCase) -> &'static [&'static str; 4] {
        match case {
            ChineseNumberCase::Lowercase => &LOWER_PLACES,
            ChineseNumberCase::Uppercase => &UPPER_PLACES,
        }
    }

    /// Converts one already-left-padded 4-digit group, inserting a single
    /// leading zero digit if a zero was skipped earlier in the same group
    /// (or carried over from an all-zero group before it).
    fn convert_4_digits(group: &str, case: ChineseNumberCase, zero_ever_happened: bool) -> String {
        let mut zero_happened = zero_ever_happened;
        let mut out = String::new();
        for (i, c) in group.chars().enumerate() {
            if c == ' ' {
                continue;
            }
            if c == '0' {
                zero_happened = true;
                continue;
            }
            if zero_happened {
                out.push_str(digits(case)[0]);
            }
            zero_happened = false;
            let digit = c.to_digit(10).expect("group contains only digits and spaces") as usize;
            out.push_str(digits(case)[digit]);
            out.push_str(places(case)[i]);
        }
        out
    }

    /// Renders `int_part` (e.g. `"1234"`) and `dec_part` (e.g. `"05"`) as one
    /// Chinese numeral string, e.g. `"一千二百三十四點〇五"`.
    pub fn generate(int_part: &str, dec_part: &str, case: ChineseNumberCase) -> String {
        let int_trimmed = trim_zeros_at_start(int_part);
        let dec_trimmed = trim_zeros_at_end(dec_part);

        let mut out = String::new();
        if int_trimmed.is_empty() {
            out.push_str(digits(case)[0]);
        } else {
            let section_count = int_trimmed.len().div_ceil(4);
            let filled_length = section_count * 4;
            let filled = left_pad(int_trimmed, filled_length, ' ');
            let mut read_head = 0;
            let mut zero_ever_happened = false;
            while read_head < filled_length {
                let group = &filled[read_head..read_head + 4];
                if group == "0000" {
                    zero_ever_happened = true;
                    read_head += 4;
                    continue;
                }
                out.push_str(&convert_4_digits(group, case, zero_ever_happened));
                zero_ever_happened = false;
                let place = (filled_length - read_head) / 4 - 1;
                out.push_str(HIGHER_PLACES[place]);
                read_head += 4;
            }
        }

        if !dec_trimmed.is_empty() {
            out.push('點');
            for c in dec_trimmed.chars() {
                let digit = c.to_digit(10).expect("decimal part contains only digits") as usize;
                out.push_str(digits(case)[digit]);
            }
        }
        out
    }
}

/// Formats decimal digit strings as Suzhou ("huāmǎ") numerals.
pub mod suzhou_numbers {
    use super::{trim_zeros_at_end, trim_zeros_at_start};

    const VERTICAL_DIGITS: [&str; 10] = ["〇", "〡", "〢", "〣", "〤", "〥", "〦", "〧", "〨", "〩"];
    const HORIZONTAL_DIGITS: [&str; 4] = ["〇", "一", "二", "三"];
    const PLACE_NAMES: [&str; 32] = [
        "", "十", "百", "千", "万", "十万", "百万", "千万", "億", "十億", "百億", "千億", "兆",
        "十兆", "百兆", "千兆", "京", "十京", "百京", "千京", "垓", "十垓", "百垓", "千垓", "秭",
        "十秭", "百秭", "千秭", "穰", "十穰", "百穰", "千穰",
    ];

    /// Renders `int_part`/`dec_part` as a Suzhou numeral followed by `unit`
    /// (e.g. a currency or measure word), alternating vertical/horizontal
    /// glyphs for runs of 1/2/3 so adjacent digits stay visually distinct.
    pub fn generate(int_part: &str, dec_part: &str, unit: &str, prefer_initial_vertical: bool) -> String {
        let mut int_trimmed = trim_zeros_at_start(int_part).to_string();
        let dec_trimmed = trim_zeros_at_end(dec_part).to_string();
        let mut trimmed_zero_counts = 0usize;

        if dec_trimmed.is_empty() {
            let trimmed = trim_zeros_at_end(&int_trimmed).to_string();
            trimmed_zero_counts = int_trimmed.len() - trimmed.len();
            int_trimmed = trimmed;
        }
        if int_trimmed.is_empty() {
            int_trimmed = "0".to_string();
        }

        let joined = format!("{int_trimmed}{dec_trimmed}");
        let mut out = String::new();
        let mut is_vertical = prefer_initial_vertical;
        for c in joined.chars() {
            if c == '1' || c == '2' || c == '3' {
                let digit = c.to_digit(10).unwrap() as usize;
                out.push_str(if is_vertical {
                    VERTICAL_DIGITS[digit]
                } else {
                    HORIZONTAL_DIGITS[digit]
                });
                is_vertical = !is_vertical;
            } else {
                let digit = c.to_digit(10).unwrap() as usize;
                out.push_str(VERTICAL_DIGITS[digit]);
                is_vertical = prefer_initial_vertical;
            }
        }

        let joined_length = joined.len();
        if joined_length == 1 && trimmed_zero_counts == 0 {
            out.push_str(unit);
            return out;
        }
        if joined_length == 1 && trimmed_zero_counts == 1 {
            return match int_trimmed.as_str() {
                "1" => format!("〸{unit}"),
                "2" => format!("〹{unit}"),
                "3" => format!("〺{unit}"),
                _ => out,
            };
        }

        let place = int_trimmed.len() + trimmed_zero_counts - 1;
        if joined.len() > 1 {
            out.push('\n');
        }
        out.push_str(PLACE_NAMES[place]);
        out.push_str(unit);
        out
    }
}

/// Converts integers in `1..=3999` to Roman numerals, in three Unicode styles.
pub mod roman_numbers {
    use super::RomanNumbersStyle;

    struct DigitsMap {
        digits: [&'static str; 10],
        tens: [&'static str; 10],
        hundreds: [&'static str; 10],
        thousands: [&'static str; 4],
    }

    const ALPHABETS: DigitsMap = DigitsMap {
        digits: ["", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX"],
        tens: ["", "X", "XX", "XXX", "XL", "L", "LX", "LXX", "LXXX", "XC"],
        hundreds: ["", "C", "CC", "CCC", "CD", "D", "DC", "DCC", "DCCC", "CM"],
        thousands: ["", "M", "MM", "MMM"],
    };

    const FULL_WIDTH_UPPER: DigitsMap = DigitsMap {
        digits: ["", "Ⅰ", "Ⅱ", "Ⅲ", "Ⅳ", "Ⅴ", "Ⅵ", "Ⅶ", "Ⅷ", "Ⅸ"],
        tens: ["", "Ⅹ", "ⅩⅩ", "ⅩⅩⅩ", "ⅩⅬ", "Ⅼ", "ⅬⅩ", "ⅬⅩⅩ", "ⅬⅩⅩⅩ", "ⅩⅭ"],
        hundreds: ["", "Ⅽ", "ⅭⅭ", "ⅭⅭⅭ", "ⅭⅮ", "Ⅾ", "ⅮⅭ", "ⅮⅭⅭ", "ⅮⅭⅭⅭ", "ⅭⅯ"],
        thousands: ["", "Ⅿ", "ⅯⅯ", "ⅯⅯⅯ"],
    };

    const FULL_WIDTH_LOWER: DigitsMap = DigitsMap {
        digits: ["", "ⅰ", "ⅱ", "ⅲ", "ⅳ", "ⅴ", "ⅵ", "ⅶ", "ⅷ", "ⅸ"],
        tens: ["", "ⅹ", "ⅹⅹ", "ⅹⅹⅹ", "ⅹⅼ", "ⅼ", "ⅼⅹ", "ⅼⅹⅹ", "ⅼⅹⅹⅹ", "ⅹⅽ"],
        hundreds: ["", "ⅽ", "ⅽⅽ", "ⅽⅽⅽ", "ⅽⅾ", "ⅾ", "ⅾⅽ", "ⅾⅽⅽ", "ⅾⅽⅽⅽ", "ⅽⅿ"],
        thousands: ["", "ⅿ", "ⅿⅿ", "ⅿⅿⅿ"],
    };

    fn map_for(style: RomanNumbersStyle) -> &'static DigitsMap {
        match style {
            RomanNumbersStyle::Alphabets => &ALPHABETS,
            RomanNumbersStyle::FullWidthUpper => &FULL_WIDTH_UPPER,
            RomanNumbersStyle::FullWidthLower => &FULL_WIDTH_LOWER,
        }
    }

    /// Converts `number` (1..=3999) to a Roman numeral in the given style.
    pub fn convert_from_int(number: i32, style: RomanNumbersStyle) -> Option<String> {
        if number <= 0 || number > 3999 {
            return None;
        }

        // Unicode provides single-codepoint glyphs for 11/12 in the two
        // full-width styles only; every other value is composed digit-by-digit.
        match (style, number) {
            (RomanNumbersStyle::FullWidthUpper, 11) => return Some("Ⅺ".to_string()),
            (RomanNumbersStyle::FullWidthUpper, 12) => return Some("Ⅻ".to_string()),
            (RomanNumbersStyle::FullWidthLower, 11) => return Some("ⅺ".to_string()),
            (RomanNumbersStyle::FullWidthLower, 12) => return Some("ⅻ".to_string()),
            _ => {}
        }

        let map = map_for(style);
        let thousands = (number / 1000) as usize;
        let hundreds = ((number % 1000) / 100) as usize;
        let tens = ((number % 100) / 10) as usize;
        let digit = (number % 10) as usize;

        let mut result = String::with_capacity(16);
        result.push_str(map.thousands[thousands]);
        result.push_str(map.hundreds[hundreds]);
        result.push_str(map.tens[tens]);
        result.push_str(map.digits[digit]);
        Some(result)
    }

    /// Parses `s` as a plain decimal integer and converts it, rejecting
    /// anything non-numeric or out of range.
    pub fn convert_from_str(s: &str, style: RomanNumbersStyle) -> Option<String> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: i32 = s.parse().ok()?;
        convert_from_int(value, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_lowercase_basic() {
        let s = chinese_numbers::generate("1234", "", ChineseNumberCase::Lowercase);
        assert_eq!(s, "一千二百三十四");
    }

    #[test]
    fn chinese_handles_internal_zero_group() {
        let s = chinese_numbers::generate("1002", "", ChineseNumberCase::Lowercase);
        assert_eq!(s, "一千〇二");
    }

    #[test]
    fn chinese_with_decimal_part() {
        let s = chinese_numbers::generate("3", "05", ChineseNumberCase::Lowercase);
        assert_eq!(s, "三點〇五");
    }

    #[test]
    fn chinese_uppercase_digits() {
        let s = chinese_numbers::generate("1234", "", ChineseNumberCase::Uppercase);
        assert_eq!(s, "壹仟貳佰參拾肆");
    }

    #[test]
    fn chinese_empty_int_part_is_zero() {
        let s = chinese_numbers::generate("0", "", ChineseNumberCase::Lowercase);
        assert_eq!(s, "〇");
    }

    #[test]
    fn suzhou_single_digit_no_trailing_zero() {
        let s = suzhou_numbers::generate("5", "", "元", true);
        assert_eq!(s, "〥元");
    }

    #[test]
    fn suzhou_ten_uses_special_glyph() {
        let s = suzhou_numbers::generate("10", "", "元", true);
        assert_eq!(s, "〸元");
    }

    #[test]
    fn suzhou_multi_digit_has_place_name() {
        let s = suzhou_numbers::generate("25", "", "元", true);
        assert!(s.ends_with("十元") || s.contains("十"));
    }

    #[test]
    fn roman_basic_value() {
        assert_eq!(
            roman_numbers::convert_from_int(1994, RomanNumbersStyle::Alphabets).as_deref(),
            Some("MCMXCIV")
        );
    }

    #[test]
    fn roman_out_of_range_is_none() {
        assert_eq!(roman_numbers::convert_from_int(0, RomanNumbersStyle::Alphabets), None);
        assert_eq!(roman_numbers::convert_from_int(4000, RomanNumbersStyle::Alphabets), None);
    }

    #[test]
    fn roman_single_char_eleven_and_twelve() {
        assert_eq!(
            roman_numbers::convert_from_int(11, RomanNumbersStyle::FullWidthUpper).as_deref(),
            Some("Ⅺ")
        );
        assert_eq!(
            roman_numbers::convert_from_int(12, RomanNumbersStyle::FullWidthLower).as_deref(),
            Some("ⅻ")
        );
        // Alphabets style has no single-char codepoints for 11/12.
        assert_eq!(
            roman_numbers::convert_from_int(11, RomanNumbersStyle::Alphabets).as_deref(),
            Some("XI")
        );
    }

    #[test]
    fn roman_from_string_rejects_non_numeric() {
        assert_eq!(roman_numbers::convert_from_str("12a", RomanNumbersStyle::Alphabets), None);
        assert_eq!(
            roman_numbers::convert_from_str("42", RomanNumbersStyle::Alphabets).as_deref(),
            Some("XLII")
        );
    }
}
