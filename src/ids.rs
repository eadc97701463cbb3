use std::sync::LazyLock;

use regex::Regex;

static HEADING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([IVXLCDM]+)(b?)\.").unwrap());

const POEM_COUNT: u32 = 116;

/// Doublets that exist as separate poems alongside their base number.
pub const VARIANT_IDS: &[&str] = &["2b", "14b", "58b", "68b", "78b"];

/// Decode a roman numeral. Unknown characters count as zero.
pub fn roman_to_int(roman: &str) -> u32 {
    let mut total: i64 = 0;
    let mut prev = 0;
    for ch in roman.chars().rev() {
        let val = match ch.to_ascii_uppercase() {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => 0,
        };
        if val < prev {
            total -= val;
        } else {
            total += val;
        }
        prev = val;
    }
    total.max(0) as u32
}

/// Turn a Latin heading like "XIV." or "IIb." into a poem id ("14", "2b").
/// Headings without a leading numeral are returned unchanged.
pub fn extract_id(title: &str) -> String {
    match HEADING_ID_RE.captures(title) {
        Some(caps) => {
            let number = roman_to_int(&caps[1]);
            if caps[2].is_empty() {
                number.to_string()
            } else {
                format!("{}b", number)
            }
        }
        None => title.to_string(),
    }
}

/// All poem ids in reading order: 1..=116 with each "b" variant right after its base.
pub fn poem_ids() -> Vec<String> {
    let mut ids = Vec::with_capacity(POEM_COUNT as usize + VARIANT_IDS.len());
    for n in 1..=POEM_COUNT {
        let base = n.to_string();
        let variant = format!("{}b", base);
        ids.push(base);
        if VARIANT_IDS.contains(&variant.as_str()) {
            ids.push(variant);
        }
    }
    ids
}
