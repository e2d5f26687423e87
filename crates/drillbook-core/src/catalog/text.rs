//! Text normalization shared by the catalog, the keyword matcher and the
//! repetition guard.
//!
//! All functions here are pure and idempotent: feeding their output back in
//! returns it unchanged.

use std::collections::BTreeSet;

/// Spelling variants collapsed to one canonical phrase. Longer phrases come
/// first so that `game organisation` wins over `organisation`.
const SYNONYMS: &[(&str, &str)] = &[
    ("game organisation", "game organization"),
    ("game-organisation", "game organization"),
    ("game-organization", "game organization"),
    ("spielorganisation", "game organization"),
    ("spielaufbau", "build-up"),
    ("aufwärmen", "warm-up"),
    ("aufwaermen", "warm-up"),
    ("warm up", "warm-up"),
    ("warmup", "warm-up"),
    ("build up", "build-up"),
    ("buildup", "build-up"),
    ("counter press", "counter-press"),
    ("counterpress", "counter-press"),
    ("half field", "half-field"),
    ("halffield", "half-field"),
    ("half pitch", "half-field"),
    ("small sided", "small-sided"),
    ("full-pitch", "full pitch"),
    ("fullpitch", "full pitch"),
    ("organisation", "organization"),
    ("organised", "organized"),
];

/// Lower-cases, unifies dashes and whitespace, writes player formats as
/// `NvsM` and applies the synonym table.
///
/// ```rust
/// use drillbook_core::catalog::text::canonical_phrase;
///
/// assert_eq!(canonical_phrase("Game  Organisation, 7 v 7"), "game organization, 7vs7");
/// assert_eq!(canonical_phrase("Warm up – 2 on 2"), "warm-up - 2vs2");
/// ```
pub fn canonical_phrase(input: &str) -> String {
    let lowered = input
        .to_lowercase()
        .replace(['\u{2013}', '\u{2014}', '\u{2212}'], "-");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut phrase = normalize_formats(&collapsed);
    for (variant, canonical) in SYNONYMS {
        if phrase.contains(variant) {
            phrase = phrase.replace(variant, canonical);
        }
    }
    phrase
}

/// Rewrites `7 vs 7`, `7v7`, `7 vs. 7` and `2 on 2` as `7vs7` / `2vs2`.
fn normalize_formats(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let starts_number =
            chars[i].is_ascii_digit() && (i == 0 || !chars[i - 1].is_alphanumeric());
        if starts_number {
            if let Some((left, right, end)) = match_format(&chars, i) {
                out.push_str(&left);
                out.push_str("vs");
                out.push_str(&right);
                i = end;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Tries to read `<digits> <sep> <digits>` at `start`; returns both numbers
/// and the index after the match.
fn match_format(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let mut i = start;
    let left = read_digits(chars, &mut i);
    skip_spaces(chars, &mut i);

    let rest: String = chars[i..].iter().take(3).collect();
    let sep_len = if rest.starts_with("vs") || rest.starts_with("on ") {
        2
    } else if rest.starts_with('v') {
        1
    } else {
        return None;
    };
    i += sep_len;
    if chars.get(i) == Some(&'.') {
        i += 1;
    }
    skip_spaces(chars, &mut i);

    let right = read_digits(chars, &mut i);
    if right.is_empty() || chars.get(i).is_some_and(|c| c.is_alphanumeric()) {
        return None;
    }
    Some((left, right, i))
}

fn read_digits(chars: &[char], i: &mut usize) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.get(*i).filter(|c| c.is_ascii_digit()) {
        digits.push(*c);
        *i += 1;
    }
    digits
}

fn skip_spaces(chars: &[char], i: &mut usize) {
    while chars.get(*i).is_some_and(|c| *c == ' ') {
        *i += 1;
    }
}

/// First player format (`NvsM`) mentioned in already canonical text.
pub fn detect_format(canonical: &str) -> Option<String> {
    canonical
        .split(|c: char| !c.is_alphanumeric())
        .find(|word| is_format_token(word))
        .map(String::from)
}

fn is_format_token(word: &str) -> bool {
    match word.split_once("vs") {
        Some((left, right)) => {
            !left.is_empty()
                && !right.is_empty()
                && left.chars().all(|c| c.is_ascii_digit())
                && right.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Strips trailing parenthetical variant markers such as `(2)`, `(#3)` or
/// `(variant 2)`, repeatedly.
pub fn strip_variant_suffix(title: &str) -> &str {
    let mut current = title.trim_end();
    loop {
        let Some(inner_end) = current.strip_suffix(')') else {
            return current;
        };
        let Some(open) = inner_end.rfind('(') else {
            return current;
        };
        if !is_variant_marker(&inner_end[open + 1..]) {
            return current;
        }
        current = inner_end[..open].trim_end();
    }
}

fn is_variant_marker(inner: &str) -> bool {
    let lowered = inner.trim().to_lowercase();
    let mut rest = lowered.as_str();
    for prefix in ["variation", "variant", "version", "var.", "var", "nr.", "no.", "v"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.trim_start_matches(['#', '.', ' ']);
    if rest.is_empty() {
        return false;
    }
    rest.chars().all(|c| c.is_ascii_digit())
        || (rest.len() == 1 && rest.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Builds an identity key from a title and a format string.
pub fn identity_key(title: &str, format: &str) -> String {
    let title = canonical_phrase(&title.replace('|', "/"));
    let title = strip_variant_suffix(&title).trim();
    let format = canonical_phrase(&format.replace('|', "/"));
    format!("{title}|{format}")
}

/// Re-canonicalizes an existing identity key. Idempotent.
pub fn canonicalize_key(key: &str) -> String {
    match key.rsplit_once('|') {
        Some((title, format)) => identity_key(title, format),
        None => identity_key(key, ""),
    }
}

/// Extracts canonical age tokens (`u7`..`u23`, `men`, `women`, `adult`)
/// from free text, expanding ranges such as `U12-U15`.
pub fn age_tokens(text: &str) -> BTreeSet<String> {
    let canonical = canonical_phrase(text).replace("women's", "women");
    let mut tokens = BTreeSet::new();

    let brackets = scan_brackets(&canonical);
    let mut idx = 0;
    while idx < brackets.len() {
        let (low, _, low_end) = brackets[idx];
        let ranged = brackets.get(idx + 1).and_then(|&(high, high_start, _)| {
            let between = canonical[low_end..high_start].trim();
            (matches!(between, "-" | "to" | "/") && high >= low).then_some(high)
        });
        match ranged {
            Some(high) => {
                for age in low..=high.min(23) {
                    tokens.insert(format!("u{age}"));
                }
                idx += 2;
            }
            None => {
                tokens.insert(format!("u{low}"));
                idx += 1;
            }
        }
    }

    for word in canonical.split(|c: char| !c.is_alphanumeric()) {
        match word {
            "men" | "women" | "adult" => {
                tokens.insert(word.to_string());
            }
            "adults" | "senior" | "seniors" => {
                tokens.insert("adult".to_string());
            }
            _ => {}
        }
    }

    tokens
}

/// Finds every `u<number>` bracket as `(number, start, end)` byte offsets.
fn scan_brackets(text: &str) -> Vec<(u32, usize, usize)> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        if bytes[i] == b'u' && boundary {
            let digits_start = i + 1;
            let mut j = digits_start;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            let terminated = j == bytes.len() || !bytes[j].is_ascii_alphanumeric();
            if j > digits_start && terminated {
                if let Ok(age) = text[digits_start..j].parse::<u32>() {
                    found.push((age, i, j));
                }
                i = j;
                continue;
            }
        }
        i += 1;
    }
    found
}
