//! Natural-language date recognition backed by fuzzydate.

use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone};
use regex::Regex;
use tdx_core::{DateMatch, DatePhraseParser};

/// Longest phrase, in words, tried against the date parser.
const MAX_PHRASE_WORDS: usize = 5;

/// A time of day: `noon`, `midnight`, `6pm`, `6 pm`, `15:00`, `at 9`.
static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(noon|midnight)\b|\d\s?[ap]m\b|\d:\d|\bat\s+\d").unwrap()
});

/// Finds the longest, leftmost run of words that fuzzydate accepts.
pub struct FuzzyDates;

impl DatePhraseParser for FuzzyDates {
    // fuzzydate resolves relative phrases against the wall clock, not `now`
    fn find(&self, text: &str, _now: DateTime<Local>) -> Option<DateMatch> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let spelled: Vec<String> = words.iter().map(|w| spell_out(w)).collect();

        for len in (1..=words.len().min(MAX_PHRASE_WORDS)).rev() {
            for start in 0..=words.len() - len {
                let phrase = words[start..start + len].join(" ");
                if !phrase.chars().any(char::is_alphabetic) {
                    continue;
                }

                let Ok(naive) = fuzzydate::parse(&spelled[start..start + len].join(" ")) else {
                    continue;
                };
                if let Some(at) = Local.from_local_datetime(&naive).earliest() {
                    return Some(DateMatch {
                        at,
                        has_time: TIME_OF_DAY.is_match(&phrase),
                        matched: phrase,
                    });
                }
            }
        }

        None
    }
}

/// Lowercase a word and spell out the day, month and "tomorrow"
/// abbreviations fuzzydate does not know.
fn spell_out(word: &str) -> String {
    let lower = word.to_lowercase();
    let full = match lower.as_str() {
        "mon" => "monday",
        "tue" | "tues" => "tuesday",
        "wed" => "wednesday",
        "thu" | "thur" | "thurs" => "thursday",
        "fri" => "friday",
        "sat" => "saturday",
        "sun" => "sunday",
        "tmr" | "tmrw" => "tomorrow",
        "jan" => "january",
        "feb" => "february",
        "mar" => "march",
        "apr" => "april",
        "jun" => "june",
        "jul" => "july",
        "aug" => "august",
        "sep" | "sept" => "september",
        "oct" => "october",
        "nov" => "november",
        "dec" => "december",
        _ => return lower,
    };
    full.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_forms() {
        for phrase in ["tomorrow 6pm", "sat 3 pm", "9AM", "tomorrow 15:00", "friday midnight", "at 9"] {
            assert!(TIME_OF_DAY.is_match(phrase), "{phrase}");
        }
        for phrase in ["tomorrow", "next friday", "december", "amsterdam"] {
            assert!(!TIME_OF_DAY.is_match(phrase), "{phrase}");
        }
    }

    #[test]
    fn spells_out_abbreviations() {
        assert_eq!(spell_out("Sat"), "saturday");
        assert_eq!(spell_out("sept"), "september");
        assert_eq!(spell_out("Milk"), "milk");
    }

    #[test]
    fn finds_tomorrow_inside_summary() {
        let found = FuzzyDates
            .find("buy milk tomorrow", Local::now())
            .expect("tomorrow is a date");

        assert_eq!(found.matched, "tomorrow");
        assert!(!found.has_time);
        assert_eq!(
            found.at.date_naive(),
            Local::now().date_naive().succ_opt().unwrap()
        );
    }

    #[test]
    fn matched_phrase_keeps_original_spelling() {
        let found = FuzzyDates
            .find("call bank Tmrw", Local::now())
            .expect("tmrw is a date");
        assert_eq!(found.matched, "Tmrw");
    }

    #[test]
    fn plain_text_has_no_date() {
        assert!(FuzzyDates.find("buy milk", Local::now()).is_none());
    }
}
