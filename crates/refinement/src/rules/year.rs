//! Release-year bounds.
//!
//! | Phrase                               | year_min | year_max |
//! |--------------------------------------|----------|----------|
//! | after 1990 / since 1990 / from 1990  | 1990     |          |
//! | before 1990 / until 1990             |          | 1990     |
//! | 1990s                                | 1990     | 1999     |
//! | '90s / 90s                           | 1990     | 1999     |
//! | 00s / '20s                           | 2000     | 2009     |
//! | between 1990 and 2000 / from A to B  | min      | max      |
//! | in 1999                              | 1999     | 1999     |

use super::{Extraction, ExtractionRule};
use crate::constraint::Constraint;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Two-digit decades at or below this are read as 20xx
const SHORT_DECADE_PIVOT: u16 = 20;

#[derive(Debug, Clone, Copy)]
enum YearForm {
    Range,
    After,
    Before,
    In,
    Decade,
    ShortDecade,
}

static YEAR_PATTERNS: LazyLock<Vec<(YearForm, Regex)>> = LazyLock::new(|| {
    vec![
        (
            YearForm::Range,
            Regex::new(r"(?i)\b(?:between|from)\s+(\d{4})\s*(?:and|to|-)\s*(\d{4})\b").unwrap(),
        ),
        (YearForm::After, Regex::new(r"(?i)\b(?:after|since|from)\s+(\d{4})\b").unwrap()),
        (
            YearForm::Before,
            Regex::new(r"(?i)\b(?:before|until|earlier\s+than|prior\s+to)\s+(\d{4})\b").unwrap(),
        ),
        (YearForm::In, Regex::new(r"(?i)\bin\s+(\d{4})\b").unwrap()),
        (YearForm::Decade, Regex::new(r"(?i)\b(\d{3}0)'?s\b").unwrap()),
        (YearForm::ShortDecade, Regex::new(r"(?i)['’]?\b(\d)0'?s\b").unwrap()),
    ]
});

fn year(caps: &Captures<'_>, group: usize) -> Option<u16> {
    caps.get(group)?.as_str().parse().ok()
}

fn bounds(form: YearForm, caps: &Captures<'_>) -> Option<(Option<u16>, Option<u16>)> {
    let bounds = match form {
        YearForm::Range => {
            let (a, b) = (year(caps, 1)?, year(caps, 2)?);
            (Some(a.min(b)), Some(a.max(b)))
        }
        YearForm::After => (Some(year(caps, 1)?), None),
        YearForm::Before => (None, Some(year(caps, 1)?)),
        YearForm::In => {
            let y = year(caps, 1)?;
            (Some(y), Some(y))
        }
        YearForm::Decade => {
            let start = year(caps, 1)?;
            (Some(start), Some(start + 9))
        }
        YearForm::ShortDecade => {
            let tens = year(caps, 1)? * 10;
            let start = if tens <= SHORT_DECADE_PIVOT { 2000 + tens } else { 1900 + tens };
            (Some(start), Some(start + 9))
        }
    };
    Some(bounds)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YearRule;

impl ExtractionRule for YearRule {
    fn name(&self) -> &'static str {
        "year"
    }

    fn extract(&self, text: &str) -> Vec<Extraction> {
        let mut found = Vec::new();
        for (form, pattern) in YEAR_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                if let Some((year_min, year_max)) = bounds(*form, &caps) {
                    found.push(Extraction::new(
                        whole.range(),
                        Constraint::new().with_year_range(year_min, year_max),
                    ));
                }
            }
        }
        found
    }
}
