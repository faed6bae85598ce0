//! Phrase lexicons for genres and countries.
//!
//! Each entry maps a lower-case phrase (words separated by single spaces)
//! to one or more canonical names. Lookups run over word tokens and take
//! the longest phrase starting at each token.

use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

const GENRE_PHRASES: &[(&str, &[&str])] = &[
    ("action", &["Action"]),
    ("action movies", &["Action"]),
    ("adventure", &["Adventure"]),
    ("adventures", &["Adventure"]),
    ("animation", &["Animation"]),
    ("animated", &["Animation"]),
    ("anime", &["Animation"]),
    ("cartoon", &["Animation"]),
    ("cartoons", &["Animation"]),
    ("comedy", &["Comedy"]),
    ("comedies", &["Comedy"]),
    ("comedic", &["Comedy"]),
    ("funny", &["Comedy"]),
    ("crime", &["Crime"]),
    ("documentary", &["Documentary"]),
    ("documentaries", &["Documentary"]),
    ("drama", &["Drama"]),
    ("dramas", &["Drama"]),
    ("dramatic", &["Drama"]),
    ("family", &["Family"]),
    ("fantasy", &["Fantasy"]),
    ("history", &["History"]),
    ("historical", &["History"]),
    ("horror", &["Horror"]),
    ("horrors", &["Horror"]),
    ("scary", &["Horror"]),
    ("music", &["Music"]),
    ("musical", &["Music"]),
    ("musicals", &["Music"]),
    ("mystery", &["Mystery"]),
    ("mysteries", &["Mystery"]),
    ("romance", &["Romance"]),
    ("romances", &["Romance"]),
    ("romantic", &["Romance"]),
    ("science fiction", &["Science Fiction"]),
    ("sci-fi", &["Science Fiction"]),
    ("sci fi", &["Science Fiction"]),
    ("scifi", &["Science Fiction"]),
    ("thriller", &["Thriller"]),
    ("thrillers", &["Thriller"]),
    ("tv movie", &["TV Movie"]),
    ("war", &["War"]),
    ("western", &["Western"]),
    ("westerns", &["Western"]),
    ("rom-com", &["Romance", "Comedy"]),
    ("rom-coms", &["Romance", "Comedy"]),
    ("romcom", &["Romance", "Comedy"]),
    ("romcoms", &["Romance", "Comedy"]),
    ("rom com", &["Romance", "Comedy"]),
    ("rom coms", &["Romance", "Comedy"]),
    ("romantic comedy", &["Romance", "Comedy"]),
    ("romantic comedies", &["Romance", "Comedy"]),
];

const COUNTRY_PHRASES: &[(&str, &[&str])] = &[
    ("united states", &["United States"]),
    ("united states of america", &["United States"]),
    ("usa", &["United States"]),
    ("america", &["United States"]),
    ("american", &["United States"]),
    ("united kingdom", &["United Kingdom"]),
    ("uk", &["United Kingdom"]),
    ("britain", &["United Kingdom"]),
    ("great britain", &["United Kingdom"]),
    ("british", &["United Kingdom"]),
    ("england", &["United Kingdom"]),
    ("english", &["United Kingdom"]),
    ("ireland", &["Ireland"]),
    ("irish", &["Ireland"]),
    ("france", &["France"]),
    ("french", &["France"]),
    ("germany", &["Germany"]),
    ("german", &["Germany"]),
    ("italy", &["Italy"]),
    ("italian", &["Italy"]),
    ("spain", &["Spain"]),
    ("spanish", &["Spain"]),
    ("belgium", &["Belgium"]),
    ("belgian", &["Belgium"]),
    ("sweden", &["Sweden"]),
    ("swedish", &["Sweden"]),
    ("denmark", &["Denmark"]),
    ("danish", &["Denmark"]),
    ("norway", &["Norway"]),
    ("norwegian", &["Norway"]),
    ("poland", &["Poland"]),
    ("polish", &["Poland"]),
    ("russia", &["Russia"]),
    ("russian", &["Russia"]),
    ("japan", &["Japan"]),
    ("japanese", &["Japan"]),
    ("south korea", &["South Korea"]),
    ("south korean", &["South Korea"]),
    ("korea", &["South Korea"]),
    ("korean", &["South Korea"]),
    ("china", &["China"]),
    ("chinese", &["China"]),
    ("hong kong", &["Hong Kong"]),
    ("taiwan", &["Taiwan"]),
    ("taiwanese", &["Taiwan"]),
    ("india", &["India"]),
    ("indian", &["India"]),
    ("bollywood", &["India"]),
    ("iran", &["Iran"]),
    ("iranian", &["Iran"]),
    ("turkey", &["Turkey"]),
    ("turkish", &["Turkey"]),
    ("mexico", &["Mexico"]),
    ("mexican", &["Mexico"]),
    ("brazil", &["Brazil"]),
    ("brazilian", &["Brazil"]),
    ("argentina", &["Argentina"]),
    ("argentine", &["Argentina"]),
    ("argentinian", &["Argentina"]),
    ("canada", &["Canada"]),
    ("canadian", &["Canada"]),
    ("australia", &["Australia"]),
    ("australian", &["Australia"]),
    ("new zealand", &["New Zealand"]),
];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+(?:['’\-][A-Za-z0-9]+)*").unwrap());

pub static GENRES: LazyLock<Lexicon> = LazyLock::new(|| Lexicon::from_phrases(GENRE_PHRASES));
pub static COUNTRIES: LazyLock<Lexicon> = LazyLock::new(|| Lexicon::from_phrases(COUNTRY_PHRASES));

/// A word token and its byte range in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub span: Range<usize>,
    pub text: String,
}

/// Split text into lower-cased word tokens, keeping inner hyphens and
/// apostrophes (`sci-fi`, `i'd`).
pub fn tokenize(text: &str) -> Vec<Token> {
    WORD.find_iter(text)
        .map(|m| Token {
            span: m.range(),
            text: m.as_str().to_lowercase().replace('’', "'"),
        })
        .collect()
}

/// Phrase → canonical names table
#[derive(Debug, Default)]
pub struct Lexicon {
    phrases: HashMap<String, &'static [&'static str]>,
    /// Canonical name (lower case) → canonical name
    canonical: HashMap<String, &'static str>,
    max_words: usize,
}

impl Lexicon {
    pub fn from_phrases(entries: &[(&'static str, &'static [&'static str])]) -> Self {
        let mut lexicon = Self::default();
        for (phrase, names) in entries {
            lexicon.max_words = lexicon.max_words.max(phrase.split(' ').count());
            lexicon.phrases.insert(phrase.to_string(), *names);
            for name in names.iter() {
                lexicon.canonical.insert(name.to_lowercase(), *name);
            }
        }
        lexicon
    }

    /// Every lexicon phrase in `text`, left to right, longest phrase
    /// first at each position. Matches never overlap.
    pub fn find_all(&self, text: &str) -> Vec<(Range<usize>, &'static [&'static str])> {
        let tokens = tokenize(text);
        let mut found = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let longest = self.max_words.min(tokens.len() - i);
            let hit = (1..=longest).rev().find_map(|n| {
                let phrase = tokens[i..i + n]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                self.phrases.get(&phrase).map(|names| (n, *names))
            });

            match hit {
                Some((n, names)) => {
                    found.push((tokens[i].span.start..tokens[i + n - 1].span.end, names));
                    i += n;
                }
                None => i += 1,
            }
        }
        found
    }

    /// Canonical name for a phrase or a canonical name in any case.
    ///
    /// Phrases that map to several names (`rom-com`) have no single
    /// canonical form and return `None`.
    pub fn canonical(&self, name: &str) -> Option<&'static str> {
        let key = name.trim().to_lowercase();
        if let Some(canonical) = self.canonical.get(&key) {
            return Some(*canonical);
        }
        match self.phrases.get(&key) {
            Some(names) if names.len() == 1 => Some(names[0]),
            _ => None,
        }
    }
}
