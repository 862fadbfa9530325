use regex::Regex;
use std::sync::OnceLock;

pub const MARK_OPEN: &str = "<span class=\"hl\">";
pub const MARK_CLOSE: &str = "</span>";

// Hebrew letters count as non-word here, so a prefix like `ל` in `ל5 mg`
// does not hide the amount.
const ASCII_BOUNDARY: &str = r"(?-u:\b)";

/// Escapes text for embedding as HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Tokens worth marking in protocol text.
///
/// Tokens are written raw; they are escaped before compilation so they match
/// the escaped text the pattern runs over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DosingVocabulary {
    /// Units that count only when directly preceded by a number.
    pub numeric_units: Vec<&'static str>,
    /// Hebrew unit spellings, matched on their own.
    pub standalone_units: Vec<&'static str>,
    /// Lab abbreviations, matched as whole words.
    pub lab_markers: Vec<&'static str>,
}

impl Default for DosingVocabulary {
    fn default() -> Self {
        Self {
            numeric_units: vec![
                "mg/kg", "mcg/kg", "min", "ml/kg", "units/kg", "mg", "mcg", "ml",
            ],
            standalone_units: vec![
                "מ\"ג/ק\"ג",
                "מ\"ל/ק\"ג",
                "מ\"ג",
                "מ\"ל",
                "מ״ג/ק״ג",
                "מ״ל/ק״ג",
                "מ״ג",
                "מ״ל",
            ],
            lab_markers: vec!["CRP", "ANC", "PCT"],
        }
    }
}

impl DosingVocabulary {
    /// Case-insensitive pattern over HTML-escaped text.
    pub fn pattern(&self) -> String {
        let mut branches = Vec::new();
        if !self.numeric_units.is_empty() {
            branches.push(format!(
                r"{ASCII_BOUNDARY}[0-9]+(?:\.[0-9]+)?\s*(?:{}){ASCII_BOUNDARY}",
                alternation(&self.numeric_units)
            ));
        }
        if !self.standalone_units.is_empty() {
            branches.push(format!("(?:{})", alternation(&self.standalone_units)));
        }
        if !self.lab_markers.is_empty() {
            branches.push(format!(
                r"{ASCII_BOUNDARY}(?:{}){ASCII_BOUNDARY}",
                alternation(&self.lab_markers)
            ));
        }
        if branches.is_empty() {
            // Never matches.
            return r"\b\B".to_string();
        }
        format!("(?i){}", branches.join("|"))
    }
}

// Longest first, so `mg/kg` wins over `mg`.
fn alternation(tokens: &[&str]) -> String {
    let mut escaped: Vec<String> = tokens
        .iter()
        .map(|t| regex::escape(&escape_html(t)))
        .collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    escaped.join("|")
}

pub struct Highlighter {
    re: Regex,
}

impl Highlighter {
    pub fn new(vocabulary: &DosingVocabulary) -> Result<Self, regex::Error> {
        Ok(Self {
            re: Regex::new(&vocabulary.pattern())?,
        })
    }

    /// Shared instance built from the default vocabulary.
    pub fn standard() -> &'static Highlighter {
        static STANDARD: OnceLock<Highlighter> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Highlighter::new(&DosingVocabulary::default()).expect("valid dosing pattern")
        })
    }

    /// Escapes `text` and, when `enabled`, wraps dosing tokens in markers.
    pub fn render(&self, text: &str, enabled: bool) -> String {
        let safe = escape_html(text);
        if !enabled {
            return safe;
        }
        self.re
            .replace_all(&safe, format!("{MARK_OPEN}$0{MARK_CLOSE}").as_str())
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_markers(html: &str) -> String {
        html.replace(MARK_OPEN, "").replace(MARK_CLOSE, "")
    }

    fn marked(html: &str) -> Vec<&str> {
        html.split(MARK_OPEN)
            .skip(1)
            .filter_map(|rest| rest.split(MARK_CLOSE).next())
            .collect()
    }

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn disabled_returns_exactly_the_escaped_text() {
        let text = "Ceftriaxone 50 mg/kg <max 2g> & CRP";
        assert_eq!(
            Highlighter::standard().render(text, false),
            escape_html(text)
        );
    }

    #[test]
    fn marks_numeric_doses_and_labs() {
        let html = Highlighter::standard()
            .render("Give 0.15 mg/kg then 5mcg/kg over 20 min; check crp and ANC.", true);
        assert_eq!(
            marked(&html),
            vec!["0.15 mg/kg", "5mcg/kg", "20 min", "crp", "ANC"]
        );
    }

    #[test]
    fn prefers_the_longest_unit() {
        let html = Highlighter::standard().render("10 ml/kg bolus, 2 units/kg", true);
        assert_eq!(marked(&html), vec!["10 ml/kg", "2 units/kg"]);
    }

    #[test]
    fn marks_hebrew_units_after_escaping() {
        let html = Highlighter::standard().render("אמוקסיצילין 90 מ\"ג/ק\"ג ליום, 5 מ״ל", true);
        assert_eq!(marked(&html), vec!["מ&quot;ג/ק&quot;ג", "מ״ל"]);
    }

    #[test]
    fn hebrew_prefix_letters_do_not_hide_tokens() {
        let html = Highlighter::standard().render("ל5 mg ו-10 mg, ב2 ml/kg, לפי הCRP", true);
        assert_eq!(marked(&html), vec!["5 mg", "10 mg", "2 ml/kg", "CRP"]);
    }

    #[test]
    fn leaves_words_containing_units_alone() {
        let html = Highlighter::standard().render("mgmt of PCTX and 5 mgs", true);
        assert!(marked(&html).is_empty());
    }

    #[test]
    fn stripping_markers_recovers_the_escaped_text() {
        let text = "Fluids: 20 ml/kg <b>NS</b> & recheck PCT in 6h; \"Adrenaline\" 0.01 mg/kg";
        let html = Highlighter::standard().render(text, true);
        assert_ne!(html, escape_html(text));
        assert_eq!(strip_markers(&html), escape_html(text));
    }

    #[test]
    fn custom_vocabulary_is_honoured() {
        let vocabulary = DosingVocabulary {
            numeric_units: vec!["g"],
            standalone_units: vec!["q8h"],
            lab_markers: vec!["WBC"],
        };
        let highlighter = Highlighter::new(&vocabulary).unwrap();
        let html = highlighter.render("2 g q8h, WBC 12, 5 mg", true);
        assert_eq!(marked(&html), vec!["2 g", "q8h", "WBC"]);
    }

    #[test]
    fn empty_vocabulary_marks_nothing() {
        let vocabulary = DosingVocabulary {
            numeric_units: vec![],
            standalone_units: vec![],
            lab_markers: vec![],
        };
        let highlighter = Highlighter::new(&vocabulary).unwrap();
        assert_eq!(highlighter.render("5 mg & CRP", true), "5 mg &amp; CRP");
    }
}
