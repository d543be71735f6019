//! Slide deck model and the summary-to-deck transform

use serde::Serialize;

pub const DECK_TITLE: &str = "Research Summary";
pub const DECK_SUBTITLE: &str = "Generated summary";
pub const CONTENT_TITLE: &str = "Key Points";
pub const FALLBACK_TITLE: &str = "Summary";
pub const BULLET_FONT_SIZE_PT: u32 = 18;
pub const BULLET_LEVEL: u8 = 0;

/// Stripped from both ends of every summary line
const BULLET_GLYPHS: &[char] = &['-', '•', '*', '\t', ' '];

/// Ordered slides making up one presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slide {
    Title { title: String, subtitle: String },
    Bullets { title: String, bullets: Vec<Bullet> },
    /// Free text, used by the fallback layout
    Text { title: String, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bullet {
    pub text: String,
    pub level: u8,
    pub font_size_pt: u32,
}

impl Bullet {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: BULLET_LEVEL,
            font_size_pt: BULLET_FONT_SIZE_PT,
        }
    }
}

impl SlideDeck {
    /// Bullet texts across all slides, in order
    pub fn bullet_texts(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|slide| match slide {
                Slide::Bullets { bullets, .. } => bullets.iter().map(|b| b.text.as_str()).collect(),
                _ => Vec::new(),
            })
            .collect()
    }
}

/// Non-empty summary lines with bullet glyphs and whitespace stripped
pub fn bullet_lines(summary: &str) -> Vec<String> {
    summary
        .lines()
        .map(|line| line.trim_matches(BULLET_GLYPHS))
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Title slide followed by one bulleted content slide
pub fn build(summary: &str) -> SlideDeck {
    SlideDeck {
        slides: vec![
            Slide::Title {
                title: DECK_TITLE.to_string(),
                subtitle: DECK_SUBTITLE.to_string(),
            },
            Slide::Bullets {
                title: CONTENT_TITLE.to_string(),
                bullets: bullet_lines(summary).into_iter().map(Bullet::new).collect(),
            },
        ],
    }
}

/// Single slide carrying the raw summary, stripped of characters XML cannot hold
pub fn fallback(summary: &str) -> SlideDeck {
    SlideDeck {
        slides: vec![Slide::Text {
            title: FALLBACK_TITLE.to_string(),
            body: summary.chars().filter(|c| is_xml_char(*c)).collect(),
        }],
    }
}

/// Characters allowed in XML 1.0 text
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}
