use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Hard cap on generator input; longer text is truncated on write.
pub const TEXT_LIMIT: usize = 3000;

pub const DEFAULT_LANGUAGE: &str = "english";
pub const DEFAULT_STYLE: &str = "casual";
pub const DEFAULT_INK_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum HandwritingSize {
    Small,
    Medium,
    Large,
}

impl HandwritingSize {
    pub const ALL: [HandwritingSize; 3] = [
        HandwritingSize::Small,
        HandwritingSize::Medium,
        HandwritingSize::Large,
    ];

    /// Wire value sent in the multipart payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandwritingSize::Small => "small",
            HandwritingSize::Medium => "medium",
            HandwritingSize::Large => "large",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandwritingSize::Small => "Small (20px)",
            HandwritingSize::Medium => "Medium (24px)",
            HandwritingSize::Large => "Large (28px)",
        }
    }
}

impl Default for HandwritingSize {
    fn default() -> Self {
        HandwritingSize::Medium
    }
}

/// Current generator form. Mutated by user input and by option loads;
/// `language` and `style` stay members of the last-loaded option lists.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormState {
    pub text: String,
    /// Path picked through the file dialog; `.txt` or `.pdf` only.
    pub uploaded_file: Option<PathBuf>,
    pub language: String,
    pub style: String,
    pub size: HandwritingSize,
    pub ink_color: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            uploaded_file: None,
            language: DEFAULT_LANGUAGE.into(),
            style: DEFAULT_STYLE.into(),
            size: HandwritingSize::default(),
            ink_color: DEFAULT_INK_COLOR.into(),
        }
    }
}

impl FormState {
    /// Replace the text, truncating past `TEXT_LIMIT` characters.
    pub fn set_text(&mut self, text: String) {
        self.text = clamp_text(text);
    }
}

/// Truncate to `TEXT_LIMIT` characters on a char boundary.
pub fn clamp_text(text: String) -> String {
    match text.char_indices().nth(TEXT_LIMIT) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

/// Short blurb shown under the style dropdown. Unknown styles get none.
pub fn style_description(style: &str) -> Option<&'static str> {
    match style {
        "casual" => Some("Natural, flowing everyday handwriting"),
        "formal" => Some("Elegant and professional script"),
        "print" => Some("Clear, readable printed letters"),
        "cursive" => Some("Beautiful connected cursive writing"),
        "school" => Some("Friendly, rounded school-style writing"),
        "traditional" => Some("Classic traditional script"),
        "elegant" => Some("Sophisticated and graceful writing"),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SizeOption {
    pub value: HandwritingSize,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct StyleNote {
    pub style: String,
    pub description: String,
}

/// Static form metadata shown beside the dropdowns.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct FormCatalog {
    pub sizes: Vec<SizeOption>,
    pub styles: Vec<StyleNote>,
    pub text_limit: u32,
}

pub fn catalog() -> FormCatalog {
    let sizes = HandwritingSize::ALL
        .iter()
        .map(|size| SizeOption {
            value: *size,
            label: size.label().into(),
        })
        .collect();

    let styles = [
        "casual",
        "formal",
        "print",
        "cursive",
        "school",
        "traditional",
        "elegant",
    ]
    .iter()
    .filter_map(|style| {
        style_description(style).map(|description| StyleNote {
            style: (*style).into(),
            description: description.into(),
        })
    })
    .collect();

    FormCatalog {
        sizes,
        styles,
        text_limit: TEXT_LIMIT as u32,
    }
}
