//! Banner Model

use serde::{Deserialize, Serialize};

/// Promotional banner shown in the home-screen carousel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default, rename = "highlightText")]
    pub highlight_text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
