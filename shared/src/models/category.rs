//! Category Model

use serde::{Deserialize, Serialize};

/// Menu category used by the home-screen filter chips
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
