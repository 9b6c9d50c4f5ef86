use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Socio-economic assistance status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "C")]
    Cssa,
    #[serde(rename = "F")]
    FullGrant,
    #[serde(rename = "H")]
    HalfGrant,
    #[serde(rename = "D")]
    Difficulty,
    #[serde(rename = "S")]
    Special,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Cssa,
        Category::FullGrant,
        Category::HalfGrant,
        Category::Difficulty,
        Category::Special,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Category::Cssa => "C",
            Category::FullGrant => "F",
            Category::HalfGrant => "H",
            Category::Difficulty => "D",
            Category::Special => "S",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "C" => Some(Category::Cssa),
            "F" => Some(Category::FullGrant),
            "H" => Some(Category::HalfGrant),
            "D" => Some(Category::Difficulty),
            "S" => Some(Category::Special),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI or import lines (any case)
    pub fn from_code(code: &str) -> Option<Self> {
        Category::from_db_str(&code.trim().to_uppercase())
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        Category::from_code(code).ok_or_else(|| AppError::InvalidCategory(code.to_string()))
    }

    /// Display label. Presentation only, never stored.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cssa => "綜援",
            Category::FullGrant => "全免",
            Category::HalfGrant => "半免",
            Category::Difficulty => "經濟困難",
            Category::Special => "特殊",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Category restriction applied to aggregations.
///
/// `All` is the wildcard sentinel: it means "no filter" and is bound as SQL
/// `NULL`, so it can never match the stored column literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> AppResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Category::parse(s).map(CategoryFilter::Only)
    }

    /// Value bound to the `?` placeholder of the filtered queries.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(c.to_db_str()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(c) => c.code(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "所有",
            CategoryFilter::Only(c) => c.label(),
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(c: Category) -> Self {
        CategoryFilter::Only(c)
    }
}
