use super::category::Category;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,               // ⇔ students.id
    pub class: String,         // ⇔ students.class ("1A")
    pub class_number: i64,     // ⇔ students.class_number
    pub name: String,          // ⇔ students.name
    pub category: Category,    // ⇔ students.category ('C','F','H','D','S')
}

/// Student data before it is assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub class: String,
    pub class_number: i64,
    pub name: String,
    pub category: Category,
}

impl NewStudent {
    pub fn new(class: &str, class_number: i64, name: &str, category: Category) -> Self {
        Self {
            class: class.to_string(),
            class_number,
            name: name.to_string(),
            category,
        }
    }

    pub fn key(&self) -> StudentKey {
        StudentKey {
            class: self.class.clone(),
            class_number: self.class_number,
            name: self.name.clone(),
        }
    }
}

/// The `(class, class_number, name)` tuple used to re-identify a student
/// from free-text input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudentKey {
    pub class: String,
    pub class_number: i64,
    pub name: String,
}

impl StudentKey {
    pub fn new(class: &str, class_number: i64, name: &str) -> Self {
        Self {
            class: class.to_string(),
            class_number,
            name: name.to_string(),
        }
    }
}

impl Student {
    pub fn key(&self) -> StudentKey {
        StudentKey::new(&self.class, self.class_number, &self.name)
    }

    /// Form of the student: leading digits of the class label ("1A" → "1").
    pub fn form(&self) -> &str {
        let end = self
            .class
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.class.len());
        &self.class[..end]
    }
}
