use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(FileId);
id_newtype!(FolderId);
id_newtype!(SheetId);

/// A playable entry listed from the source folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFile {
    pub id: FileId,
    pub name: String,
}

impl AudioFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: FileId(id.into()),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub name: String,
    pub rating: String,
}

impl RatingEntry {
    pub fn new(name: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: rating.into(),
        }
    }
}

/// Ratings held in sheet row order.
///
/// Names are not unique by construction. Every lookup resolves to the first
/// entry with a matching name, so later duplicates are never read or updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingTable {
    entries: Vec<RatingEntry>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps sheet rows positionally: column 0 is the name, column 1 the rating.
    /// Missing cells read as empty strings.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let entries = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                let name = cells.next().unwrap_or_default();
                let rating = cells.next().unwrap_or_default();
                RatingEntry { name, rating }
            })
            .collect();
        Self { entries }
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| vec![entry.name.clone(), entry.rating.clone()])
            .collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&RatingEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Updates the first entry named `name`, or appends a new one.
    pub fn upsert(&mut self, name: &str, rating: &str) -> RatingChange {
        match self.position(name) {
            Some(index) => {
                self.entries[index].rating = rating.to_string();
                RatingChange::Updated { row: index }
            }
            None => {
                self.entries.push(RatingEntry::new(name, rating));
                RatingChange::Appended {
                    row: self.entries.len() - 1,
                }
            }
        }
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RatingEntry> for RatingTable {
    fn from_iter<T: IntoIterator<Item = RatingEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingChange {
    Updated { row: usize },
    Appended { row: usize },
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
