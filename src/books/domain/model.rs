use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::utils::number::serializer;

// BookEntity is the persisted form of a book in the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub id: String,
    pub title: String,
    #[serde(with = "serializer")]
    pub years: i64,
    #[serde(with = "serializer")]
    pub pages: i64,
}

impl BookEntity {
    pub fn new(id: &str, title: &str, years: i64, pages: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            years,
            pages,
        }
    }

    // merges the supplied fields, everything else is retained
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.to_string();
        }
        if let Some(years) = patch.years {
            self.years = years;
        }
        if let Some(pages) = patch.pages {
            self.pages = pages;
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

// BookPatch carries the fields of a partial update, already coerced.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BookPatch {
    pub title: Option<String>,
    pub years: Option<i64>,
    pub pages: Option<i64>,
}

// Catalog mirrors the data file: `{ "books": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Catalog {
    #[serde(default)]
    pub books: Vec<BookEntity>,
}

impl Catalog {
    #[cfg(test)]
    pub fn new(books: Vec<BookEntity>) -> Self {
        Self { books }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|b| b.id() == id)
    }
}
