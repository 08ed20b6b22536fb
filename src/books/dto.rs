use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    pub id: String,
    pub title: String,
    pub years: i64,
    pub pages: i64,
}

impl BookDto {
    pub fn new(id: &str, title: &str, years: i64, pages: i64) -> BookDto {
        BookDto {
            id: id.to_string(),
            title: title.to_string(),
            years,
            pages,
        }
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.id.to_string()
    }
}
