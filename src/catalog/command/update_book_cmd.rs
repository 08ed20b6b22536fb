use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookPatch;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::number::NumericInput;

pub(crate) const BOOK_UPDATED: &str = "book successfully updated";

pub(crate) struct UpdateBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// Only the supplied fields change. `book_id` comes from the route, a body `id`
// is accepted only when it names the same book.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateBookCommandRequest {
    #[serde(skip)]
    pub book_id: String,
    pub id: Option<String>,
    pub title: Option<String>,
    pub years: Option<NumericInput>,
    pub pages: Option<NumericInput>,
}

impl UpdateBookCommandRequest {
    #[cfg(test)]
    pub fn new(book_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
            ..Default::default()
        }
    }

    pub fn build_patch(&self) -> LibraryResult<BookPatch> {
        if let Some(id) = &self.id {
            if id != &self.book_id {
                return Err(LibraryError::validation(
                    format!("book id {} cannot be changed to {}", self.book_id, id).as_str(), None));
            }
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(LibraryError::validation("title must not be blank", None));
            }
        }
        let years = self.years.as_ref().map(|y| y.coerce("years")).transpose()?;
        let pages = self.pages.as_ref().map(|p| p.coerce("pages")).transpose()?;
        if let Some(pages) = pages {
            if pages < 0 {
                return Err(LibraryError::validation(
                    format!("pages must not be negative but was {}", pages).as_str(), None));
            }
        }
        Ok(BookPatch {
            title: self.title.clone(),
            years,
            pages,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub message: String,
}

impl UpdateBookCommandResponse {
    pub fn new() -> Self {
        Self {
            message: BOOK_UPDATED.to_string(),
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let patch = req.build_patch()?;
        self.catalog_service.update_book(req.book_id.as_str(), &patch)
            .await.map_err(CommandError::from).map(|_| UpdateBookCommandResponse::new())
    }
}
