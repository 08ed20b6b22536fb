use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::number::NumericInput;

pub(crate) const BOOK_ADDED: &str = "book successfully added";

pub(crate) struct AddBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddBookCommandRequest {
    #[serde(default)]
    pub(crate) id: Option<String>,
    pub(crate) title: String,
    pub(crate) years: NumericInput,
    pub(crate) pages: NumericInput,
}

impl AddBookCommandRequest {
    #[cfg(test)]
    pub fn new(id: Option<&str>, title: &str, years: NumericInput, pages: NumericInput) -> Self {
        Self {
            id: id.map(str::to_string),
            title: title.to_string(),
            years,
            pages,
        }
    }

    // coerces years/pages and assigns an id when the client did not send one
    pub fn build_book(&self) -> LibraryResult<BookDto> {
        let id = match &self.id {
            Some(id) if id.trim().is_empty() => {
                return Err(LibraryError::validation("id must not be blank", None));
            }
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        if self.title.trim().is_empty() {
            return Err(LibraryError::validation("title must not be blank", None));
        }
        let years = self.years.coerce("years")?;
        let pages = self.pages.coerce("pages")?;
        if pages < 0 {
            return Err(LibraryError::validation(
                format!("pages must not be negative but was {}", pages).as_str(), None));
        }
        Ok(BookDto::new(id.as_str(), self.title.as_str(), years, pages))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub message: String,
}

impl AddBookCommandResponse {
    pub fn new() -> Self {
        Self {
            message: BOOK_ADDED.to_string(),
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = req.build_book()?;
        self.catalog_service.add_book(&book).await.map_err(CommandError::from).map(|_| AddBookCommandResponse::new())
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::Catalog;
    use crate::books::repository::json_book_repository::JsonBookRepository;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::domain::service::tests::build_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::repository::Repository;
    use crate::utils::number::NumericInput;

    #[tokio::test]
    async fn test_should_run_add_book_with_string_numbers() {
        let (dir, _events, svc) = build_service(&Catalog::default()).await;
        let req: AddBookCommandRequest = serde_json::from_value(serde_json::json!({
            "id": "55b7d315-1a5f-4b13-a665-c382a6c71756",
            "title": "H2G2 le guide du voyageur galactique",
            "years": "2015",
            "pages": "650"
        })).expect("should parse request");
        let res = AddBookCommand::new(svc).execute(req).await.expect("should add book");
        assert_eq!("book successfully added", res.message.as_str());

        let stored = JsonBookRepository::new(dir.path().join("books.json"))
            .get("55b7d315-1a5f-4b13-a665-c382a6c71756").await.expect("should store book");
        assert_eq!(2015, stored.years);
        assert_eq!(650, stored.pages);

        let json = serde_json::to_value(&res).expect("should serialize");
        assert_eq!(serde_json::json!({"message": "book successfully added"}), json);
    }

    #[tokio::test]
    async fn test_should_generate_id_when_missing() {
        let req = AddBookCommandRequest::new(None, "untitled", NumericInput::from(2001), NumericInput::from(10));
        let book = req.build_book().expect("should build book");
        assert_eq!(36, book.id.len());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_input() {
        let bad_years = AddBookCommandRequest::new(Some("b1"), "title", NumericInput::from("soon"), NumericInput::from(10));
        assert!(bad_years.build_book().is_err());
        let negative_pages = AddBookCommandRequest::new(Some("b1"), "title", NumericInput::from(2001), NumericInput::from(-1));
        assert!(negative_pages.build_book().is_err());
        let blank_id = AddBookCommandRequest::new(Some("  "), "title", NumericInput::from(2001), NumericInput::from(1));
        assert!(blank_id.build_book().is_err());
        let blank_title = AddBookCommandRequest::new(Some("b1"), "", NumericInput::from(2001), NumericInput::from(1));
        assert!(blank_title.build_book().is_err());

        let (_dir, _events, svc) = build_service(&Catalog::default()).await;
        let res = AddBookCommand::new(svc).execute(bad_years).await;
        assert!(matches!(res, Err(CommandError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_book() {
        let (_dir, _events, svc) = build_service(&Catalog::default()).await;
        let cmd = AddBookCommand::new(svc);
        let req = || AddBookCommandRequest::new(Some("b1"), "title", NumericInput::from(2001), NumericInput::from(1));
        cmd.execute(req()).await.expect("should add book");
        assert!(matches!(cmd.execute(req()).await, Err(CommandError::DuplicateKey { .. })));
    }
}
