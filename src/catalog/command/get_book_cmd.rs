use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) const BOOK_FETCHED: &str = "book fetched";

pub(crate) struct GetBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl GetBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) book_id: String,
}

impl GetBookCommandRequest {
    pub fn new(book_id: String) -> Self {
        Self {
            book_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    pub message: String,
    pub book: BookDto,
}

impl GetBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            message: BOOK_FETCHED.to_string(),
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.catalog_service.find_book_by_id(req.book_id.as_str())
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{BookEntity, Catalog};
    use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
    use crate::catalog::domain::service::tests::build_service;
    use crate::core::command::{Command, CommandError};

    #[tokio::test]
    async fn test_should_run_get_book() {
        let catalog = Catalog::new(vec![BookEntity::new("b1", "H3G3", 1990, 400)]);
        let (_dir, _events, svc) = build_service(&catalog).await;
        let res = GetBookCommand::new(svc).execute(GetBookCommandRequest::new("b1".to_string()))
            .await.expect("should get book");
        assert_eq!("book fetched", res.message.as_str());
        assert_eq!("H3G3", res.book.title.as_str());
        assert_eq!(1990, res.book.years);
    }

    #[tokio::test]
    async fn test_should_fail_get_missing_book() {
        let (_dir, _events, svc) = build_service(&Catalog::default()).await;
        let res = GetBookCommand::new(svc).execute(GetBookCommandRequest::new("nope".to_string())).await;
        assert!(matches!(res, Err(CommandError::NotFound { .. })));
    }
}
