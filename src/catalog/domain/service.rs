use async_trait::async_trait;
use tracing::info;
use crate::books::domain::model::{BookEntity, BookPatch};
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryResult;
use crate::gateway::events::EventPublisher;

const EVENT_NAME: &str = "books";
const EVENT_GROUP: &str = "catalog";

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
    events_publisher: Box<dyn EventPublisher>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(book_repository: Box<dyn BookRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            book_repository,
            events_publisher,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn list_books(&self) -> LibraryResult<Vec<BookDto>> {
        let books = self.book_repository.all().await?;
        Ok(books.iter().map(BookDto::from).collect())
    }

    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        self.book_repository.create(&BookEntity::from(book)).await?;
        info!(book_id = %book.id, "book added");
        self.events_publisher.publish(&DomainEvent::added(
            EVENT_NAME, EVENT_GROUP, book.id.as_str(), book)?).await?;
        Ok(book.clone())
    }

    async fn remove_book(&self, id: &str) -> LibraryResult<()> {
        self.book_repository.delete(id).await?;
        info!(book_id = %id, "book deleted");
        self.events_publisher.publish(&DomainEvent::deleted(
            EVENT_NAME, EVENT_GROUP, id, &id)?).await?;
        Ok(())
    }

    async fn update_book(&self, id: &str, patch: &BookPatch) -> LibraryResult<BookDto> {
        let updated = BookDto::from(&self.book_repository.patch(id, patch).await?);
        info!(book_id = %id, "book updated");
        self.events_publisher.publish(&DomainEvent::updated(
            EVENT_NAME, EVENT_GROUP, id, &updated)?).await?;
        Ok(updated)
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.id.to_string(),
            title: other.title.to_string(),
            years: other.years,
            pages: other.pages,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        BookEntity::new(other.id.as_str(), other.title.as_str(), other.years, other.pages)
    }
}
