pub mod json_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::{BookEntity, BookPatch, Catalog};
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // reads the whole catalog, a missing file is an empty catalog
    async fn load(&self) -> LibraryResult<Catalog>;

    // atomically overwrites the stored catalog, mutating callers hold the file lock
    async fn save(&self, catalog: &Catalog) -> LibraryResult<()>;

    // unconditionally replaces the stored catalog, used to install fixtures
    #[cfg(test)]
    async fn reset(&self, catalog: &Catalog) -> LibraryResult<()>;

    // merges the patch into the stored book and returns the result
    async fn patch(&self, id: &str, patch: &BookPatch) -> LibraryResult<BookEntity>;
}
