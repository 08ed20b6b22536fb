use crate::books::repository::BookRepository;
use crate::books::repository::json_book_repository::JsonBookRepository;
use crate::core::domain::Configuration;

pub(crate) fn create_book_repository(config: &Configuration) -> Box<dyn BookRepository> {
    Box::new(JsonBookRepository::new(&config.data_path))
}
