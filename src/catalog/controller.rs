use axum::{
    extract::{Path, State},
    extract::rejection::JsonRejection,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, command_to_server_error, parse_payload, ServerError};

pub(crate) const FETCH_BOOKS_ERROR: &str = "error fetching books";
pub(crate) const BOOK_NOT_FOUND_ERROR: &str = "book does not exist";
pub(crate) const ADD_BOOK_ERROR: &str = "error adding the book";
pub(crate) const UPDATE_BOOK_ERROR: &str = "error updating the book";
pub(crate) const DELETE_BOOK_ERROR: &str = "error deleting the book";

/// Routes of the catalog service. Routes taking an id also match with a
/// trailing slash.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/book", get(list_books).post(add_book))
        .route("/book/", get(list_books).post(add_book))
        .route("/book/:id",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .route("/book/:id/",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .with_state(state)
}

fn build_service(state: &AppState) -> Box<dyn CatalogService> {
    factory::create_catalog_service(&state.config)
}

pub(crate) async fn list_books(
    State(state): State<AppState>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let svc = build_service(&state);
    let res = ListBooksCommand::new(svc).execute(ListBooksCommandRequest::default()).await
        .map_err(|err| command_to_server_error(err, FETCH_BOOKS_ERROR))?;
    Ok(Json(res))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let req: AddBookCommandRequest = parse_payload(payload, ADD_BOOK_ERROR)?;
    let svc = build_service(&state);
    let res = AddBookCommand::new(svc).execute(req).await
        .map_err(|err| command_to_server_error(err, ADD_BOOK_ERROR))?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest::new(book_id);
    let svc = build_service(&state);
    let res = GetBookCommand::new(svc).execute(req).await
        .map_err(|err| command_to_server_error(err, BOOK_NOT_FOUND_ERROR))?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let mut req: UpdateBookCommandRequest = parse_payload(payload, UPDATE_BOOK_ERROR)?;
    req.book_id = book_id;
    let svc = build_service(&state);
    let res = UpdateBookCommand::new(svc).execute(req).await
        .map_err(|err| command_to_server_error(err, UPDATE_BOOK_ERROR))?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest::new(book_id);
    let svc = build_service(&state);
    let res = RemoveBookCommand::new(svc).execute(req).await
        .map_err(|err| command_to_server_error(err, DELETE_BOOK_ERROR))?;
    Ok(Json(res))
}
