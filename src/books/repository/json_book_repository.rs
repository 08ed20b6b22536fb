use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use lazy_static::lazy_static;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;
#[cfg(test)]
use tracing::info;

use crate::books::domain::model::{BookEntity, BookPatch, Catalog};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

lazy_static! {
    // one lock per data file, shared by every repository pointing at it
    static ref FILE_LOCKS: std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>> =
        std::sync::Mutex::new(HashMap::new());
}

// lock_key spells the same file the same way: absolute, without `.`/`..`
// segments, through the canonical parent directory when it exists.
fn lock_key(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    match (normalized.parent().map(Path::canonicalize), normalized.file_name()) {
        (Some(Ok(dir)), Some(name)) => dir.join(name),
        _ => normalized,
    }
}

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = FILE_LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    locks.entry(lock_key(path))
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

#[derive(Debug)]
pub struct JsonBookRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonBookRepository {
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let lock = lock_for(&path);
        Self {
            path,
            lock,
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn not_found(id: &str) -> LibraryError {
        LibraryError::not_found(format!("book not found for {}", id).as_str())
    }
}

// Writes into a temp file next to the target and renames it over the target,
// readers see either the old or the new catalog.
fn write_atomically(path: &Path, data: &[u8]) -> LibraryResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let mut file = NamedTempFile::new_in(&dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}

// Mutations hold the file lock around their whole load -> mutate -> save cycle.
#[async_trait]
impl Repository<BookEntity> for JsonBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let _guard = self.lock.lock().await;
        let mut catalog = self.load().await?;
        if catalog.position(entity.id.as_str()).is_some() {
            return Err(LibraryError::duplicate_key(format!("book {} already exists", entity.id).as_str()));
        }
        catalog.books.push(entity.clone());
        self.save(&catalog).await?;
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let catalog = self.load().await?;
        catalog.books.into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| Self::not_found(id))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let _guard = self.lock.lock().await;
        let mut catalog = self.load().await?;
        let ndx = catalog.position(id).ok_or_else(|| Self::not_found(id))?;
        catalog.books.remove(ndx);
        self.save(&catalog).await?;
        Ok(1)
    }

    async fn all(&self) -> LibraryResult<Vec<BookEntity>> {
        self.load().await.map(|catalog| catalog.books)
    }
}

#[async_trait]
impl BookRepository for JsonBookRepository {
    async fn load(&self) -> LibraryResult<Catalog> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => {
                let catalog: Catalog = serde_json::from_str(&json).map_err(|err| LibraryError::storage_unavailable(
                    format!("could not parse {}: {}", self.path.display(), err).as_str(), Some("corrupt".to_string())))?;
                debug!(path = %self.path.display(), books = catalog.books.len(), "loaded catalog");
                Ok(catalog)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "catalog file missing, starting empty");
                Ok(Catalog::default())
            }
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    async fn save(&self, catalog: &Catalog) -> LibraryResult<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, json.as_bytes()))
            .await
            .map_err(|err| LibraryError::storage_unavailable(
                format!("catalog write task failed {:?}", err).as_str(), None))?
    }

    #[cfg(test)]
    async fn reset(&self, catalog: &Catalog) -> LibraryResult<()> {
        let _guard = self.lock.lock().await;
        info!(path = %self.path.display(), books = catalog.books.len(), "resetting catalog");
        self.save(catalog).await
    }

    async fn patch(&self, id: &str, patch: &BookPatch) -> LibraryResult<BookEntity> {
        let _guard = self.lock.lock().await;
        let mut catalog = self.load().await?;
        let ndx = catalog.position(id).ok_or_else(|| Self::not_found(id))?;
        catalog.books[ndx].apply(patch);
        let book = catalog.books[ndx].clone();
        self.save(&catalog).await?;
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;
    use tempfile::TempDir;
    use crate::books::domain::model::{BookEntity, BookPatch, Catalog};
    use crate::books::repository::BookRepository;
    use crate::books::repository::json_book_repository::JsonBookRepository;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;

    lazy_static! {
        static ref MOCKED_CATALOG: Catalog = Catalog::new(vec![
            BookEntity::new("0db0b43e-dddb-47ad-9b4a-e5fe9ec7c2a9", "H3G3 le guide du voyageur galactique", 1990, 400),
        ]);
    }

    fn temp_repo() -> (TempDir, JsonBookRepository) {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let repo = JsonBookRepository::new(dir.path().join("books.json"));
        (dir, repo)
    }

    #[tokio::test]
    async fn test_should_load_empty_catalog_when_file_missing() {
        let (_dir, repo) = temp_repo();
        let catalog = repo.load().await.expect("should load");
        assert!(catalog.books.is_empty());
        assert!(repo.all().await.expect("should list").is_empty());
    }

    #[tokio::test]
    async fn test_should_fail_on_corrupt_file() {
        let (_dir, repo) = temp_repo();
        std::fs::write(repo.path(), "{ not json").expect("should write corrupt file");
        let res = repo.load().await;
        assert!(matches!(res, Err(LibraryError::StorageUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_should_reset_and_load() {
        let (_dir, repo) = temp_repo();
        repo.reset(&MOCKED_CATALOG).await.expect("should reset");
        assert_eq!(*MOCKED_CATALOG, repo.load().await.expect("should load"));

        repo.reset(&Catalog::default()).await.expect("should reset");
        assert!(repo.load().await.expect("should load").books.is_empty());
    }

    #[tokio::test]
    async fn test_should_save_in_books_shape() {
        let (_dir, repo) = temp_repo();
        repo.save(&MOCKED_CATALOG).await.expect("should save");
        let raw = std::fs::read_to_string(repo.path()).expect("should read file");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("should parse file");
        assert_eq!(1990, json["books"][0]["years"]);
        assert_eq!(400, json["books"][0]["pages"]);
    }

    #[tokio::test]
    async fn test_should_create_parent_dirs_and_leave_no_temp_files() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let repo = JsonBookRepository::new(dir.path().join("data").join("books.json"));
        repo.create(&BookEntity::new("b1", "one", 2001, 10)).await.expect("should create");

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("data")).expect("should list dir")
            .map(|e| e.expect("dir entry").file_name())
            .collect();
        assert_eq!(vec![std::ffi::OsString::from("books.json")], entries);
    }

    #[tokio::test]
    async fn test_should_create_and_get() {
        let (_dir, repo) = temp_repo();
        let book = BookEntity::new("b1", "one", 2001, 10);
        assert_eq!(1, repo.create(&book).await.expect("should create"));
        assert_eq!(book, repo.get("b1").await.expect("should get"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_id() {
        let (_dir, repo) = temp_repo();
        repo.reset(&MOCKED_CATALOG).await.expect("should reset");
        let dup = BookEntity::new("0db0b43e-dddb-47ad-9b4a-e5fe9ec7c2a9", "other", 2000, 1);
        assert!(matches!(repo.create(&dup).await, Err(LibraryError::DuplicateKey { .. })));
        assert_eq!(1, repo.all().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_not_find_missing_book() {
        let (_dir, repo) = temp_repo();
        repo.reset(&MOCKED_CATALOG).await.expect("should reset");
        assert!(matches!(repo.get("missing").await, Err(LibraryError::NotFound { .. })));
        assert!(matches!(repo.delete("missing").await, Err(LibraryError::NotFound { .. })));
        assert!(matches!(repo.patch("missing", &BookPatch::default()).await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_patch_book() {
        let (_dir, repo) = temp_repo();
        repo.reset(&MOCKED_CATALOG).await.expect("should reset");
        let patch = BookPatch { title: Some("Pas fou la saison 2 de One Punch Man".to_string()), ..Default::default() };
        let updated = repo.patch("0db0b43e-dddb-47ad-9b4a-e5fe9ec7c2a9", &patch).await.expect("should patch");
        assert_eq!("Pas fou la saison 2 de One Punch Man", updated.title.as_str());
        assert_eq!(1990, updated.years);
        assert_eq!(updated, repo.get("0db0b43e-dddb-47ad-9b4a-e5fe9ec7c2a9").await.expect("should get"));
    }

    #[tokio::test]
    async fn test_should_delete_book() {
        let (_dir, repo) = temp_repo();
        repo.reset(&MOCKED_CATALOG).await.expect("should reset");
        assert_eq!(1, repo.delete("0db0b43e-dddb-47ad-9b4a-e5fe9ec7c2a9").await.expect("should delete"));
        assert!(repo.all().await.expect("should list").is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_not_lose_concurrent_creates() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("books.json");
        let mut handles = vec![];
        for i in 0..16 {
            let path = path.clone();
            handles.push(tokio::spawn(async move {
                let repo = JsonBookRepository::new(&path);
                repo.create(&BookEntity::new(format!("b{}", i).as_str(), "book", 2000 + i, i)).await
            }));
        }
        for handle in handles {
            handle.await.expect("task should join").expect("should create");
        }
        assert_eq!(16, JsonBookRepository::new(&path).all().await.expect("should list").len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_not_lose_concurrent_creates_through_differently_spelled_paths() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::create_dir_all(dir.path().join("sub")).expect("should create sub dir");
        let spellings = vec![
            dir.path().join("books.json"),
            dir.path().join(".").join("books.json"),
            dir.path().join("sub").join("..").join("books.json"),
        ];
        let mut handles = vec![];
        for i in 0..12 {
            let path = spellings[i as usize % spellings.len()].clone();
            handles.push(tokio::spawn(async move {
                let repo = JsonBookRepository::new(&path);
                repo.create(&BookEntity::new(format!("b{}", i).as_str(), "book", 2000 + i, i)).await
            }));
        }
        for handle in handles {
            handle.await.expect("task should join").expect("should create");
        }
        assert_eq!(12, JsonBookRepository::new(&spellings[0]).all().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_share_lock_for_relative_and_dotted_paths() {
        let plain = JsonBookRepository::new("data/books.json");
        let dotted = JsonBookRepository::new("./data/books.json");
        assert!(std::sync::Arc::ptr_eq(&plain.lock, &dotted.lock));

        let (dir, repo) = temp_repo();
        let detour = JsonBookRepository::new(dir.path().join("sub").join("..").join(".").join("books.json"));
        assert!(std::sync::Arc::ptr_eq(&repo.lock, &detour.lock));
    }
}
