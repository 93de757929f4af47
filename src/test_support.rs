//! In-memory collaborators and fixtures shared by unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, header};

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};
use crate::repositories::CategoryStore;
use crate::services::CategoryService;
use crate::storage::{FileStore, ImageRules, ImageUpload, TokenGenerator};

pub fn timestamp() -> jiff_diesel::DateTime {
    jiff::civil::date(2024, 6, 1).at(12, 0, 0, 0).into()
}

fn with_magic(magic: &[u8], len: usize) -> Vec<u8> {
    let mut bytes = magic.to_vec();
    bytes.resize(len, 0);
    bytes
}

pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    with_magic(&[0xFF, 0xD8, 0xFF, 0xE0], len)
}

pub fn png_bytes(len: usize) -> Vec<u8> {
    with_magic(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], len)
}

pub fn gif_bytes(len: usize) -> Vec<u8> {
    with_magic(b"GIF89a", len)
}

pub fn jpeg_upload(len: usize) -> ImageUpload {
    ImageUpload::new(jpeg_bytes(len), "photo.jpg", Some("image/jpeg".to_string()))
}

pub fn png_upload(len: usize) -> ImageUpload {
    ImageUpload::new(png_bytes(len), "photo.png", Some("image/png".to_string()))
}

#[derive(Default)]
struct StoreState {
    rows: BTreeMap<i32, Category>,
    last_id: i32,
    menus: BTreeSet<(i32, i32)>,
    fail_create: bool,
    fail_save: bool,
    fail_delete: bool,
}

/// [`CategoryStore`] over a map, with switchable write failures.
#[derive(Default)]
pub struct InMemoryCategoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryCategoryStore {
    pub fn attach_menu(&self, category_id: i32, menu_id: i32) {
        self.state.lock().unwrap().menus.insert((category_id, menu_id));
    }

    pub fn menus_of(&self, category_id: i32) -> Vec<i32> {
        let state = self.state.lock().unwrap();
        state
            .menus
            .iter()
            .filter(|(c, _)| *c == category_id)
            .map(|(_, m)| *m)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn get(&self, id: i32) -> Option<Category> {
        self.state.lock().unwrap().rows.get(&id).cloned()
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn fail_save(&self, fail: bool) {
        self.state.lock().unwrap().fail_save = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.state.lock().unwrap().fail_delete = fail;
    }
}

fn store_failure(operation: &str) -> AppError {
    AppError::Database {
        operation: operation.to_string(),
        source: anyhow!("connection reset by peer"),
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>> {
        Ok(self.get(id))
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(store_failure("create category"));
        }

        state.last_id += 1;
        let category = Category {
            id: state.last_id,
            name: new_category.name,
            description: new_category.description,
            image: new_category.image,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        state.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn save(&self, category: &Category) -> AppResult<Category> {
        let mut state = self.state.lock().unwrap();
        if state.fail_save {
            return Err(store_failure("save category"));
        }

        match state.rows.get_mut(&category.id) {
            Some(row) => {
                *row = category.clone();
                Ok(row.clone())
            }
            None => Err(AppError::not_found("Category", category.id)),
        }
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete {
            return Err(store_failure("delete category"));
        }
        Ok(usize::from(state.rows.remove(&id).is_some()))
    }

    async fn list_all(&self) -> AppResult<Vec<Category>> {
        Ok(self.state.lock().unwrap().rows.values().cloned().collect())
    }

    async fn detach_menus(&self, category_id: i32) -> AppResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.menus.len();
        state.menus.retain(|(c, _)| *c != category_id);
        Ok(before - state.menus.len())
    }
}

/// [`FileStore`] over a map of relative path to contents.
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl InMemoryFileStore {
    pub fn put(&self, path: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
    }

    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn write(&self, directory: &str, filename: &str, bytes: &[u8]) -> AppResult<String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage("write file", anyhow!("no space left on device")));
        }
        let path = format!("{}/{}", directory, filename);
        self.put(&path, bytes);
        Ok(path)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

/// Deterministic tokens: `t000...1`, `t000...2`, ...
#[derive(Default)]
pub struct SequentialTokenGenerator {
    counter: AtomicUsize,
}

impl TokenGenerator for SequentialTokenGenerator {
    fn generate(&self, len: usize) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("t{:0>width$}", n, width = len.saturating_sub(1))
    }
}

/// A service wired to fresh in-memory collaborators.
pub struct TestHarness {
    pub service: CategoryService,
    pub store: Arc<InMemoryCategoryStore>,
    pub files: Arc<InMemoryFileStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCategoryStore::default());
        let files = Arc::new(InMemoryFileStore::default());
        let service = CategoryService::new(
            store.clone(),
            files.clone(),
            Arc::new(SequentialTokenGenerator::default()),
            ImageRules::default(),
        );

        Self {
            service,
            store,
            files,
        }
    }
}

const BOUNDARY: &str = "resto-admin-test-boundary";

/// Builder for `multipart/form-data` request bodies.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: Method, uri: &str) -> Request<Body> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.bytes))
            .unwrap()
    }
}

pub fn multipart_request(uri: &str, body: MultipartBody) -> Request<Body> {
    body.request(Method::POST, uri)
}
