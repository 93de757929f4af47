//! Category administration with image-file lifecycle.
//!
//! Every category owns at most one file under `categories/` in the public
//! store. A replacement file is written and the record saved before the old
//! file is removed, so a failed update never leaves a record pointing at a
//! missing file. File deletions are best-effort and never fail an operation.

use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};
use crate::repositories::CategoryStore;
use crate::storage::{
    CATEGORY_ASSET_DIR, FileStore, ImageRules, ImageUpload, TOKEN_LENGTH, TokenGenerator,
};

/// Submitted category fields. `image` is required on create and optional on
/// update.
#[derive(Debug, Clone, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl CategoryInput {
    /// Trims name and description, then checks them.
    fn normalized(mut self) -> AppResult<Self> {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

/// Category operations over injected persistence, file and token
/// collaborators. Cloning shares the collaborators.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
    files: Arc<dyn FileStore>,
    tokens: Arc<dyn TokenGenerator>,
    rules: ImageRules,
}

impl CategoryService {
    pub fn new(
        store: Arc<dyn CategoryStore>,
        files: Arc<dyn FileStore>,
        tokens: Arc<dyn TokenGenerator>,
        rules: ImageRules,
    ) -> Self {
        Self {
            store,
            files,
            tokens,
            rules,
        }
    }

    pub fn image_rules(&self) -> ImageRules {
        self.rules
    }

    /// All categories, ordered by id.
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.store.list_all().await
    }

    /// Stores the image under a fresh name, then inserts the record.
    ///
    /// # Errors
    ///
    /// - `Validation` when a field or the image is rejected; nothing is written
    /// - `Storage` when the image cannot be written; no record is created
    pub async fn create(&self, input: CategoryInput) -> AppResult<Category> {
        let input = input.normalized()?;
        let upload = input
            .image
            .as_ref()
            .ok_or_else(|| AppError::validation("image", "The image field is required."))?;
        self.rules.validate(upload)?;

        let image = self.store_image(upload).await?;

        let new_category = NewCategory {
            name: input.name,
            description: input.description,
            image: Some(image.clone()),
        };

        match self.store.create(new_category).await {
            Ok(category) => Ok(category),
            Err(e) => {
                self.discard_file(&image).await;
                Err(e)
            }
        }
    }

    /// Fetches a category for editing.
    ///
    /// # Errors
    ///
    /// `NotFound` when no category has this id.
    pub async fn edit(&self, id: i32) -> AppResult<Category> {
        self.find(id).await
    }

    /// Replaces name and description and, when an image is supplied, swaps
    /// the stored file.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no category has this id
    /// - `Validation` when input is rejected; nothing changes
    /// - `Storage` when the new image cannot be written; nothing changes
    pub async fn update(&self, id: i32, input: CategoryInput) -> AppResult<Category> {
        let mut category = self.find(id).await?;

        let input = input.normalized()?;
        if let Some(upload) = input.image.as_ref() {
            self.rules.validate(upload)?;
        }

        category.name = input.name;
        category.description = input.description;

        let mut replaced = None;
        if let Some(upload) = input.image.as_ref() {
            let image = self.store_image(upload).await?;
            replaced = std::mem::replace(&mut category.image, Some(image));
        }

        let saved = match self.store.save(&category).await {
            Ok(saved) => saved,
            Err(e) => {
                if input.image.is_some() {
                    if let Some(new_image) = category.image.as_deref() {
                        self.discard_file(new_image).await;
                    }
                }
                return Err(e);
            }
        };

        if let Some(old_image) = replaced {
            if saved.image.as_deref() != Some(old_image.as_str()) {
                self.discard_file(&old_image).await;
            }
        }

        Ok(saved)
    }

    /// Resolves the category, then removes it as [`Self::destroy_category`]
    /// does.
    ///
    /// # Errors
    ///
    /// `NotFound` when no category has this id, including one already
    /// destroyed.
    pub async fn destroy(&self, id: i32) -> AppResult<()> {
        let category = self.find(id).await?;
        self.destroy_category(category).await
    }

    /// Removes every menu association and the record, then the image file.
    ///
    /// The file outlives a failed delete so the row never points at a
    /// missing image.
    pub async fn destroy_category(&self, category: Category) -> AppResult<()> {
        self.store.detach_menus(category.id).await?;

        if self.store.delete_by_id(category.id).await? == 0 {
            return Err(AppError::not_found("Category", category.id));
        }

        if let Some(image) = category.image.as_deref() {
            self.discard_file(image).await;
        }
        Ok(())
    }

    async fn find(&self, id: i32) -> AppResult<Category> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))
    }

    /// Writes an already validated upload as `categories/<token>.<ext>`.
    async fn store_image(&self, upload: &ImageUpload) -> AppResult<String> {
        let filename = format!(
            "{}.{}",
            self.tokens.generate(TOKEN_LENGTH),
            upload.original_extension
        );
        self.files
            .write(CATEGORY_ASSET_DIR, &filename, &upload.bytes)
            .await
    }

    async fn discard_file(&self, path: &str) {
        // The store reports its own failures; a leftover file is harmless.
        let _ = self.files.delete(path).await;
    }
}
