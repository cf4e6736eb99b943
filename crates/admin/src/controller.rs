//! Product editor controller: drafts, submission, deletion.
//!
//! Mutations go to the gateway; on success the controller publishes a
//! [`CatalogEvent`] and leaves the list to re-fetch. Nothing is patched
//! locally, so the list only ever shows what the gateway returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use shopdeck_events::{Event, EventBus};
use shopdeck_products::{CatalogEvent, ImageUpload, MAX_IMAGES, Product, ProductId};

use crate::api::CatalogApi;
use crate::draft::{DraftField, EditorState, ProductDraft};
use crate::error::ClientError;
use crate::preview::{Preview, PreviewRegistry};

/// Result of a `submit()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Product),
    Updated(Product),
    /// Another submission was already in flight; this one was dropped.
    Ignored,
}

#[derive(Debug, Default)]
struct Editor {
    state: EditorState,
    previews: PreviewRegistry,
    /// Bumped every time a draft is opened, so a late submit response only
    /// closes the draft it was sent for.
    session: u64,
}

impl Editor {
    fn open(&mut self, state: EditorState) {
        self.close();
        self.state = state;
        self.session += 1;
    }

    fn close(&mut self) {
        let old = std::mem::take(&mut self.state);
        if let Some(mut draft) = into_draft(old) {
            let previews = draft.take_previews();
            self.previews.revoke_all(&previews);
        }
    }

    fn draft_mut(&mut self) -> Result<&mut ProductDraft, ClientError> {
        self.state.draft_mut().ok_or(ClientError::NoOpenDraft)
    }
}

fn into_draft(state: EditorState) -> Option<ProductDraft> {
    match state {
        EditorState::Closed => None,
        EditorState::Creating(draft) | EditorState::Editing { draft, .. } => Some(draft),
    }
}

/// Clears the in-flight flag however the submit future ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ProductsController<B> {
    api: Arc<dyn CatalogApi>,
    bus: B,
    editor: Mutex<Editor>,
    submitting: AtomicBool,
}

impl<B> core::fmt::Debug for ProductsController<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductsController")
            .field("submitting", &self.submitting.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<B> ProductsController<B>
where
    B: EventBus<CatalogEvent>,
{
    pub fn new(api: Arc<dyn CatalogApi>, bus: B) -> Self {
        Self {
            api,
            bus,
            editor: Mutex::new(Editor::default()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Snapshot of the editor.
    pub fn state(&self) -> EditorState {
        self.lock_editor().state.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Number of local previews not yet released.
    pub fn live_previews(&self) -> usize {
        self.lock_editor().previews.live_count()
    }

    pub fn begin_create(&self) {
        self.lock_editor()
            .open(EditorState::Creating(ProductDraft::empty()));
    }

    pub fn begin_edit(&self, product: &Product) {
        self.lock_editor().open(EditorState::Editing {
            id: product.id_typed(),
            draft: ProductDraft::from_product(product),
        });
    }

    pub fn set_field(&self, field: DraftField, value: impl Into<String>) -> Result<(), ClientError> {
        self.lock_editor().draft_mut()?.set(field, value);
        Ok(())
    }

    /// Stage files for upload, replacing anything staged before.
    pub fn set_images(&self, files: Vec<ImageUpload>) -> Result<(), ClientError> {
        let mut guard = self.lock_editor();
        let editor = &mut *guard;
        if !editor.state.is_open() {
            return Err(ClientError::NoOpenDraft);
        }
        if files.len() > MAX_IMAGES {
            return Err(ClientError::Validation(format!(
                "at most {MAX_IMAGES} images are allowed"
            )));
        }

        let old = editor.draft_mut()?.take_previews();
        editor.previews.revoke_all(&old);

        let previews: Vec<Preview> = files.iter().map(|f| editor.previews.create(f)).collect();
        editor.draft_mut()?.stage_images(files, previews);
        Ok(())
    }

    /// Send the open draft to the gateway.
    ///
    /// The draft stays open on failure so the user can correct it.
    pub async fn submit(&self) -> Result<SubmitOutcome, ClientError> {
        if self.submitting.swap(true, Ordering::AcqRel) {
            tracing::debug!("submit ignored: already in flight");
            return Ok(SubmitOutcome::Ignored);
        }
        let _in_flight = InFlight(&self.submitting);

        let (target, form, session) = {
            let editor = self.lock_editor();
            let draft = editor.state.draft().ok_or(ClientError::NoOpenDraft)?;
            let target = editor.state.target();
            if target.is_none() && draft.staged().is_empty() {
                return Err(ClientError::Validation(
                    "at least one image is required".to_string(),
                ));
            }
            (target, draft.to_form(), editor.session)
        };

        let (outcome, event) = match target {
            None => {
                let product = self.api.create_product(form).await?;
                let event = CatalogEvent::ProductCreated {
                    product_id: product.id_typed(),
                    occurred_at: Utc::now(),
                };
                (SubmitOutcome::Created(product), event)
            }
            Some(id) => {
                let product = self.api.update_product(id, form).await?;
                let event = CatalogEvent::ProductUpdated {
                    product_id: id,
                    occurred_at: Utc::now(),
                };
                (SubmitOutcome::Updated(product), event)
            }
        };

        {
            let mut editor = self.lock_editor();
            if editor.session == session {
                editor.close();
            }
        }

        self.publish(event);
        Ok(outcome)
    }

    /// Close the draft without sending anything.
    pub fn cancel(&self) {
        self.lock_editor().close();
    }

    /// Delete a product. The caller is responsible for confirming first.
    pub async fn remove(&self, id: ProductId) -> Result<(), ClientError> {
        self.api.delete_product(id).await?;
        self.publish(CatalogEvent::ProductDeleted {
            product_id: id,
            occurred_at: Utc::now(),
        });
        Ok(())
    }

    fn publish(&self, event: CatalogEvent) {
        let product_id = event.product_id();
        let event_type = event.event_type();
        if let Err(e) = self.bus.publish(event) {
            // The mutation itself succeeded; the list just won't know yet.
            tracing::warn!(%product_id, event_type, error = ?e, "failed to publish catalog invalidation");
            return;
        }
        tracing::debug!(%product_id, event_type, "catalog invalidation published");
    }

    fn lock_editor(&self) -> MutexGuard<'_, Editor> {
        self.editor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
