//! Local edit drafts and the editor state machine.

use shopdeck_products::{ImageUpload, Product, ProductForm, ProductId};

use crate::preview::Preview;

/// Editable text fields of a draft.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Category,
    Price,
    Stock,
    Description,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Name,
        DraftField::Category,
        DraftField::Price,
        DraftField::Stock,
        DraftField::Description,
    ];

    /// Multipart field name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Category => "category",
            DraftField::Price => "price",
            DraftField::Stock => "stock",
            DraftField::Description => "description",
        }
    }
}

/// Unsaved edits: raw field text plus staged files and their previews.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    name: String,
    category: String,
    price: String,
    stock: String,
    description: String,
    staged: Vec<ImageUpload>,
    previews: Vec<Preview>,
}

impl ProductDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seed a draft from a stored product. Its image URLs become remote previews.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name().to_string(),
            category: product.category().to_string(),
            price: product.price().normalize().to_string(),
            stock: product.stock().to_string(),
            description: product.description().to_string(),
            staged: Vec::new(),
            previews: product
                .images()
                .iter()
                .cloned()
                .map(Preview::Remote)
                .collect(),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Category => &self.category,
            DraftField::Price => &self.price,
            DraftField::Stock => &self.stock,
            DraftField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Category => self.category = value,
            DraftField::Price => self.price = value,
            DraftField::Stock => self.stock = value,
            DraftField::Description => self.description = value,
        }
    }

    pub fn staged(&self) -> &[ImageUpload] {
        &self.staged
    }

    pub fn previews(&self) -> &[Preview] {
        &self.previews
    }

    /// Install new staged files and their previews. Release the old previews
    /// with [`Self::take_previews`] first.
    pub(crate) fn stage_images(&mut self, staged: Vec<ImageUpload>, previews: Vec<Preview>) {
        self.staged = staged;
        self.previews = previews;
    }

    pub(crate) fn take_previews(&mut self) -> Vec<Preview> {
        std::mem::take(&mut self.previews)
    }

    /// Package the draft as one mutation: every text field, plus the staged
    /// files when there are any.
    pub fn to_form(&self) -> ProductForm {
        let mut form = ProductForm::default();
        for field in DraftField::ALL {
            form.set_field(field.wire_name(), self.get(field).to_string());
        }
        form.images = self.staged.clone();
        form
    }
}

/// What the editor is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Closed,
    Creating(ProductDraft),
    Editing { id: ProductId, draft: ProductDraft },
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorState::Closed)
    }

    pub fn draft(&self) -> Option<&ProductDraft> {
        match self {
            EditorState::Closed => None,
            EditorState::Creating(draft) | EditorState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        match self {
            EditorState::Closed => None,
            EditorState::Creating(draft) | EditorState::Editing { draft, .. } => Some(draft),
        }
    }

    /// The product being edited, if any.
    pub fn target(&self) -> Option<ProductId> {
        match self {
            EditorState::Editing { id, .. } => Some(*id),
            _ => None,
        }
    }
}
