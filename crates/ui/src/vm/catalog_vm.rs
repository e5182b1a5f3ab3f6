use phrasebook_core::model::{Manifest, PackUrl};
use services::Catalog;

pub const MANIFEST_LOAD_FAILED: &str = "Failed to load manifest";

/// UI-ready representation of a pack for the selection control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackOptionVm {
    /// Empty for the failure placeholder.
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogVm {
    pub options: Vec<PackOptionVm>,
    pub selected: Option<PackUrl>,
}

impl CatalogVm {
    /// Single disabled option shown when the manifest could not be loaded.
    #[must_use]
    pub fn load_failed() -> Self {
        Self {
            options: vec![PackOptionVm {
                value: String::new(),
                label: MANIFEST_LOAD_FAILED.to_string(),
                disabled: true,
            }],
            selected: None,
        }
    }

    #[must_use]
    pub fn selected_value(&self) -> &str {
        self.selected.as_ref().map_or("", PackUrl::as_str)
    }
}

#[must_use]
pub fn map_pack_options(manifest: &Manifest) -> Vec<PackOptionVm> {
    manifest
        .packs()
        .iter()
        .map(|pack| PackOptionVm {
            value: pack.url.as_str().to_string(),
            label: pack.name.clone(),
            disabled: false,
        })
        .collect()
}

#[must_use]
pub fn map_catalog(catalog: &Catalog) -> CatalogVm {
    CatalogVm {
        options: map_pack_options(&catalog.manifest),
        selected: catalog.selected.clone(),
    }
}
