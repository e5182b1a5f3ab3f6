mod catalog_vm;
mod study_vm;

pub use catalog_vm::{CatalogVm, MANIFEST_LOAD_FAILED, PackOptionVm, map_catalog, map_pack_options};
pub use study_vm::{
    CardVm, EntryListItemVm, MASKED_TRANSLATION, PACK_LOAD_FAILED, StudyIntent, StudyVm,
    filter_entries, map_entry_list, map_study,
};
