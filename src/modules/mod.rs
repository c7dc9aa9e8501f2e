pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod home;

use libris_kernel::ModuleRegistry;

use crate::catalog::Catalog;

/// Register every catalog module, sharing one catalog handle
pub fn registry(catalog: &Catalog) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(home::create_module(catalog.clone()));
    registry.register(authors::create_module(catalog.clone()));
    registry.register(books::create_module(catalog.clone()));
    registry.register(book_instances::create_module(catalog.clone()));
    registry.register(genres::create_module(catalog.clone()));
    registry
}
