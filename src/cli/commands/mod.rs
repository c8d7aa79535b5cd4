pub mod category;
pub mod config;
pub mod summary;
pub mod system;
pub mod transaction;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command in the order `help` lists them.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        summary::definitions(),
        transaction::definitions(),
        category::definitions(),
        config::definitions(),
        system::maintenance_definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}
