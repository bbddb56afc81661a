//! Content domain: data-driven combat tuning and objectives from RON files.

mod data;
mod loader;
#[cfg(test)]
mod tests;
mod validation;

pub use data::*;
pub use loader::{ContentLoadError, load_all_content};

use bevy::prelude::*;
use std::path::Path;

/// Directory holding the RON content files, relative to the working dir.
pub const CONTENT_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatDefaults>()
            .init_resource::<ObjectiveCatalog>()
            .add_systems(PreStartup, load_content);
    }
}

fn load_content(mut commands: Commands) {
    let (defaults, catalog, errors) = load_all_content(Path::new(CONTENT_DIR));

    for error in &errors {
        error!("{}", error);
    }
    if errors.is_empty() {
        info!(
            "Content loaded: schema v{}, {} objectives, {} enemy spawns",
            defaults.schema_version,
            catalog.0.len(),
            defaults.arena.enemy_spawns.len()
        );
    } else {
        warn!(
            "{} content error(s); affected files fell back to built-in defaults",
            errors.len()
        );
    }

    commands.insert_resource(defaults);
    commands.insert_resource(catalog);
}
