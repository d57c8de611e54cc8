// Bundled default configuration shipped with the application.

use std::collections::HashMap;

use crate::category::Category;
use crate::error::{ConfigError, Result};

static BUILTIN_MANIFEST: &str = include_str!("../../assets/default_config/module_list.txt");
static BUILTIN_README: &str = include_str!("../../assets/default_config/config_readme.txt");

/// Default documents embedded at compile time, one per (category, module id)
/// named in the module list.
static BUILTIN_RESOURCES: &[(Category, &str, &str)] = &[
    (
        Category::Definitions,
        "minecraft",
        include_str!("../../assets/default_config/definitions/minecraft.toml"),
    ),
    (
        Category::Definitions,
        "create",
        include_str!("../../assets/default_config/definitions/create.toml"),
    ),
    (
        Category::Definitions,
        "immersiveengineering",
        include_str!("../../assets/default_config/definitions/immersiveengineering.toml"),
    ),
    (
        Category::Definitions,
        "mekanism",
        include_str!("../../assets/default_config/definitions/mekanism.toml"),
    ),
    (
        Category::Customizations,
        "minecraft",
        include_str!("../../assets/default_config/customizations/minecraft.toml"),
    ),
    (
        Category::Customizations,
        "create",
        include_str!("../../assets/default_config/customizations/create.toml"),
    ),
    (
        Category::Customizations,
        "immersiveengineering",
        include_str!("../../assets/default_config/customizations/immersiveengineering.toml"),
    ),
    (
        Category::Customizations,
        "mekanism",
        include_str!("../../assets/default_config/customizations/mekanism.toml"),
    ),
];

/// The bundled defaults consumed during regeneration: the module manifest,
/// one default document per category and module id, and the readme text
/// attached to the version marker.
#[derive(Debug, Clone)]
pub struct DefaultBundle {
    manifest: Vec<String>,
    resources: HashMap<(Category, String), String>,
    readme: String,
}

impl DefaultBundle {
    /// The defaults shipped with this build.
    pub fn builtin() -> Self {
        let resources = BUILTIN_RESOURCES
            .iter()
            .map(|(category, id, text)| ((*category, id.to_string()), text.to_string()))
            .collect();
        DefaultBundle {
            manifest: parse_manifest(BUILTIN_MANIFEST),
            resources,
            readme: BUILTIN_README.to_string(),
        }
    }

    /// Construct a bundle from raw parts. Used by hosts that ship their own
    /// defaults and by tests.
    pub fn new(
        manifest: Vec<String>,
        resources: HashMap<(Category, String), String>,
        readme: String,
    ) -> Self {
        DefaultBundle {
            manifest,
            resources,
            readme,
        }
    }

    /// Module ids that must exist in each category, in manifest order.
    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }

    /// The explanatory text written as a comment header above the version
    /// marker.
    pub fn readme(&self) -> &str {
        &self.readme
    }

    /// Look up the default document for a category and module id. A missing
    /// resource is an export failure.
    pub fn resource(&self, category: Category, id: &str) -> Result<&str> {
        self.resources
            .get(&(category, id.to_string()))
            .map(String::as_str)
            .ok_or_else(|| {
                ConfigError::Export(format!("Missing bundled default document: {category}/{id}"))
            })
    }
}

/// One module id per non-empty line.
fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_manifest_skips_empty_lines() {
        let ids = parse_manifest("alpha\n\nbeta\n\n\ngamma\n");
        assert_eq!(ids, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_builtin_bundle_is_complete() {
        let bundle = DefaultBundle::builtin();
        assert!(!bundle.manifest().is_empty());
        for id in bundle.manifest() {
            for category in Category::ALL {
                let text = bundle.resource(category, id).unwrap();
                // every bundled default must itself be valid TOML
                text.parse::<toml::Table>().unwrap();
            }
        }
    }

    #[test]
    fn test_missing_resource_is_export_error() {
        let bundle = DefaultBundle::new(
            vec!["alpha".to_string()],
            HashMap::new(),
            String::new(),
        );
        let err = bundle.resource(Category::Definitions, "alpha").unwrap_err();
        assert!(matches!(err, ConfigError::Export(_)));
    }
}
