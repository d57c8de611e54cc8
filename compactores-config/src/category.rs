use std::fmt;

/// The closed set of configuration categories. Each category owns one
/// subdirectory under the config root and one group of bundled defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Definitions,
    Customizations,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Definitions, Category::Customizations];

    /// Subdirectory name under the config root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Definitions => "definitions",
            Category::Customizations => "customizations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
