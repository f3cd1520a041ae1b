use std::collections::HashSet;

/// Container id the logo strip mounts into.
pub const LOGO_CONTAINER: &str = "logoContainer";

/// Named regions a front end has laid out. Components look their mount
/// point up here and stay inert when it is missing.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    ids: HashSet<String>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}
