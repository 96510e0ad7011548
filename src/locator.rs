use std::fmt;

/// Server-side query mini-syntax addressing a single resource, e.g. `id:42`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    /// Locate a resource by its ID
    pub fn id(id: impl fmt::Display) -> Self {
        Self(format!("id:{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
