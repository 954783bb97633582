use std::fmt::Debug;

/// Turns a content page (Markdown source) into the markup stored in configuration.
pub trait PageRenderer: Debug + Send + Sync {
    fn render(&self, source: &str) -> String;
}

/// Stores page sources unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct VerbatimRenderer;

impl PageRenderer for VerbatimRenderer {
    fn render(&self, source: &str) -> String {
        source.to_owned()
    }
}
