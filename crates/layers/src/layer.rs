use style::description::LayerSpec;

/// A layer that can describe itself to the renderer.
pub trait Layer {
    fn id(&self) -> &str;
    fn spec(&self) -> LayerSpec;
}
