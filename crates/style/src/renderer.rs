use tracing::debug;

use crate::description::{LayerSpec, SourceSpec, StyleDescription, StyleError};
use crate::options::MapOptions;

/// Control surface of the map renderer.
///
/// The renderer owns the style; callers read a snapshot with [`Renderer::style`]
/// and write a whole description back with [`Renderer::set_style`].
pub trait Renderer {
    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<(), StyleError>;
    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), StyleError>;
    fn style(&self) -> StyleDescription;
    fn set_style(&mut self, style: StyleDescription);
    fn is_style_loaded(&self) -> bool;
}

/// What the renderer would do in response to a style change.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// A source URL appeared or changed; tiles get re-fetched from it.
    FetchTiles { source: String, url: String },
    /// The layer stack was (re)built.
    Restyle { layers: usize },
}

/// In-memory renderer for tests and the command line viewer.
///
/// It keeps the style, tracks load state and records the fetches a real
/// renderer would start, without drawing anything.
#[derive(Debug)]
pub struct HeadlessRenderer {
    options: MapOptions,
    style: StyleDescription,
    loaded: bool,
    style_writes: u64,
    commands: Vec<RenderCommand>,
}

impl HeadlessRenderer {
    pub fn new(options: MapOptions, base: StyleDescription) -> Self {
        Self {
            options,
            style: base,
            loaded: false,
            style_writes: 0,
            commands: Vec::new(),
        }
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Mark the base style as loaded.
    pub fn finish_loading(&mut self) {
        self.loaded = true;
        self.commands.push(RenderCommand::Restyle {
            layers: self.style.layers.len(),
        });
    }

    /// Number of `set_style` calls so far.
    pub fn style_writes(&self) -> u64 {
        self.style_writes
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Renderer for HeadlessRenderer {
    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<(), StyleError> {
        let url = source.url.clone();
        self.style.add_source(id, source)?;
        debug!(source = id, %url, "source added");
        self.commands.push(RenderCommand::FetchTiles {
            source: id.to_string(),
            url,
        });
        Ok(())
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), StyleError> {
        let id = layer.id.clone();
        self.style.add_layer(layer)?;
        debug!(layer = %id, "layer added");
        self.commands.push(RenderCommand::Restyle {
            layers: self.style.layers.len(),
        });
        Ok(())
    }

    fn style(&self) -> StyleDescription {
        self.style.clone()
    }

    fn set_style(&mut self, style: StyleDescription) {
        self.style_writes += 1;

        // Sources whose URL is new or changed are re-fetched; identical ones are kept.
        for (id, source) in &style.sources {
            let unchanged = self
                .style
                .source(id)
                .is_some_and(|old| old.url == source.url);
            if !unchanged {
                self.commands.push(RenderCommand::FetchTiles {
                    source: id.clone(),
                    url: source.url.clone(),
                });
            }
        }
        if style.layers != self.style.layers {
            self.commands.push(RenderCommand::Restyle {
                layers: style.layers.len(),
            });
        }

        self.style = style;
    }

    fn is_style_loaded(&self) -> bool {
        self.loaded
    }
}
