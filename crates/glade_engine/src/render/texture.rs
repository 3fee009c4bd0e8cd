//! Texture objects with deferred pixel upload

use log::debug;

use super::api::{GraphicsSurface, TextureHandle};
use super::RenderResult;

/// Solid-color pixel shown until the real image arrives
const PLACEHOLDER_PIXEL: [u8; 4] = [170, 170, 255, 255];

/// A texture whose pixel data arrives asynchronously
///
/// `begin_load` returns immediately with a 1x1 placeholder uploaded, so the
/// draw pass can render any number of frames before the image is decoded.
/// The embedder's completion path calls [`finish_load`](Self::finish_load)
/// with the decoded pixels. There is no cancellation for in-flight loads.
#[derive(Debug)]
pub struct Texture {
    handle: TextureHandle,
    source: String,
    resident: bool,
}

impl Texture {
    /// Create the texture object and upload the placeholder
    pub fn begin_load(
        surface: &mut dyn GraphicsSurface,
        source: impl Into<String>,
    ) -> RenderResult<Self> {
        let source = source.into();
        let handle = surface.create_texture()?;
        surface.bind_texture(handle);
        surface.upload_texture_rgba(1, 1, &PLACEHOLDER_PIXEL);
        debug!("texture '{source}' created with placeholder");

        Ok(Self {
            handle,
            source,
            resident: false,
        })
    }

    /// Upload the decoded image and generate mipmaps
    pub fn finish_load(
        &mut self,
        surface: &mut dyn GraphicsSurface,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        surface.bind_texture(self.handle);
        surface.upload_texture_rgba(width, height, pixels);
        surface.generate_mipmaps();
        self.resident = true;
        debug!("texture '{}' resident at {width}x{height}", self.source);
    }

    /// The backend texture handle
    pub const fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// The source path or URL the texture was requested from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the real image has been uploaded
    pub const fn is_resident(&self) -> bool {
        self.resident
    }
}
