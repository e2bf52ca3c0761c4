// Graphics-context seam: the only calls the overlay makes into the GPU.
// Implementations must be driven from the thread that owns the context.

mod headless;

pub use headless::{HeadlessContext, StoredTexture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("texture creation failed: {0}")]
    CreateTexture(String),
    #[error("pixel buffer is {actual} bytes, a {width}x{height} texture needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureHandle),
}

/// Textured quad in screen space: four `X, Y, Z, U, V` vertices drawn as a
/// triangle fan, moved into place by `translation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub vertices: [[f32; 5]; 4],
    pub translation: [f32; 3],
}

pub trait GraphicsContext {
    fn create_texture(&mut self) -> Result<TextureHandle, GraphicsError>;
    /// Replaces the texture's RGBA contents. Storage is allocated on the
    /// first upload and reused while the dimensions stay the same.
    fn upload_texture(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        bytes: &[u8],
    ) -> Result<(), GraphicsError>;
    fn bind_and_draw_quad(&mut self, handle: TextureHandle, quad: &Quad);

    /// Clears the back buffer.
    fn begin_frame(&mut self) {}
    /// Presents the frame (buffer swap).
    fn end_frame(&mut self) {}
}
