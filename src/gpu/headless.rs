// In-memory graphics context: keeps texture bytes on the CPU and counts
// what a real context would have done.

use std::collections::HashMap;

use super::{GraphicsContext, GraphicsError, Quad, TextureHandle};

#[derive(Debug, Clone)]
pub struct StoredTexture {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct HeadlessContext {
    textures: HashMap<TextureHandle, Option<StoredTexture>>,
    next_id: u32,
    texture_limit: Option<usize>,
    pub allocations: usize,
    pub uploads: usize,
    pub draws: usize,
    pub frames: usize,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that refuses to create more than `limit` textures.
    pub fn with_texture_limit(limit: usize) -> Self {
        Self {
            texture_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&StoredTexture> {
        self.textures.get(&handle).and_then(Option::as_ref)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl GraphicsContext for HeadlessContext {
    fn create_texture(&mut self) -> Result<TextureHandle, GraphicsError> {
        if self.texture_limit.is_some_and(|limit| self.textures.len() >= limit) {
            return Err(GraphicsError::CreateTexture(format!(
                "texture limit of {} reached",
                self.textures.len()
            )));
        }
        self.next_id += 1;
        let handle = TextureHandle(self.next_id);
        self.textures.insert(handle, None);
        Ok(handle)
    }

    fn upload_texture(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        bytes: &[u8],
    ) -> Result<(), GraphicsError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(GraphicsError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let slot = self
            .textures
            .get_mut(&handle)
            .ok_or(GraphicsError::UnknownTexture(handle))?;
        match slot {
            Some(tex) if tex.width == width && tex.height == height => {
                tex.bytes.copy_from_slice(bytes);
            }
            _ => {
                *slot = Some(StoredTexture {
                    width,
                    height,
                    bytes: bytes.to_vec(),
                });
                self.allocations += 1;
            }
        }
        self.uploads += 1;
        Ok(())
    }

    fn bind_and_draw_quad(&mut self, handle: TextureHandle, _quad: &Quad) {
        if self.texture(handle).is_some() {
            self.draws += 1;
        }
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
