// A screen-positioned quad backed by one GPU texture.

use crate::gpu::{GraphicsContext, GraphicsError, Quad, TextureHandle};

/// Owns exactly one texture for its whole life. The texture is created on
/// the first [`write`](TextureWidget::write) and re-uploaded afterwards.
#[derive(Debug)]
pub struct TextureWidget {
    pub x: f32,
    pub y: f32,
    width: u32,
    height: u32,
    quad: Quad,
    texture: Option<TextureHandle>,
}

impl TextureWidget {
    /// `(x, y)` is the quad's top-left corner in a y-up screen space, so the
    /// quad spans `y - height ..= y`.
    pub fn setup(x: f32, y: f32, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let quad = Quad {
            vertices: [
                [0.0, h, 0.0, 0.0, 0.0],
                [w, h, 0.0, 1.0, 0.0],
                [w, 0.0, 0.0, 1.0, 1.0],
                [0.0, 0.0, 0.0, 0.0, 1.0],
            ],
            translation: [x, y - h, 0.0],
        };
        Self {
            x,
            y,
            width,
            height,
            quad,
            texture: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Uploads a full RGBA frame. The buffer must be exactly
    /// `width * height * 4` bytes; a wrong size is rejected, never resized.
    pub fn write(&mut self, ctx: &mut dyn GraphicsContext, bytes: &[u8]) -> Result<(), GraphicsError> {
        let expected = self.width as usize * self.height as usize * 4;
        if bytes.len() != expected {
            return Err(GraphicsError::SizeMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: bytes.len(),
            });
        }
        let handle = match self.texture {
            Some(handle) => handle,
            None => {
                let handle = ctx.create_texture()?;
                self.texture = Some(handle);
                handle
            }
        };
        ctx.upload_texture(handle, self.width, self.height, bytes)
    }

    /// Draws the quad; a widget that was never written draws nothing.
    pub fn draw(&self, ctx: &mut dyn GraphicsContext) {
        if let Some(handle) = self.texture {
            ctx.bind_and_draw_quad(handle, &self.quad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::HeadlessContext;

    #[test]
    fn texture_is_created_once_and_reused() {
        let mut ctx = HeadlessContext::new();
        let mut widget = TextureWidget::setup(20.0, 732.0, 4, 2);
        assert!(widget.texture().is_none());

        widget.write(&mut ctx, &[1; 32]).unwrap();
        let handle = widget.texture().unwrap();
        widget.write(&mut ctx, &[2; 32]).unwrap();

        assert_eq!(widget.texture(), Some(handle));
        assert_eq!(ctx.texture_count(), 1);
        assert_eq!(ctx.allocations, 1);
        assert_eq!(ctx.uploads, 2);
        assert_eq!(ctx.texture(handle).unwrap().bytes, vec![2; 32]);
    }

    #[test]
    fn wrong_size_is_rejected() {
        let mut ctx = HeadlessContext::new();
        let mut widget = TextureWidget::setup(0.0, 0.0, 4, 2);
        let err = widget.write(&mut ctx, &[0; 31]).unwrap_err();
        assert!(matches!(err, GraphicsError::SizeMismatch { expected: 32, actual: 31, .. }));
        assert!(widget.texture().is_none());
    }

    #[test]
    fn draw_before_write_is_a_no_op() {
        let mut ctx = HeadlessContext::new();
        let widget = TextureWidget::setup(0.0, 0.0, 1, 1);
        widget.draw(&mut ctx);
        assert_eq!(ctx.draws, 0);
    }

    #[test]
    fn quad_is_translated_to_its_top_left() {
        let widget = TextureWidget::setup(20.0, 732.0, 300, 200);
        assert_eq!(widget.quad().translation, [20.0, 532.0, 0.0]);
        assert_eq!(widget.quad().vertices[2], [300.0, 0.0, 0.0, 1.0, 1.0]);
    }
}
