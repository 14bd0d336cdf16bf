use crate::color::Rgba;

/// A 2-D drawing target in logical pixels. The field clears and fully
/// redraws it every frame; there is no partial update.
pub trait Surface {
    /// Drawable size as (width, height)
    fn size(&self) -> (f32, f32);

    fn clear(&mut self);

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    /// One logical pixel wide line from (x0, y0) to (x1, y1)
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba);
}
