use crate::buffer::PixelBuffer;
use crate::error::{StrataError, StrataResult};

/// Stable identity of one layer. Handles stay valid across reordering and
/// are never reused within one stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(u64);

#[derive(Debug)]
struct Layer {
    id: LayerId,
    buffer: PixelBuffer,
}

/// Ordered stack of equally-shaped pixel buffers. Front of the sequence is
/// the top of the stack (nearest the viewer); `add` inserts at the top.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Inserts `buffer` at the top. Every layer in one stack must share one
    /// shape.
    pub fn add(&mut self, buffer: PixelBuffer) -> StrataResult<LayerId> {
        if let Some(existing) = self.layers.first() {
            if !existing.buffer.same_shape(&buffer) {
                return Err(StrataError::dimension_mismatch(format!(
                    "layer {}x{} does not match stack {}x{}",
                    buffer.width(),
                    buffer.height(),
                    existing.buffer.width(),
                    existing.buffer.height()
                )));
            }
        }
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.insert(0, Layer { id, buffer });
        Ok(id)
    }

    fn position(&self, id: LayerId) -> StrataResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StrataError::layer_not_found(format!("id {}", id.0)))
    }

    /// Swaps the layer with its neighbor toward the top. No-op if already
    /// topmost.
    pub fn move_up(&mut self, id: LayerId) -> StrataResult<()> {
        let i = self.position(id)?;
        if i > 0 {
            self.layers.swap(i - 1, i);
        }
        Ok(())
    }

    /// Swaps the layer with its neighbor toward the bottom. No-op if already
    /// bottommost.
    pub fn move_down(&mut self, id: LayerId) -> StrataResult<()> {
        let i = self.position(id)?;
        if i + 1 < self.layers.len() {
            self.layers.swap(i, i + 1);
        }
        Ok(())
    }

    /// Returns the layer at 1-based `position`, counted from the top.
    pub fn get(&self, position: usize) -> StrataResult<&PixelBuffer> {
        let layer = position
            .checked_sub(1)
            .and_then(|i| self.layers.get(i))
            .ok_or_else(|| StrataError::layer_not_found(format!("position {position}")))?;
        Ok(&layer.buffer)
    }

    pub fn get_mut(&mut self, position: usize) -> StrataResult<&mut PixelBuffer> {
        let layer = position
            .checked_sub(1)
            .and_then(|i| self.layers.get_mut(i))
            .ok_or_else(|| StrataError::layer_not_found(format!("position {position}")))?;
        Ok(&mut layer.buffer)
    }

    pub fn layer(&self, id: LayerId) -> StrataResult<&PixelBuffer> {
        let i = self.position(id)?;
        Ok(&self.layers[i].buffer)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> StrataResult<&mut PixelBuffer> {
        let i = self.position(id)?;
        Ok(&mut self.layers[i].buffer)
    }

    pub fn top(&self) -> Option<&PixelBuffer> {
        self.layers.first().map(|l| &l.buffer)
    }

    pub fn top_mut(&mut self) -> Option<&mut PixelBuffer> {
        self.layers.first_mut().map(|l| &mut l.buffer)
    }

    /// Layers top to bottom, paired with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &PixelBuffer)> {
        self.layers.iter().map(|l| (l.id, &l.buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;

    fn buf(fill: u8) -> PixelBuffer {
        PixelBuffer::filled(2, 2, Pixel::new(fill, fill, fill)).unwrap()
    }

    #[test]
    fn add_inserts_at_top() {
        let mut stack = LayerStack::new();
        stack.add(buf(1)).unwrap();
        stack.add(buf(2)).unwrap();
        assert_eq!(stack.get(1).unwrap().get(0, 0).r, 2);
        assert_eq!(stack.get(2).unwrap().get(0, 0).r, 1);
    }

    #[test]
    fn add_rejects_shape_mismatch() {
        let mut stack = LayerStack::new();
        stack.add(buf(1)).unwrap();
        let other = PixelBuffer::new(3, 2).unwrap();
        assert!(matches!(
            stack.add(other),
            Err(StrataError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn identity_survives_reordering() {
        let mut stack = LayerStack::new();
        let bottom = stack.add(buf(1)).unwrap();
        let top = stack.add(buf(2)).unwrap();

        // Identical pixel data must not confuse identity lookup.
        let twin = stack.add(buf(2)).unwrap();
        assert_ne!(top, twin);

        stack.move_down(twin).unwrap();
        stack.move_down(twin).unwrap();
        assert_eq!(stack.layer(twin).unwrap().get(0, 0).r, 2);
        assert_eq!(stack.get(3).unwrap().get(0, 0).r, 2);
        assert_eq!(stack.layer(bottom).unwrap().get(0, 0).r, 1);

        stack.move_up(bottom).unwrap();
        assert_eq!(stack.get(1).unwrap().get(0, 0).r, 2);
        assert_eq!(stack.get(2).unwrap().get(0, 0).r, 1);
    }

    #[test]
    fn moves_at_the_boundary_are_noops() {
        let mut stack = LayerStack::new();
        let a = stack.add(buf(1)).unwrap();
        let b = stack.add(buf(2)).unwrap();
        stack.move_up(b).unwrap();
        stack.move_down(a).unwrap();
        assert_eq!(stack.get(1).unwrap().get(0, 0).r, 2);
        assert_eq!(stack.get(2).unwrap().get(0, 0).r, 1);
    }

    #[test]
    fn lookups_miss_with_layer_not_found() {
        let mut stack = LayerStack::new();
        let id = stack.add(buf(1)).unwrap();
        assert!(matches!(stack.get(0), Err(StrataError::LayerNotFound(_))));
        assert!(matches!(stack.get(2), Err(StrataError::LayerNotFound(_))));
        let _ = id;

        let empty = LayerStack::new();
        assert!(matches!(empty.get(1), Err(StrataError::LayerNotFound(_))));
    }
}
