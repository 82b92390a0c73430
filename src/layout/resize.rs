use crate::window::{Geometry, Position, Size};

/// A live resize from the bottom-right handle. Only the size changes; the
/// window's origin stays where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub start_size: Size,
    pub pointer_start: Position,
}

impl ResizeDrag {
    pub fn new(start_size: Size, pointer_start: Position) -> Self {
        Self {
            start_size,
            pointer_start,
        }
    }

    pub fn size_for(&self, pointer: Position, min: Size) -> Size {
        let (dx, dy) = pointer.delta_from(self.pointer_start);
        apply_resize_delta(self.start_size, dx, dy, min)
    }
}

/// `start + delta`, never below `min` on either axis no matter how far the
/// pointer travels past the floor.
pub fn apply_resize_delta(start: Size, dx: i32, dy: i32, min: Size) -> Size {
    let grow = |base: u16, delta: i32, floor: u16| -> u16 {
        (base as i32)
            .saturating_add(delta)
            .clamp(floor as i32, u16::MAX as i32) as u16
    };
    Size {
        width: grow(start.width, dx, min.width),
        height: grow(start.height, dy, min.height),
    }
}

/// The square bottom-right handle of `geometry`.
pub fn resize_handle_for(geometry: Geometry, handle: u16) -> Geometry {
    let width = handle.min(geometry.size.width);
    let height = handle.min(geometry.size.height);
    Geometry {
        position: Position::new(
            geometry.right() - width as i32,
            geometry.bottom() - height as i32,
        ),
        size: Size::new(width, height),
    }
}
