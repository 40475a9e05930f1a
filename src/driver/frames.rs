//! In-memory frame buffer storage shared by the bundled drivers

use std::mem;

use bytemuck::Pod;

use super::{InitParams, Mode};

/// One or two frame buffers plus an optional palette
///
/// Buffers are stored as `u16` words so they can be viewed as either
/// `u8` or `u16` elements without alignment trouble.
#[derive(Debug, Clone)]
pub(crate) struct FrameStore {
    params: InitParams,
    buffers: Vec<Vec<u16>>,
    back: usize,
    palette: Option<Box<[u32; 256]>>,
}

impl FrameStore {
    pub fn new(params: &InitParams) -> Self {
        let bytes = params.element_count() * params.mode.bytes_per_element();
        let words = bytes.div_ceil(2);
        let count = if params.double_buffered { 2 } else { 1 };
        Self {
            params: *params,
            buffers: (0..count).map(|_| vec![0u16; words]).collect(),
            back: 0,
            palette: (params.mode == Mode::Palette).then(|| Box::new([0u32; 256])),
        }
    }

    pub fn params(&self) -> &InitParams {
        &self.params
    }

    fn front_index(&self) -> usize {
        if self.buffers.len() > 1 {
            1 - self.back
        } else {
            self.back
        }
    }

    fn view<T: Pod>(&self, index: usize) -> Option<&[T]> {
        if mem::size_of::<T>() != self.params.mode.bytes_per_element() {
            return None;
        }
        let words = self.buffers.get(index)?;
        bytemuck::try_cast_slice::<u16, T>(words)
            .ok()?
            .get(..self.params.element_count())
    }

    pub fn back<T: Pod>(&self) -> Option<&[T]> {
        self.view(self.back)
    }

    pub fn back_mut<T: Pod>(&mut self) -> Option<&mut [T]> {
        if mem::size_of::<T>() != self.params.mode.bytes_per_element() {
            return None;
        }
        let count = self.params.element_count();
        let words = self.buffers.get_mut(self.back)?;
        bytemuck::try_cast_slice_mut::<u16, T>(words)
            .ok()?
            .get_mut(..count)
    }

    /// The buffer currently streamed to the output
    pub fn front<T: Pod>(&self) -> Option<&[T]> {
        self.view(self.front_index())
    }

    pub fn palette_mut(&mut self) -> Option<&mut [u32; 256]> {
        self.palette.as_deref_mut()
    }

    /// Exchange front and back; optionally carry the new front forward
    pub fn flip(&mut self, copy_framebuffer: bool) {
        if self.buffers.len() < 2 {
            return;
        }
        self.back = 1 - self.back;
        if copy_framebuffer {
            let (first, second) = self.buffers.split_at_mut(1);
            if self.back == 0 {
                first[0].copy_from_slice(&second[0]);
            } else {
                second[0].copy_from_slice(&first[0]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pinout;

    fn params(mode: Mode, double_buffered: bool) -> InitParams {
        InitParams {
            width: 5,
            height: 3,
            mode,
            double_buffered,
            pinout: Pinout::default(),
        }
    }

    #[test]
    fn test_element_views() {
        let mut store = FrameStore::new(&params(Mode::Palette, false));
        assert_eq!(store.back::<u8>().map(|b| b.len()), Some(15));
        assert!(store.back::<u16>().is_none());
        assert!(store.palette_mut().is_some());

        let store = FrameStore::new(&params(Mode::Rgb565, false));
        assert_eq!(store.back::<u16>().map(|b| b.len()), Some(15));
        assert!(store.back::<u8>().is_none());
    }

    #[test]
    fn test_single_buffer_front_is_back() {
        let mut store = FrameStore::new(&params(Mode::Rgb565, false));
        store.back_mut::<u16>().unwrap()[0] = 0xBEEF;
        assert_eq!(store.front::<u16>().unwrap()[0], 0xBEEF);
        store.flip(true);
        assert_eq!(store.back::<u16>().unwrap()[0], 0xBEEF);
    }

    #[test]
    fn test_flip_exchanges_buffers() {
        let mut store = FrameStore::new(&params(Mode::Rgb565, true));
        store.back_mut::<u16>().unwrap()[0] = 1;
        store.flip(false);
        assert_eq!(store.front::<u16>().unwrap()[0], 1);
        assert_eq!(store.back::<u16>().unwrap()[0], 0);

        store.back_mut::<u16>().unwrap()[0] = 2;
        store.flip(true);
        assert_eq!(store.front::<u16>().unwrap()[0], 2);
        assert_eq!(store.back::<u16>().unwrap()[0], 2);
    }
}
