//! embedded-graphics integration
//!
//! Pixel surfaces are `DrawTarget`s, so shapes, fonts and images from the
//! embedded-graphics ecosystem draw straight into the back buffer.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU8;
use embedded_graphics::pixelcolor::{IntoStorage, PixelColor, Rgb565};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};

use super::{Canvas, Canvas16, Canvas8};
use crate::driver::Driver;

/// A palette index, the color type of `Canvas8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PaletteIndex(pub u8);

impl PixelColor for PaletteIndex {
    type Raw = RawU8;
}

impl From<u8> for PaletteIndex {
    fn from(index: u8) -> Self {
        PaletteIndex(index)
    }
}

fn canvas_size(canvas: &impl Canvas) -> Size {
    let (w, h) = canvas.dimensions();
    Size::new(u32::from(w), u32::from(h))
}

impl<D: Driver> OriginDimensions for Canvas16<D> {
    fn size(&self) -> Size {
        canvas_size(self)
    }
}

impl<D: Driver> DrawTarget for Canvas16<D> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color.into_storage());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into_storage());
        Ok(())
    }
}

impl<D: Driver> OriginDimensions for Canvas8<D> {
    fn size(&self) -> Size {
        canvas_size(self)
    }
}

impl<D: Driver> DrawTarget for Canvas8<D> {
    type Color = PaletteIndex;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, PaletteIndex(index)) in pixels {
            self.set_pixel(x, y, index);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::RgbColor;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;
    use crate::core::{Pinout, Resolution};
    use crate::driver::MockDriver;
    use crate::surface::color565;

    #[test]
    fn test_rectangle_on_canvas16() {
        let mut canvas = Canvas16::new(
            MockDriver::new(),
            Pinout::default(),
            Resolution::R320x180,
            false,
        );
        canvas.start().unwrap();
        assert_eq!(canvas.size(), Size::new(320, 180));

        Rectangle::new(Point::new(2, 3), Size::new(4, 5))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut canvas)
            .unwrap();

        let red = color565(255, 0, 0);
        assert_eq!(canvas.pixel(2, 3), Some(red));
        assert_eq!(canvas.pixel(5, 7), Some(red));
        assert_eq!(canvas.pixel(6, 7), Some(0));
        assert_eq!(canvas.pixel(1, 3), Some(0));
    }

    #[test]
    fn test_clipped_drawing_on_canvas8() {
        let mut canvas = Canvas8::new(
            MockDriver::new(),
            Pinout::default(),
            Resolution::R320x180,
            false,
        );
        canvas.start().unwrap();

        Rectangle::new(Point::new(-10, -10), Size::new(12, 12))
            .into_styled(PrimitiveStyle::with_fill(PaletteIndex(9)))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(canvas.pixel(0, 0), Some(9));
        assert_eq!(canvas.pixel(1, 1), Some(9));
        assert_eq!(canvas.pixel(2, 2), Some(0));

        canvas.clear(PaletteIndex(4)).unwrap();
        assert!(canvas.buffer().unwrap().iter().all(|&p| p == 4));
    }
}
