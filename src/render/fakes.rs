use crate::error::ExtractError;
use crate::pdf::{PageRasterizer, Rasterizer, SourceDocument};
use image::{Rgb, RgbImage};
use std::sync::Mutex;

/// Paints every page a flat colour, optionally faulting on one page.
#[derive(Default)]
pub struct SolidRasterizer {
    pub fail_on: Option<u32>,
    pub calls: Mutex<Vec<(u32, f32)>>,
    pub opens: Mutex<u32>,
}

impl SolidRasterizer {
    pub fn failing_on(page: u32) -> Self {
        SolidRasterizer {
            fail_on: Some(page),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(u32, f32)> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times a document was loaded
    pub fn opens(&self) -> u32 {
        *self.opens.lock().unwrap()
    }
}

impl Rasterizer for SolidRasterizer {
    fn open<'a>(
        &'a self,
        _source: &'a SourceDocument,
    ) -> Result<Box<dyn PageRasterizer + 'a>, ExtractError> {
        *self.opens.lock().unwrap() += 1;
        Ok(Box::new(SolidPages { owner: self }))
    }
}

struct SolidPages<'a> {
    owner: &'a SolidRasterizer,
}

impl PageRasterizer for SolidPages<'_> {
    fn rasterize(&mut self, page: u32, scale: f32) -> Result<RgbImage, ExtractError> {
        self.owner.calls.lock().unwrap().push((page, scale));
        if self.owner.fail_on == Some(page) {
            return Err(ExtractError::page(page, "simulated rasterization fault"));
        }
        Ok(RgbImage::from_pixel(8, 6, Rgb([200, (page * 10) as u8, 40])))
    }
}
