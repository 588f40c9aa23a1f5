use crate::error::OcrError;
use image::{GrayImage, Luma};

/// Contrast limit, as a multiple of the mean histogram bin height
const CLIP_LIMIT: f32 = 2.0;
/// Tiles per axis
const GRID_SIZE: u32 = 8;

/// Contrast-limited adaptive histogram equalization (CLAHE)
///
/// The image is split into a grid of tiles, each tile gets its own clipped
/// equalization curve, and every pixel is mapped through a bilinear blend of
/// the four nearest tile curves so tile borders stay invisible.
pub fn apply(image: GrayImage) -> Result<GrayImage, OcrError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(image);
    }

    let tile_w = width.div_ceil(GRID_SIZE.min(width));
    let tile_h = height.div_ceil(GRID_SIZE.min(height));
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts.push(tile_lut(&image, x0, y0, x1, y1));
        }
    }

    let lut_at = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];

    let equalized = GrayImage::from_fn(width, height, |x, y| {
        let (tx0, tx1, wx) = neighbours(x, tile_w, tiles_x);
        let (ty0, ty1, wy) = neighbours(y, tile_h, tiles_y);
        let v = image.get_pixel(x, y).0[0] as usize;

        let top = lut_at(tx0, ty0)[v] * (1.0 - wx) + lut_at(tx1, ty0)[v] * wx;
        let bottom = lut_at(tx0, ty1)[v] * (1.0 - wx) + lut_at(tx1, ty1)[v] * wx;
        let value = top * (1.0 - wy) + bottom * wy;

        Luma([value.round().clamp(0.0, 255.0) as u8])
    });

    Ok(equalized)
}

/// Clipped-histogram equalization curve for one tile
fn tile_lut(img: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> [f32; 256] {
    let mut hist = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[img.get_pixel(x, y).0[0] as usize] += 1;
        }
    }

    let area = (x1 - x0) * (y1 - y0);
    let clip = ((CLIP_LIMIT * area as f32 / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    // Spread the clipped mass evenly, remainder to the lowest bins
    let share = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += share + u32::from(i < remainder);
    }

    let mut lut = [0.0f32; 256];
    let scale = 255.0 / area as f32;
    let mut cdf = 0u32;
    for (i, bin) in hist.iter().enumerate() {
        cdf += bin;
        lut[i] = cdf as f32 * scale;
    }
    lut
}

/// Indices of the two tiles whose centres bracket `pos`, and the blend weight
fn neighbours(pos: u32, tile: u32, tiles: u32) -> (u32, u32, f32) {
    let f = (pos as f32 + 0.5) / tile as f32 - 0.5;
    if f <= 0.0 {
        return (0, 0, 0.0);
    }
    let i0 = (f.floor() as u32).min(tiles - 1);
    let i1 = (i0 + 1).min(tiles - 1);
    let w = if i0 == i1 { 0.0 } else { f - i0 as f32 };
    (i0, i1, w)
}
