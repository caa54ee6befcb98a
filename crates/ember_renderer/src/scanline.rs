//! Parallel scanline rendering.
//!
//! The image is split into contiguous row ranges, one per worker. Each worker
//! owns a disjoint slice of the pixel buffer, so the buffer needs no locking.
//! Every row draws from its own generator seeded from the render seed and the
//! row index, which makes the output independent of the worker count.

use crate::error::Result;
use crate::renderer::render_pixel;
use crate::{Camera, Color, Hittable, ImageBuffer};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Mixes the row index into the render seed.
const ROW_SEED_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// A half-open range of image rows `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: u32,
    pub end: u32,
}

impl RowRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of rows in the range.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `height` rows into contiguous ranges, one per worker.
///
/// The worker count is clamped to `[1, height]`. Every range holds
/// `height / workers` rows except the last, which absorbs the remainder.
pub fn partition_rows(height: u32, workers: usize) -> Vec<RowRange> {
    if height == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, height as usize) as u32;
    let rows_per_worker = height / workers;

    (0..workers)
        .map(|i| {
            let start = i * rows_per_worker;
            let end = if i + 1 == workers { height } else { start + rows_per_worker };
            RowRange::new(start, end)
        })
        .collect()
}

/// Seed of the generator used for one image row.
#[inline]
pub fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(ROW_SEED_MULTIPLIER)
}

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Worker threads; `None` uses one per logical core
    pub threads: Option<usize>,
    /// Base seed for all per-row generators
    pub seed: u64,
}

impl RenderOptions {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of workers this configuration asks for.
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Multi-threaded scanline renderer.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the scene with the default generator.
    pub fn render(&self, camera: &Camera, world: &dyn Hittable) -> Result<ImageBuffer> {
        self.render_with::<StdRng>(camera, world)
    }

    /// Render the scene, seeding one `R` per image row.
    ///
    /// Blocks until every worker has finished. A panicking worker aborts the
    /// whole render and the panic resumes on the calling thread.
    pub fn render_with<R>(&self, camera: &Camera, world: &dyn Hittable) -> Result<ImageBuffer>
    where
        R: RngCore + SeedableRng,
    {
        let width = camera.image_width;
        let height = camera.image_height;
        let mut image = ImageBuffer::new(width, height);

        let ranges = partition_rows(height, self.options.worker_count());
        log::debug!("Partitioned {height} rows into {} ranges", ranges.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len().max(1))
            .thread_name(|i| format!("ember-worker-{i}"))
            .build()?;

        log::info!(
            "Rendering {width}x{height} @ {} spp, depth {} on {} threads",
            camera.samples_per_pixel,
            camera.max_depth,
            pool.current_num_threads()
        );
        let start = Instant::now();

        let progress = Progress::new(height as usize);
        let seed = self.options.seed;

        pool.scope(|scope| {
            let mut rest: &mut [Color] = &mut image.pixels;

            for &rows in &ranges {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() as usize * width as usize);
                rest = tail;

                let progress = &progress;
                scope.spawn(move |_| render_rows::<R>(camera, world, rows, chunk, seed, progress));
            }
        });
        drop(pool);

        log::info!("Render finished in {:.2?}", start.elapsed());
        Ok(image)
    }
}

/// Render `rows` into `pixels`, which holds exactly those rows.
fn render_rows<R>(
    camera: &Camera,
    world: &dyn Hittable,
    rows: RowRange,
    pixels: &mut [Color],
    seed: u64,
    progress: &Progress,
) where
    R: RngCore + SeedableRng,
{
    let width = camera.image_width as usize;

    for (y, line) in (rows.start..rows.end).zip(pixels.chunks_mut(width)) {
        let mut rng = R::seed_from_u64(row_seed(seed, y));
        for (x, pixel) in line.iter_mut().enumerate() {
            *pixel = render_pixel(camera, world, x as u32, y, &mut rng);
        }
        progress.row_done();
    }
}

/// Finished-row counter, used for logging only.
struct Progress {
    done: AtomicUsize,
    total: usize,
    step: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            step: (total / 10).max(1),
        }
    }

    fn row_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.step == 0 || done == self.total {
            log::info!("Rendered {done}/{} rows ({}%)", self.total, done * 100 / self.total);
        }
    }
}
