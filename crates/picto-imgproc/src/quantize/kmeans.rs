use picto_image::{Raster, Rgb};

use super::{Cluster, ConvergenceCriteria, QuantizeError};

/// Owner of every pixel, indexed in row-major order (`y * width + x`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    owners: Vec<Option<usize>>,
}

impl Assignment {
    /// Create a table where every one of `num_pixels` pixels is unassigned.
    pub fn new(num_pixels: usize) -> Self {
        Self {
            owners: vec![None; num_pixels],
        }
    }

    /// Current owner of the pixel at `index`, if any.
    pub fn owner(&self, index: usize) -> Option<usize> {
        self.owners.get(index).copied().flatten()
    }

    /// Number of pixels in the table.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the table covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    fn assign(&mut self, index: usize, cluster: usize) {
        self.owners[index] = Some(cluster);
    }
}

/// Outcome of the assignment loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvergenceReport {
    /// The total number of full passes performed.
    pub num_iterations: usize,
    /// `false` when the iteration cap was reached before a pass without changes.
    pub converged: bool,
    /// Summed distance of all pixels to their owner, measured after each pass.
    pub cost_history: Vec<u64>,
}

/// Result of a quantization run.
#[derive(Debug, Clone)]
pub struct Quantized<R> {
    /// The rendered image, with the dimensions of the source.
    pub image: R,
    /// The total number of full passes performed.
    pub num_iterations: usize,
    /// `false` when the iteration cap was reached before a pass without changes.
    pub converged: bool,
    /// Summed distance of all pixels to their owner, measured after each pass.
    pub cost_history: Vec<u64>,
}

/// Online k-means colour quantizer.
///
/// Reduces an image to at most `num_clusters` colours. The run is fully
/// deterministic: seeds are picked at fixed positions and ties between
/// equally distant clusters go to the lowest cluster id.
///
/// # Example
///
/// ```
/// use picto_image::{Image, ImageSize};
/// use picto_imgproc::quantize::KMeansQuantizer;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![0, 0, 0, 255, 255, 255, 0, 0, 0, 255, 255, 255],
/// )
/// .unwrap();
///
/// let quantized = KMeansQuantizer::new(2).evaluate(&image).unwrap();
/// assert!(quantized.converged);
/// assert_eq!(quantized.image, image);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KMeansQuantizer {
    num_clusters: usize,
    criteria: ConvergenceCriteria,
}

impl KMeansQuantizer {
    /// Create a quantizer producing `num_clusters` colours with the default criteria.
    pub fn new(num_clusters: usize) -> Self {
        Self {
            num_clusters,
            criteria: ConvergenceCriteria::default(),
        }
    }

    /// Replace the stopping rule.
    pub fn with_criteria(mut self, criteria: ConvergenceCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Number of clusters this quantizer seeds.
    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }

    /// Seed, converge and render `src`, returning a new image.
    ///
    /// The source image is never modified.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::InvalidNumClusters`] if the number of clusters is zero or
    /// exceeds the pixel count, [`QuantizeError::InvalidMaxIterations`] if the
    /// criteria allow no pass. Both are raised before any work is done.
    pub fn evaluate<R: Raster>(&self, src: &R) -> Result<Quantized<R>, QuantizeError> {
        if self.criteria.max_iterations == 0 {
            return Err(QuantizeError::InvalidMaxIterations);
        }

        let mut clusters = seed(src, self.num_clusters)?;
        let mut assignment = Assignment::new(src.num_pixels());

        let report = converge(src, &mut clusters, &mut assignment, &self.criteria)?;
        let image = render(src, &clusters, &assignment)?;

        Ok(Quantized {
            image,
            num_iterations: report.num_iterations,
            converged: report.converged,
            cost_history: report.cost_history,
        })
    }
}

/// Quantize `src` to `k` colours with the default criteria.
///
/// Reaching the iteration cap is not an error here; use
/// [`KMeansQuantizer::evaluate`] to inspect it.
pub fn quantize_kmeans<R: Raster>(src: &R, k: usize) -> Result<R, QuantizeError> {
    Ok(KMeansQuantizer::new(k).evaluate(src)?.image)
}

/// Positions `(x, y)` at which `k` clusters are seeded on an image of the given size.
///
/// The samples run along the diagonal in steps of `(width / k, height / k)`,
/// i.e. seed `i` sits at `(i * (width / k), i * (height / k))`, as long as that
/// holds `k` distinct positions, i.e. `k <= min(width, height)`. Otherwise the
/// steps would be zero, so the samples are evenly strided over the row-major
/// pixel order instead, which places one seed on every pixel when `k` equals
/// the pixel count.
pub fn seed_positions(width: usize, height: usize, k: usize) -> Vec<(usize, usize)> {
    if k == 0 {
        return Vec::new();
    }

    if k <= width.min(height) {
        let (step_x, step_y) = (width / k, height / k);
        (0..k).map(|i| (i * step_x, i * step_y)).collect()
    } else {
        let num_pixels = width * height;
        (0..k)
            .map(|i| {
                let index = i * num_pixels / k;
                (index % width, index / width)
            })
            .collect()
    }
}

/// Create `k` clusters seeded from the colours of `src` at [`seed_positions`].
///
/// # Errors
///
/// [`QuantizeError::InvalidNumClusters`] unless `1 <= k <= width * height`.
pub fn seed<R: Raster>(src: &R, k: usize) -> Result<Vec<Cluster>, QuantizeError> {
    let num_pixels = src.num_pixels();
    if k == 0 || k > num_pixels {
        return Err(QuantizeError::InvalidNumClusters { k, num_pixels });
    }

    let clusters = seed_positions(src.width(), src.height(), k)
        .into_iter()
        .enumerate()
        .map(|(id, (x, y))| Cluster::new(id, src.get_pixel(x, y)))
        .collect();

    Ok(clusters)
}

/// Reassign pixels to their nearest cluster until a full pass changes nothing.
///
/// Clusters are updated online: every move removes the pixel colour from its
/// previous owner and adds it to the new one immediately. A move that would
/// leave the previous owner without members is skipped for that pass.
///
/// Stops after `criteria.max_iterations` passes at the latest, reporting
/// `converged: false` in that case.
///
/// # Errors
///
/// [`QuantizeError::InvalidNumClusters`] if `clusters` is empty,
/// [`QuantizeError::InvalidMaxIterations`] if the criteria allow no pass, or
/// [`QuantizeError::AssignmentSizeMismatch`] if `assignment` does not cover `src`.
pub fn converge<R: Raster>(
    src: &R,
    clusters: &mut [Cluster],
    assignment: &mut Assignment,
    criteria: &ConvergenceCriteria,
) -> Result<ConvergenceReport, QuantizeError> {
    if clusters.is_empty() {
        return Err(QuantizeError::InvalidNumClusters {
            k: 0,
            num_pixels: src.num_pixels(),
        });
    }
    if criteria.max_iterations == 0 {
        return Err(QuantizeError::InvalidMaxIterations);
    }
    if assignment.len() != src.num_pixels() {
        return Err(QuantizeError::AssignmentSizeMismatch(
            assignment.len(),
            src.num_pixels(),
        ));
    }

    let mut report = ConvergenceReport {
        num_iterations: 0,
        converged: false,
        cost_history: Vec::new(),
    };

    while report.num_iterations < criteria.max_iterations {
        let num_changed = assignment_pass(src, clusters, assignment)?;
        let cost = total_cost(src, clusters, assignment);

        report.num_iterations += 1;
        report.cost_history.push(cost);

        log::debug!(
            "pass {}: {} pixels reassigned, cost {}",
            report.num_iterations,
            num_changed,
            cost
        );

        if num_changed == 0 {
            report.converged = true;
            break;
        }
    }

    if report.converged {
        log::info!(
            "k-means converged in {} passes with {} clusters",
            report.num_iterations,
            clusters.len()
        );
    } else {
        log::warn!(
            "k-means stopped after {} passes without reaching a fixed point",
            report.num_iterations
        );
    }

    Ok(report)
}

/// Build a new image where each pixel takes the centroid of its owner.
///
/// # Errors
///
/// [`QuantizeError::UnassignedPixel`] if a pixel has no owner, which happens
/// when `assignment` was not produced by [`converge`] on the same image.
pub fn render<R: Raster>(
    src: &R,
    clusters: &[Cluster],
    assignment: &Assignment,
) -> Result<R, QuantizeError> {
    let (width, height) = (src.width(), src.height());
    let mut dst = R::blank(width, height);

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            let owner = assignment
                .owner(index)
                .and_then(|id| clusters.get(id))
                .ok_or(QuantizeError::UnassignedPixel(index))?;
            dst.set_pixel(x, y, owner.mean());
        }
    }

    Ok(dst)
}

// one row-major scan; returns the number of pixels that changed owner
fn assignment_pass<R: Raster>(
    src: &R,
    clusters: &mut [Cluster],
    assignment: &mut Assignment,
) -> Result<usize, QuantizeError> {
    let width = src.width();
    let mut num_changed = 0;

    for y in 0..src.height() {
        for x in 0..width {
            let index = y * width + x;
            let color = src.get_pixel(x, y);
            let nearest = nearest_cluster(clusters, color);
            let owner = assignment.owner(index);

            if owner == Some(nearest) {
                continue;
            }

            if let Some(previous) = owner {
                // an owner holds its seed plus this pixel, so this only trips
                // on clusters that were not built by `seed`
                if clusters[previous].count() <= 1 {
                    log::trace!("keeping pixel {index} in cluster {previous}, its last member");
                    continue;
                }
                clusters[previous].remove(color)?;
            }

            clusters[nearest].add(color);
            assignment.assign(index, nearest);
            num_changed += 1;
        }
    }

    Ok(num_changed)
}

// first cluster with the strictly smallest distance
fn nearest_cluster(clusters: &[Cluster], color: Rgb) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, cluster) in clusters.iter().enumerate() {
        let d = cluster.distance(color);
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best
}

fn total_cost<R: Raster>(src: &R, clusters: &[Cluster], assignment: &Assignment) -> u64 {
    let width = src.width();
    let mut cost = 0u64;
    for y in 0..src.height() {
        for x in 0..width {
            if let Some(owner) = assignment.owner(y * width + x) {
                cost += clusters[owner].distance(src.get_pixel(x, y)) as u64;
            }
        }
    }
    cost
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use picto_image::{Image, ImageError, ImageSize, Raster, Rgb};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn gray_row(values: &[u8]) -> Result<Image<u8, 3>, ImageError> {
        let data = values.iter().flat_map(|&v| [v, v, v]).collect();
        Image::new(
            ImageSize {
                width: values.len(),
                height: 1,
            },
            data,
        )
    }

    fn checkerboard() -> Result<Image<u8, 3>, ImageError> {
        Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0, 0, 0, 255, 255, 255, 0, 0, 0, 255, 255, 255],
        )
    }

    fn random_image(width: usize, height: usize, seed: u64) -> Result<Image<u8, 3>, ImageError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..width * height * 3).map(|_| rng.random::<u8>()).collect();
        Image::new(ImageSize { width, height }, data)
    }

    #[test]
    fn seed_positions_diagonal() {
        assert_eq!(seed_positions(4, 4, 2), vec![(0, 0), (2, 2)]);
        assert_eq!(seed_positions(2, 2, 2), vec![(0, 0), (1, 1)]);
        assert_eq!(seed_positions(9, 3, 3), vec![(0, 0), (3, 1), (6, 2)]);
        assert_eq!(seed_positions(5, 5, 1), vec![(0, 0)]);
        // steps are truncated before they are multiplied
        assert_eq!(
            seed_positions(10, 10, 4),
            vec![(0, 0), (2, 2), (4, 4), (6, 6)]
        );
        assert_eq!(seed_positions(7, 5, 3), vec![(0, 0), (2, 1), (4, 2)]);

        let positions = seed_positions(1000, 700, 60);
        assert_eq!(positions.len(), 60);
        assert_eq!(&positions[1..4], &[(16, 11), (32, 22), (48, 33)]);
        assert_eq!(positions[59], (944, 649));
    }

    #[test]
    fn seed_positions_row_major() {
        assert_eq!(
            seed_positions(2, 2, 4),
            vec![(0, 0), (1, 0), (0, 1), (1, 1)]
        );
        assert_eq!(seed_positions(3, 1, 2), vec![(0, 0), (1, 0)]);
        assert_eq!(seed_positions(4, 1, 2), vec![(0, 0), (2, 0)]);
        assert!(seed_positions(4, 1, 0).is_empty());
    }

    #[test]
    fn seed_rejects_invalid_k() -> Result<(), ImageError> {
        let image = checkerboard()?;
        assert_eq!(
            seed(&image, 0),
            Err(QuantizeError::InvalidNumClusters {
                k: 0,
                num_pixels: 4
            })
        );
        assert_eq!(
            seed(&image, 5),
            Err(QuantizeError::InvalidNumClusters {
                k: 5,
                num_pixels: 4
            })
        );
        Ok(())
    }

    #[test]
    fn seed_takes_colours_at_positions() -> Result<(), Box<dyn std::error::Error>> {
        let image = checkerboard()?;
        let clusters = seed(&image, 2)?;
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].mean(), Rgb::new(0, 0, 0));
        assert_eq!(clusters[1].mean(), Rgb::new(255, 255, 255));
        assert_eq!(clusters[1].id(), 1);
        Ok(())
    }

    #[test]
    fn evaluate_checkerboard() -> Result<(), Box<dyn std::error::Error>> {
        let image = checkerboard()?;
        let quantized = KMeansQuantizer::new(2).evaluate(&image)?;

        assert!(quantized.converged);
        assert_eq!(quantized.num_iterations, 2);
        assert_eq!(quantized.cost_history, vec![0, 0]);
        assert_eq!(quantized.image, image);
        Ok(())
    }

    #[test]
    fn evaluate_two_gray_levels() -> Result<(), Box<dyn std::error::Error>> {
        let image = gray_row(&[0, 10, 200, 210])?;
        let quantized = KMeansQuantizer::new(2).evaluate(&image)?;

        assert!(quantized.converged);
        assert_eq!(quantized.num_iterations, 2);
        assert_eq!(quantized.cost_history, vec![20, 20]);
        assert_eq!(quantized.image, gray_row(&[3, 3, 203, 203])?);
        Ok(())
    }

    #[test]
    fn evaluate_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let image = gray_row(&[0, 10, 200, 210])?;
        let once = quantize_kmeans(&image, 2)?;
        let twice = quantize_kmeans(&once, 2)?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn single_cluster_collapses_to_one_colour() -> Result<(), Box<dyn std::error::Error>> {
        // the seed pixel counts once more than the others in the centroid
        let image = gray_row(&[0, 90])?;
        let output = quantize_kmeans(&image, 1)?;
        assert_eq!(output, gray_row(&[30, 30])?);

        let uniform = Image::<u8, 3>::from_size_val([3, 2].into(), 77)?;
        assert_eq!(quantize_kmeans(&uniform, 1)?, uniform);
        Ok(())
    }

    #[test]
    fn one_cluster_per_pixel_keeps_image() -> Result<(), Box<dyn std::error::Error>> {
        let image = Image::<u8, 3>::new(
            [2, 2].into(),
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )?;
        let output = quantize_kmeans(&image, 4)?;
        assert_eq!(output, image);
        Ok(())
    }

    #[test]
    fn evaluate_rejects_invalid_parameters() -> Result<(), ImageError> {
        let image = checkerboard()?;
        assert!(matches!(
            KMeansQuantizer::new(0).evaluate(&image),
            Err(QuantizeError::InvalidNumClusters { k: 0, .. })
        ));
        assert!(matches!(
            KMeansQuantizer::new(5).evaluate(&image),
            Err(QuantizeError::InvalidNumClusters { k: 5, .. })
        ));
        assert!(matches!(
            KMeansQuantizer::new(2)
                .with_criteria(ConvergenceCriteria { max_iterations: 0 })
                .evaluate(&image),
            Err(QuantizeError::InvalidMaxIterations)
        ));

        let empty = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        assert!(matches!(
            quantize_kmeans(&empty, 1),
            Err(QuantizeError::InvalidNumClusters { num_pixels: 0, .. })
        ));
        Ok(())
    }

    #[test]
    fn iteration_cap_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let image = gray_row(&[0, 10, 200, 210])?;
        let quantized = KMeansQuantizer::new(2)
            .with_criteria(ConvergenceCriteria { max_iterations: 1 })
            .evaluate(&image)?;

        assert!(!quantized.converged);
        assert_eq!(quantized.num_iterations, 1);
        assert_eq!(quantized.image, gray_row(&[3, 3, 203, 203])?);
        Ok(())
    }

    #[test]
    fn output_pixels_are_cluster_means() -> Result<(), Box<dyn std::error::Error>> {
        let image = random_image(9, 7, 42)?;
        let k = 5;

        let mut clusters = seed(&image, k)?;
        let mut assignment = Assignment::new(image.num_pixels());
        converge(
            &image,
            &mut clusters,
            &mut assignment,
            &ConvergenceCriteria::default(),
        )?;

        let output: Image<u8, 3> = render(&image, &clusters, &assignment)?;
        assert_eq!(output.size(), image.size());

        let means: HashSet<Rgb> = clusters.iter().map(|c| c.mean()).collect();
        let mut seen = HashSet::new();
        for y in 0..output.rows() {
            for x in 0..output.cols() {
                let color = output.get_pixel(x, y);
                let owner = assignment.owner(y * output.cols() + x).ok_or("unassigned")?;
                assert_eq!(color, clusters[owner].mean());
                assert!(means.contains(&color));
                seen.insert(color);
            }
        }
        assert!(seen.len() <= k);
        Ok(())
    }

    #[test]
    fn evaluate_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let image = random_image(16, 12, 7)?;
        let a = KMeansQuantizer::new(6).evaluate(&image)?;
        let b = KMeansQuantizer::new(6).evaluate(&image)?;
        assert_eq!(a.image, b.image);
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.num_iterations, b.num_iterations);
        Ok(())
    }

    #[test]
    fn render_requires_complete_assignment() -> Result<(), Box<dyn std::error::Error>> {
        let image = checkerboard()?;
        let clusters = seed(&image, 2)?;
        let assignment = Assignment::new(image.num_pixels());
        let res: Result<Image<u8, 3>, _> = render(&image, &clusters, &assignment);
        assert_eq!(res, Err(QuantizeError::UnassignedPixel(0)));
        Ok(())
    }

    #[test]
    fn cluster_counts_seed_plus_owned_pixels() -> Result<(), Box<dyn std::error::Error>> {
        for (k, seed_value) in [(4, 3), (30, 5), (100, 8)] {
            let image = random_image(10, 10, seed_value)?;
            let mut clusters = seed(&image, k)?;
            let mut assignment = Assignment::new(image.num_pixels());
            converge(
                &image,
                &mut clusters,
                &mut assignment,
                &ConvergenceCriteria::default(),
            )?;

            let mut owned = vec![0u64; k];
            for index in 0..assignment.len() {
                owned[assignment.owner(index).ok_or("unassigned")?] += 1;
            }
            for (cluster, num_owned) in clusters.iter().zip(owned) {
                assert_eq!(cluster.count(), num_owned + 1);
            }
        }
        Ok(())
    }

    #[test]
    fn converge_skips_move_out_of_unseeded_cluster() -> Result<(), Box<dyn std::error::Error>> {
        // pixel 0 is owned by cluster 1 without being counted in it
        let image = gray_row(&[0, 200])?;
        let mut clusters = vec![
            Cluster::new(0, Rgb::new(0, 0, 0)),
            Cluster::new(1, Rgb::new(200, 200, 200)),
        ];
        let mut assignment = Assignment::new(2);
        assignment.assign(0, 1);
        assignment.assign(1, 1);

        let report = converge(
            &image,
            &mut clusters,
            &mut assignment,
            &ConvergenceCriteria { max_iterations: 3 },
        )?;

        assert!(report.converged);
        assert_eq!(report.num_iterations, 1);
        assert_eq!(assignment.owner(0), Some(1));
        assert_eq!(clusters[1].count(), 1);
        Ok(())
    }

    #[test]
    fn converge_checks_assignment_size() -> Result<(), Box<dyn std::error::Error>> {
        let image = checkerboard()?;
        let mut clusters = seed(&image, 2)?;
        let mut assignment = Assignment::new(3);
        assert_eq!(
            converge(
                &image,
                &mut clusters,
                &mut assignment,
                &ConvergenceCriteria::default()
            ),
            Err(QuantizeError::AssignmentSizeMismatch(3, 4))
        );
        Ok(())
    }
}
