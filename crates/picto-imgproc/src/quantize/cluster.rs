use picto_image::Rgb;

use super::QuantizeError;

/// A colour cluster tracking the running channel sums of its members.
///
/// The centroid is kept up to date after every mutation as the truncating
/// integer mean `sum / count` of each channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    id: usize,
    count: u64,
    sum: [u64; 3],
    mean: [u8; 3],
}

impl Cluster {
    /// Create a cluster seeded with a single colour.
    ///
    /// The seed colour counts as the first member of the cluster.
    ///
    /// # Example
    ///
    /// ```
    /// use picto_image::Rgb;
    /// use picto_imgproc::quantize::Cluster;
    ///
    /// let cluster = Cluster::new(0, Rgb::new(10, 20, 30));
    /// assert_eq!(cluster.count(), 1);
    /// assert_eq!(cluster.mean(), Rgb::new(10, 20, 30));
    /// ```
    pub fn new(id: usize, color: Rgb) -> Self {
        let [r, g, b] = color.channels();
        Self {
            id,
            count: 1,
            sum: [r as u64, g as u64, b as u64],
            mean: [r, g, b],
        }
    }

    /// Identifier of the cluster, equal to its position in the cluster list.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of members currently accounted for.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Add a member colour and update the centroid.
    pub fn add(&mut self, color: Rgb) {
        for (s, c) in self.sum.iter_mut().zip(color.channels()) {
            *s += c as u64;
        }
        self.count += 1;
        self.update_mean();
    }

    /// Remove a member colour and update the centroid.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::EmptyCluster`] and leaves the cluster untouched
    /// if the removal would leave it without members.
    pub fn remove(&mut self, color: Rgb) -> Result<(), QuantizeError> {
        if self.count <= 1 {
            return Err(QuantizeError::EmptyCluster(self.id));
        }
        for (s, c) in self.sum.iter_mut().zip(color.channels()) {
            *s = s.saturating_sub(c as u64);
        }
        self.count -= 1;
        self.update_mean();
        Ok(())
    }

    /// Averaged L1 distance between the centroid and `color`, truncated.
    ///
    /// Smaller is closer.
    pub fn distance(&self, color: Rgb) -> u32 {
        let l1: u32 = self
            .mean
            .iter()
            .zip(color.channels())
            .map(|(&m, c)| m.abs_diff(c) as u32)
            .sum();
        l1 / 3
    }

    /// The centroid as a packed opaque colour.
    pub fn mean(&self) -> Rgb {
        Rgb::from(self.mean)
    }

    fn update_mean(&mut self) {
        // count >= 1 is guaranteed by `new` and the guard in `remove`
        for (m, s) in self.mean.iter_mut().zip(self.sum) {
            *m = (s / self.count) as u8;
        }
    }
}
