use chrono::{DateTime, Utc};

use crate::error::{ModelError, ModelResult};
use crate::record::Record;

/// A sample that can be placed on the time axis.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Predicate over samples. `None` selects every sample.
pub type SampleFilter<'a, S> = Option<&'a dyn Fn(&S) -> bool>;

/// Shared behavior of ordered, timestamped sample series (seismic
/// catalogs, hydraulic histories, injection plans).
///
/// Constructing a series from sorted input keeps `samples` ascending by
/// timestamp; [`TimeSeries::merge`] deliberately does not re-sort (see
/// below), so callers that rely on timestamp order after a windowed merge
/// must call [`TimeSeries::sort_by_timestamp`] themselves.
pub trait TimeSeries {
    type Sample: Timestamped + Record + Clone + PartialEq;

    fn samples(&self) -> &[Self::Sample];

    fn samples_mut(&mut self) -> &mut Vec<Self::Sample>;

    /// Hook invoked after every mutating series operation. Containers
    /// override this to emit their change signal.
    fn on_changed(&mut self) {}

    /// Structural copies of the samples matching `filter`.
    ///
    /// Copies never share identity with the originals: primary keys and
    /// foreign keys are stripped.
    fn snapshot_samples(&self, filter: SampleFilter<'_, Self::Sample>) -> Vec<Self::Sample> {
        self.samples()
            .iter()
            .filter(|s| match filter {
                Some(cond) => cond(s),
                None => true,
            })
            .map(|s| s.clone_record(false))
            .collect()
    }

    /// Remove, in place, every sample matching `filter`; `None` removes
    /// all samples. Relative order of the remaining samples is preserved.
    fn reduce(&mut self, filter: SampleFilter<'_, Self::Sample>) {
        let before = self.samples().len();
        match filter {
            Some(cond) => self.samples_mut().retain(|s| !cond(s)),
            None => self.samples_mut().clear(),
        }
        log::debug!("reduced series by {} samples", before - self.samples().len());
        self.on_changed();
    }

    /// Merge `other` into `self` by replacing the overlapping time window.
    ///
    /// The effective window is `[start, end]`, falling back to the minimum
    /// and maximum timestamp of `other` for missing bounds. Samples of
    /// `self` inside the window (bounds inclusive) are removed, then
    /// structural copies of `other`'s in-window samples are appended.
    ///
    /// The result is not re-sorted: with explicit bounds narrower than the
    /// data the appended window sits at the tail. Downstream consumers
    /// depend on this insertion order.
    fn merge(
        &mut self,
        other: &Self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ModelResult<()> {
        if other.samples().is_empty() {
            return Ok(());
        }
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(ModelError::invalid_range(format!(
                    "merge window start {start} is not before end {end}"
                )));
            }
        }

        let window_start = match start {
            Some(t) => t,
            None => match other.samples().iter().map(Timestamped::timestamp).min() {
                Some(t) => t,
                None => return Ok(()),
            },
        };
        let window_end = match end {
            Some(t) => t,
            None => match other.samples().iter().map(Timestamped::timestamp).max() {
                Some(t) => t,
                None => return Ok(()),
            },
        };
        if window_start > window_end {
            return Err(ModelError::invalid_range(format!(
                "merge window start {window_start} is after end {window_end}"
            )));
        }

        let in_window =
            |t: DateTime<Utc>| -> bool { t >= window_start && t <= window_end };

        self.samples_mut().retain(|s| !in_window(s.timestamp()));
        let incoming: Vec<Self::Sample> = other
            .samples()
            .iter()
            .filter(|s| in_window(s.timestamp()))
            .map(|s| s.clone_record(false))
            .collect();
        log::debug!("merging {} samples into series", incoming.len());
        self.samples_mut().extend(incoming);
        self.on_changed();
        Ok(())
    }

    fn sort_by_timestamp(&mut self) {
        self.samples_mut().sort_by_key(Timestamped::timestamp);
        self.on_changed();
    }

    fn len(&self) -> usize {
        self.samples().len()
    }

    fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }
}
