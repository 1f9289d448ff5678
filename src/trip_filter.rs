// trip_filter.rs
use crate::selection_set::{day_number, month_number, SelectionSet};
use crate::trip_loader::{Dataset, TripRecord};
use rand::seq::index;
use rand::Rng;
use tracing::debug;

/// The trips of a dataset that pass the month and day filters.
/// Borrows the dataset; nothing is copied.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.indices.iter().map(|&index| &self.dataset.records[index])
    }

    /// Dataset positions of the surviving trips.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Up to `amount` distinct trips picked at random, kept in view order,
    /// each paired with its position in the dataset.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        amount: usize,
        rng: &mut R,
    ) -> Vec<(usize, &'a TripRecord)> {
        let amount = amount.min(self.indices.len());
        let mut picked = index::sample(rng, self.indices.len(), amount).into_vec();
        picked.sort_unstable();
        picked
            .into_iter()
            .map(|position| {
                let index = self.indices[position];
                (index, &self.dataset.records[index])
            })
            .collect()
    }
}

fn wanted_numbers(set: &SelectionSet, to_number: fn(&str) -> Option<u32>) -> Option<Vec<u32>> {
    if set.is_all() {
        return None;
    }
    Some(set.members().into_iter().filter_map(to_number).collect())
}

/// Keeps the trips whose month and day of week are both selected.
/// A fully selected set does not filter on its dimension at all.
pub fn filter_dataset<'a>(
    dataset: &'a Dataset,
    months: &SelectionSet,
    days: &SelectionSet,
) -> FilteredView<'a> {
    let wanted_months = wanted_numbers(months, month_number);
    let wanted_days = wanted_numbers(days, day_number);

    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, trip)| {
            wanted_months
                .as_ref()
                .map_or(true, |wanted| wanted.contains(&trip.month))
                && wanted_days
                    .as_ref()
                    .map_or(true, |wanted| wanted.contains(&trip.day_of_week))
        })
        .map(|(index, _)| index)
        .collect();

    debug!(total = dataset.len(), kept = indices.len(), "filtered dataset");
    FilteredView { dataset, indices }
}
