use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{RecommendError, Result};
use crate::item::Item;

/// Descriptions of `count` distinct items picked uniformly from `items`.
pub fn sample_descriptions<R: Rng + ?Sized>(
    items: &[Item],
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    if items.len() < count {
        return Err(RecommendError::invalid_argument(format!(
            "cannot sample {} items from a cluster of {}",
            count,
            items.len()
        )));
    }
    Ok(items
        .choose_multiple(rng, count)
        .map(|item| item.description.clone())
        .collect())
}
