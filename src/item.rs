use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::vector::FeatureVector;

/// A catalog movie: description plus genre weights.
///
/// The rating starts out unset and can be set exactly once, when a user's
/// rating is joined onto the catalog entry.
#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Item {
    pub description: String,
    pub features: FeatureVector,
    rating: Option<u8>,
}

impl Item {
    pub fn new(description: impl Into<String>, features: FeatureVector) -> Self {
        Item {
            description: description.into(),
            features,
            rating: None,
        }
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    /// Attach a rating. Fails if the item was already rated.
    pub fn rate(&mut self, rating: u8) -> Result<()> {
        if let Some(existing) = self.rating {
            return Err(RecommendError::invalid_argument(format!(
                "'{}' is already rated {}",
                self.description, existing
            )));
        }
        self.rating = Some(rating);
        Ok(())
    }

    pub fn with_rating(mut self, rating: u8) -> Result<Self> {
        self.rate(rating)?;
        Ok(self)
    }
}

/// A movie as it appears in a user's history: no genres, only the rating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedMovie {
    pub description: String,
    pub rating: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub movies: Vec<RatedMovie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_is_set_once() {
        let mut item = Item::new("Alien", FeatureVector::new());
        assert_eq!(item.rating(), None);
        item.rate(8).unwrap();
        assert_eq!(item.rating(), Some(8));
        assert!(matches!(
            item.rate(3),
            Err(RecommendError::InvalidArgument { .. })
        ));
        assert_eq!(item.rating(), Some(8));
    }
}
