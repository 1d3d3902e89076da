use std::collections::BTreeSet;
use std::fs;

use movie_kmeans::{
    favorite_genres, find_best_cluster, find_worst_cluster, fit, loader, sample_descriptions,
    ClusterMap, EuclideanDistance, FeatureVector, Item, ManhattanDistance, RecommendError,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn movie(name: &str, drama: f64, comedy: f64) -> Item {
    let features: FeatureVector = [("Drama".to_string(), drama), ("Comedy".to_string(), comedy)]
        .into_iter()
        .collect();
    Item::new(name, features)
}

fn catalog() -> Vec<Item> {
    vec![
        movie("D1", 90.0, 10.0),
        movie("D2", 85.0, 15.0),
        movie("D3", 95.0, 5.0),
        movie("C1", 10.0, 90.0),
        movie("C2", 15.0, 85.0),
        movie("C3", 5.0, 95.0),
    ]
}

/// First seed whose clustering splits the catalog into two groups.
fn two_clusters(items: &[Item]) -> ClusterMap {
    (0..64)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            fit(items, 2, Box::new(EuclideanDistance), 100, &mut rng).unwrap()
        })
        .find(|clusters| clusters.len() == 2)
        .expect("some seed separates the catalog")
}

fn names(items: &[Item]) -> BTreeSet<&str> {
    items.iter().map(|i| i.description.as_str()).collect()
}

#[test]
fn test_recommendation_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let users_path = dir.path().join("users.csv");
    let rated_path = dir.path().join("rated.csv");
    fs::write(&users_path, "Jan Kowalski;Casablanca;9;Airplane;2\nAnna Nowak;Airplane;10\n").unwrap();
    fs::write(&rated_path, "Casablanca;Drama\nAirplane;Comedy\n").unwrap();

    let users = loader::load_users(&users_path).unwrap();
    let rated = loader::load_rated_movies(&rated_path).unwrap();
    let user = users.iter().find(|u| u.name == "Jan Kowalski").unwrap();

    let genres = favorite_genres(user, &rated, 1).unwrap();
    assert_eq!(genres, vec!["Drama".to_string()]);

    let clusters = two_clusters(&catalog());
    let best = find_best_cluster(&clusters, &genres).unwrap().unwrap();
    let worst = find_worst_cluster(&clusters, &genres).unwrap().unwrap();
    assert_eq!(
        names(clusters.get(best).unwrap()),
        BTreeSet::from(["D1", "D2", "D3"])
    );
    assert_eq!(
        names(clusters.get(worst).unwrap()),
        BTreeSet::from(["C1", "C2", "C3"])
    );

    let mut rng = StdRng::seed_from_u64(3);
    let picks = sample_descriptions(clusters.get(best).unwrap(), 2, &mut rng).unwrap();
    assert_eq!(picks.len(), 2);
    assert!(picks.iter().all(|p| p.starts_with('D')));

    assert!(matches!(
        sample_descriptions(clusters.get(best).unwrap(), 5, &mut rng),
        Err(RecommendError::InvalidArgument { .. })
    ));
}

#[test]
fn test_unseen_genre_fails_selection() {
    let clusters = two_clusters(&catalog());
    let genres = vec!["SciFi".to_string()];
    assert!(matches!(
        find_best_cluster(&clusters, &genres),
        Err(RecommendError::MissingKey { .. })
    ));
    assert!(matches!(
        find_worst_cluster(&clusters, &genres),
        Err(RecommendError::MissingKey { .. })
    ));
}

#[test]
fn test_empty_catalog() {
    let mut rng = StdRng::seed_from_u64(0);
    let clusters = fit(&[], 3, Box::new(EuclideanDistance), 10, &mut rng).unwrap();
    assert!(clusters.is_empty());
    assert_eq!(find_best_cluster(&clusters, &["Drama".to_string()]).unwrap(), None);
}

#[test]
fn test_alternative_metric_plugs_in() {
    let mut rng = StdRng::seed_from_u64(0);
    let clusters = fit(&catalog(), 2, Box::new(ManhattanDistance), 100, &mut rng).unwrap();
    assert_eq!(clusters.item_count(), 6);
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        loader::load_users(&dir.path().join("absent.csv")),
        Err(RecommendError::Io(_))
    ));
}

fn sparse_catalog() -> impl Strategy<Value = Vec<Item>> {
    let features = prop::collection::btree_map("(Drama|Comedy|Horror|Western)", 0.0f64..100.0, 0..4);
    prop::collection::vec(features, 0..25).prop_map(|all| {
        all.into_iter()
            .enumerate()
            .map(|(i, features)| Item::new(format!("movie {i}"), features))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_every_item_lands_in_exactly_one_cluster(
        items in sparse_catalog(),
        k in 1usize..6,
        max_iterations in 1usize..20,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let clusters = fit(&items, k, Box::new(EuclideanDistance), max_iterations, &mut rng).unwrap();
        prop_assert!(clusters.len() <= k);
        prop_assert_eq!(clusters.item_count(), items.len());

        let mut seen: Vec<&str> = clusters
            .iter()
            .flat_map(|(_, members)| members.iter().map(|m| m.description.as_str()))
            .collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }
}
