use std::collections::{BTreeMap, HashMap, HashSet};

use nalgebra::DVector;
use rayon::prelude::*;

use crate::catalog::Catalog;
use crate::models::{Movie, MovieId};
use crate::utils;

/// One TF-IDF vector per catalog movie, aligned with catalog positions.
///
/// The vocabulary covers every genre and free-text tag in the catalog,
/// in sorted order, so identical attribute sets always map to identical
/// vectors. Movies with no attributes get the zero vector.
pub struct FeatureTable {
    ids: Vec<MovieId>,
    vectors: Vec<DVector<f32>>,
    vocabulary: Vec<String>,
    positions: HashMap<MovieId, usize>,
}

impl FeatureTable {
    pub fn build(catalog: &Catalog) -> Self {
        let movies = catalog.movies();

        // Document frequency over distinct terms per movie.
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for movie in movies {
            let distinct: HashSet<String> = movie_terms(movie).collect();
            for term in distinct {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let vocabulary: Vec<String> = document_frequency.keys().cloned().collect();
        let term_index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let total = movies.len();
        let idf: Vec<f32> = vocabulary
            .iter()
            .map(|term| {
                let df = document_frequency[term];
                (((1 + total) as f32) / ((1 + df) as f32)).ln() + 1.0
            })
            .collect();

        let vectors: Vec<DVector<f32>> = movies
            .par_iter()
            .map(|movie| {
                let mut weights = vec![0.0f32; vocabulary.len()];
                for term in movie_terms(movie) {
                    if let Some(&i) = term_index.get(term.as_str()) {
                        weights[i] += idf[i];
                    }
                }
                utils::normalize_vector(&mut weights);
                DVector::from_vec(weights)
            })
            .collect();

        let ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();
        let positions: HashMap<MovieId, usize> =
            ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();

        Self {
            ids,
            vectors,
            vocabulary,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn id_at(&self, position: usize) -> MovieId {
        self.ids[position]
    }

    pub fn vector(&self, position: usize) -> &DVector<f32> {
        &self.vectors[position]
    }

    pub fn vector_for(&self, id: MovieId) -> Option<&DVector<f32>> {
        self.positions.get(&id).map(|&pos| &self.vectors[pos])
    }
}

fn movie_terms(movie: &Movie) -> impl Iterator<Item = String> + '_ {
    movie
        .genres
        .iter()
        .chain(movie.tags.iter())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
}
