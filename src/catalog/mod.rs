use std::collections::HashMap;

use crate::error::{RecError, Result};
use crate::models::{Movie, MovieId};

/// Read-only movie registry with stable insertion order.
///
/// Built once at startup from rows the loader has already parsed; every
/// other component refers to movies by id or by position in this order.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_id: HashMap<MovieId, usize>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_movies(movies: Vec<Movie>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(movies.len());
        let mut by_title = HashMap::with_capacity(movies.len());

        for (position, movie) in movies.iter().enumerate() {
            if by_id.insert(movie.id, position).is_some() {
                return Err(RecError::Computation(format!(
                    "duplicate movie id in catalog: {}",
                    movie.id
                )));
            }
            if by_title.insert(movie.title.clone(), position).is_some() {
                return Err(RecError::Computation(format!(
                    "duplicate movie title in catalog: {}",
                    movie.title
                )));
            }
        }

        Ok(Self {
            movies,
            by_id,
            by_title,
        })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Movies in insertion order.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&pos| &self.movies[pos])
    }

    pub fn by_position(&self, position: usize) -> Option<&Movie> {
        self.movies.get(position)
    }

    pub fn position_of(&self, id: MovieId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Exact title match.
    pub fn resolve_title(&self, title: &str) -> Option<MovieId> {
        self.by_title.get(title).map(|&pos| self.movies[pos].id)
    }

    pub fn title_of(&self, id: MovieId) -> Option<&str> {
        self.get(id).map(|m| m.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str) -> Movie {
        Movie::new(id, title, vec!["Drama".to_string()])
    }

    #[test]
    fn test_resolves_titles_and_positions() {
        let catalog = Catalog::from_movies(vec![
            movie(10, "Heat (1995)"),
            movie(3, "Jumanji (1995)"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve_title("Heat (1995)"), Some(10));
        assert_eq!(catalog.resolve_title("Casino (1995)"), None);
        assert_eq!(catalog.position_of(3), Some(1));
        assert_eq!(catalog.by_position(0).unwrap().id, 10);
    }

    #[test]
    fn test_rejects_duplicate_titles() {
        let result = Catalog::from_movies(vec![
            movie(1, "Toy Story (1995)"),
            movie(2, "Toy Story (1995)"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Catalog::from_movies(vec![
            movie(1, "Toy Story (1995)"),
            movie(1, "Jumanji (1995)"),
        ]);
        assert!(result.is_err());
    }
}
