//! Catalog of named waypoint shapes

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use std::collections::HashMap;

use crate::nav_ctrl::Pose;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name accepted from the command line to select the default route.
pub const DEFAULT_SHAPE_NAME: &str = "default";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A set of named, ordered waypoint sequences plus the default route used when no name is given.
#[derive(Debug, Clone)]
pub struct ShapeCatalog {
    shapes: HashMap<String, Vec<Pose>>,

    default: Vec<Pose>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ShapeCatalog {
    /// The built-in catalog: `square`, `g`, and the single origin waypoint as the default route.
    pub fn builtin() -> Self {
        let mut shapes = HashMap::new();

        shapes.insert(
            String::from("square"),
            points(&[(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]),
        );
        shapes.insert(
            String::from("g"),
            points(&[(-1.0, 1.0), (-2.0, 0.0), (-1.0, -1.0), (0.0, -0.3), (-0.5, -0.45)]),
        );

        Self {
            shapes,
            default: points(&[(0.0, 0.0)]),
        }
    }

    /// The built-in catalog extended with the given shapes.
    ///
    /// Built-in shapes cannot be replaced, an extra shape with a built-in name is ignored.
    pub fn with_shapes(extra: HashMap<String, Vec<Pose>>) -> Self {
        let mut catalog = Self::builtin();

        for (name, poses) in extra {
            if catalog.shapes.contains_key(&name) {
                warn!("Shape \"{}\" is built in and cannot be replaced, ignoring", name);
                continue;
            }

            catalog.shapes.insert(name, poses);
        }

        catalog
    }

    /// Get the waypoints of the named shape, `None` gives the default route.
    pub fn get(&self, name: Option<&str>) -> Option<&[Pose]> {
        match name {
            Some(n) => self.shapes.get(n).map(|s| s.as_slice()),
            None => Some(self.default.as_slice()),
        }
    }

    /// Returns true if `name` can be loaded from this catalog.
    pub fn contains(&self, name: Option<&str>) -> bool {
        self.get(name).is_some()
    }

    /// Names of all named shapes, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shapes.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn points(xy: &[(f64, f64)]) -> Vec<Pose> {
    xy.iter().map(|&(x, y)| Pose::new(x, y, 0.0)).collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin() {
        let catalog = ShapeCatalog::builtin();

        assert_eq!(catalog.names(), vec!["g", "square"]);
        assert_eq!(catalog.get(Some("square")).map(|s| s.len()), Some(5));
        assert_eq!(catalog.get(Some("g")).map(|s| s.len()), Some(5));
        assert!(catalog.get(Some("triangle")).is_none());
        assert!(catalog.get(Some("Square")).is_none());

        let default = catalog.get(None).unwrap();
        assert_eq!(default.len(), 1);
        assert_eq!((default[0].x, default[0].y), (0.0, 0.0));
    }

    #[test]
    fn test_with_shapes() {
        let mut extra = HashMap::new();
        extra.insert(String::from("line"), points(&[(2.0, 0.0)]));
        extra.insert(String::from("square"), points(&[(5.0, 5.0)]));

        let catalog = ShapeCatalog::with_shapes(extra);

        assert!(catalog.contains(Some("line")));

        // Built-in square is kept
        let square = catalog.get(Some("square")).unwrap();
        assert_eq!(square.len(), 5);
        assert_eq!((square[0].x, square[0].y), (1.0, 1.0));
    }
}
