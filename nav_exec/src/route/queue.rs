//! FIFO queue of waypoints

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::VecDeque;

use super::{RouteError, ShapeCatalog};
use crate::nav_ctrl::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// First-in first-out queue of target poses, loadable from a [`ShapeCatalog`].
///
/// A dequeued waypoint is handed over by value and never returns to the queue.
#[derive(Debug, Clone, Default)]
pub struct WaypointQueue {
    catalog: ShapeCatalog,

    queue: VecDeque<Pose>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WaypointQueue {
    /// Create an empty queue which loads routes from the given catalog.
    pub fn new(catalog: ShapeCatalog) -> Self {
        Self {
            catalog,
            queue: VecDeque::new(),
        }
    }

    /// Append a waypoint to the tail of the queue.
    pub fn enqueue(&mut self, pose: Pose) {
        self.queue.push_back(pose);
    }

    /// Remove and return the waypoint at the head of the queue.
    pub fn dequeue(&mut self) -> Result<Pose, RouteError> {
        self.queue.pop_front().ok_or(RouteError::EmptyQueue)
    }

    /// Replace the contents of the queue with the waypoints of the named shape, in order.
    ///
    /// `None` loads the default route. If the name is not in the catalog the queue is left
    /// unchanged and `UnknownShape` is returned.
    pub fn load(&mut self, name: Option<&str>) -> Result<usize, RouteError> {
        let poses = self
            .catalog
            .get(name)
            .ok_or_else(|| RouteError::UnknownShape(name.unwrap_or_default().into()))?;

        self.queue.clear();
        self.queue.extend(poses.iter().copied());

        Ok(self.queue.len())
    }

    /// Remove all waypoints.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn xy(p: Pose) -> (f64, f64) {
        (p.x, p.y)
    }

    #[test]
    fn test_fifo() -> Result<(), RouteError> {
        let mut queue = WaypointQueue::default();

        queue.enqueue(Pose::new(1.0, 2.0, 0.0));
        queue.enqueue(Pose::new(3.0, 4.0, 0.0));

        assert_eq!(xy(queue.dequeue()?), (1.0, 2.0));
        assert_eq!(xy(queue.dequeue()?), (3.0, 4.0));
        assert!(matches!(queue.dequeue(), Err(RouteError::EmptyQueue)));

        Ok(())
    }

    #[test]
    fn test_load_square() -> Result<(), RouteError> {
        let mut queue = WaypointQueue::default();

        assert_eq!(queue.load(Some("square"))?, 5);

        let mut out = Vec::new();
        for _ in 0..5 {
            out.push(xy(queue.dequeue()?));
        }

        assert_eq!(
            out,
            vec![(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
        );
        assert!(matches!(queue.dequeue(), Err(RouteError::EmptyQueue)));

        Ok(())
    }

    #[test]
    fn test_load_replaces_contents() -> Result<(), RouteError> {
        let mut queue = WaypointQueue::default();

        queue.enqueue(Pose::new(9.0, 9.0, 0.0));
        queue.load(Some("g"))?;

        assert_eq!(queue.len(), 5);
        assert_eq!(xy(queue.dequeue()?), (-1.0, 1.0));

        queue.load(None)?;
        assert_eq!(queue.len(), 1);
        assert_eq!(xy(queue.dequeue()?), (0.0, 0.0));

        Ok(())
    }

    #[test]
    fn test_load_unknown_shape() -> Result<(), RouteError> {
        let mut queue = WaypointQueue::default();
        queue.load(Some("square"))?;
        queue.dequeue()?;

        assert_eq!(
            queue.load(Some("triangle")),
            Err(RouteError::UnknownShape(String::from("triangle")))
        );

        // Contents unchanged
        assert_eq!(queue.len(), 4);
        assert_eq!(xy(queue.dequeue()?), (1.0, -1.0));

        Ok(())
    }
}
