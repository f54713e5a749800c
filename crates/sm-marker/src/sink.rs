use serde::{Deserialize, Serialize};

use crate::mapper::WorldPoint;

/// Receives accepted points, one at a time, in acceptance order.
pub trait PointSink {
    fn add_point(&mut self, point: WorldPoint);

    /// Removes every point received so far.
    fn clear(&mut self);
}

impl PointSink for Vec<WorldPoint> {
    fn add_point(&mut self, point: WorldPoint) {
        self.push(point);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<S: PointSink + ?Sized> PointSink for &mut S {
    fn add_point(&mut self, point: WorldPoint) {
        (**self).add_point(point);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fiducial {
    pub label: String,
    pub position: WorldPoint,
}

/// Named list of labeled points. Labels are `<name>-<n>`, counting from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiducialList {
    name: String,
    fiducials: Vec<Fiducial>,
}

impl FiducialList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fiducials: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fiducials(&self) -> &[Fiducial] {
        &self.fiducials
    }

    pub fn len(&self) -> usize {
        self.fiducials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fiducials.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.fiducials.iter().map(|f| f.position)
    }
}

impl PointSink for FiducialList {
    fn add_point(&mut self, point: WorldPoint) {
        let label = format!("{}-{}", self.name, self.fiducials.len() + 1);
        self.fiducials.push(Fiducial {
            label,
            position: point,
        });
    }

    fn clear(&mut self) {
        self.fiducials.clear();
    }
}
