use nalgebra::distance;

use crate::mapper::WorldPoint;

/// How close two accepted points may be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityRule {
    /// Every candidate is accepted.
    Disabled,
    /// Candidates strictly closer than this many millimeters to an accepted
    /// point are dropped.
    MinDistance(f64),
}

impl ProximityRule {
    /// A non-positive (or NaN) distance turns filtering off.
    pub fn from_min_distance(min_distance: f64) -> Self {
        if min_distance > 0.0 {
            Self::MinDistance(min_distance)
        } else {
            Self::Disabled
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityFilter {
    rule: ProximityRule,
}

impl ProximityFilter {
    pub fn new(min_distance: f64) -> Self {
        Self {
            rule: ProximityRule::from_min_distance(min_distance),
        }
    }

    pub fn rule(&self) -> ProximityRule {
        self.rule
    }

    /// Checks `candidate` against `existing` in insertion order and stops at
    /// the first point that is too close.
    ///
    /// Linear in `existing.len()`. The set grows with surface sampling
    /// density, not with the number of frames, since repeated detections of
    /// the same spot are dropped here.
    pub fn accept(&self, candidate: &WorldPoint, existing: &[WorldPoint]) -> bool {
        match self.rule {
            ProximityRule::Disabled => true,
            ProximityRule::MinDistance(min) => {
                !existing.iter().any(|p| distance(p, candidate) < min)
            }
        }
    }
}

/// Points accepted during one session, in acceptance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulatedPointSet {
    points: Vec<WorldPoint>,
}

impl AccumulatedPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: WorldPoint) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldPoint> {
        self.points.iter()
    }
}
