//! Canonical composite keys for lines, angles and circles.
//!
//! Lines and angles are stored under an order-normalised key so that the same
//! geometric relation can never be stored twice. Equality and hashing derive
//! from the canonical form only, because the fields are private and every
//! constructor canonicalises.

use serde::{Deserialize, Serialize};

/// Identifier of a point. Always positive.
pub type PointIndex = u32;

/// Key of the segment AB, independent of click order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey(PointIndex, PointIndex);

impl LineKey {
    /// `(min(a, b), max(a, b))`.
    pub fn new(a: PointIndex, b: PointIndex) -> Self {
        if a < b { Self(a, b) } else { Self(b, a) }
    }

    /// Smaller endpoint.
    pub fn a(&self) -> PointIndex {
        self.0
    }

    /// Larger endpoint.
    pub fn b(&self) -> PointIndex {
        self.1
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.0 == index || self.1 == index
    }

    /// Both endpoints are the same point.
    pub fn is_degenerate(&self) -> bool {
        self.0 == self.1
    }

    /// The endpoint that is not `index`, if `index` is an endpoint.
    pub fn other(&self, index: PointIndex) -> Option<PointIndex> {
        if self.0 == index {
            Some(self.1)
        } else if self.1 == index {
            Some(self.0)
        } else {
            None
        }
    }

    /// Key after renaming `from` to `to`, re-canonicalised.
    pub fn renamed(&self, from: PointIndex, to: PointIndex) -> Self {
        let swap = |i: PointIndex| if i == from { to } else { i };
        Self::new(swap(self.0), swap(self.1))
    }
}

/// Key of the angle ∠ABC with vertex B.
///
/// The arms are ordered so that the first index is the smaller of A and C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AngleKey(PointIndex, PointIndex, PointIndex);

impl AngleKey {
    /// `(a, b, c)` if `a < c`, else `(c, b, a)`.
    pub fn new(a: PointIndex, b: PointIndex, c: PointIndex) -> Self {
        if a < c { Self(a, b, c) } else { Self(c, b, a) }
    }

    pub fn first(&self) -> PointIndex {
        self.0
    }

    pub fn vertex(&self) -> PointIndex {
        self.1
    }

    pub fn last(&self) -> PointIndex {
        self.2
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.0 == index || self.1 == index || self.2 == index
    }

    /// The two lines the angle is built on.
    pub fn arms(&self) -> (LineKey, LineKey) {
        (LineKey::new(self.0, self.1), LineKey::new(self.1, self.2))
    }

    /// Any index repeated.
    pub fn is_degenerate(&self) -> bool {
        self.0 == self.1 || self.1 == self.2 || self.0 == self.2
    }

    pub fn renamed(&self, from: PointIndex, to: PointIndex) -> Self {
        let swap = |i: PointIndex| if i == from { to } else { i };
        Self::new(swap(self.0), swap(self.1), swap(self.2))
    }
}

/// Key of a circle centred at `center` passing through `rim`. Order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircleKey {
    pub center: PointIndex,
    pub rim: PointIndex,
}

impl CircleKey {
    pub fn new(center: PointIndex, rim: PointIndex) -> Self {
        Self { center, rim }
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.center == index || self.rim == index
    }

    pub fn renamed(&self, from: PointIndex, to: PointIndex) -> Self {
        let swap = |i: PointIndex| if i == from { to } else { i };
        Self::new(swap(self.center), swap(self.rim))
    }
}
