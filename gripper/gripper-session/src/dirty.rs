//! Dependency graph of derived values.

/// A derived value cached by the session.
///
/// Variants are declared in topological order: every stage comes after all
/// the stages it is computed from.
///
/// ```text
/// mesh ──► Query ──┬──► DistanceField
///                  └──► Fingers ──► Trajectory
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Mesh query service.
    Query,
    /// Voxel distance field around the object.
    DistanceField,
    /// One finger path per contact point.
    Fingers,
    /// Closing trajectory.
    Trajectory,
}

impl Stage {
    /// Every stage in topological order.
    pub const ALL: [Self; 4] = [Self::Query, Self::DistanceField, Self::Fingers, Self::Trajectory];

    /// Stages computed directly from this one.
    #[must_use]
    pub const fn dependents(self) -> &'static [Self] {
        match self {
            Self::Query => &[Self::DistanceField, Self::Fingers],
            Self::Fingers => &[Self::Trajectory],
            Self::DistanceField | Self::Trajectory => &[],
        }
    }

    /// Stages this one is computed directly from.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Self] {
        match self {
            Self::Query => &[],
            Self::DistanceField | Self::Fingers => &[Self::Query],
            Self::Trajectory => &[Self::Fingers],
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Which stages must be recomputed before their value is read again.
///
/// Invalidating a stage also invalidates everything downstream of it.
///
/// # Example
///
/// ```
/// use gripper_session::{DirtyTags, Stage};
///
/// let mut dirty = DirtyTags::clean();
/// dirty.invalidate(Stage::Fingers);
///
/// assert!(dirty.is_dirty(Stage::Trajectory));
/// assert!(!dirty.is_dirty(Stage::Query));
/// assert_eq!(dirty.stages().collect::<Vec<_>>(), vec![Stage::Fingers, Stage::Trajectory]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyTags(u8);

impl DirtyTags {
    /// Nothing needs recomputing.
    #[must_use]
    pub const fn clean() -> Self {
        Self(0)
    }

    /// Everything needs recomputing.
    #[must_use]
    pub fn all() -> Self {
        let mut tags = Self::clean();
        for stage in Stage::ALL {
            tags.0 |= stage.bit();
        }
        tags
    }

    /// Check whether a stage must be recomputed.
    #[must_use]
    pub const fn is_dirty(self, stage: Stage) -> bool {
        self.0 & stage.bit() != 0
    }

    /// Check whether every stage is up to date.
    #[must_use]
    pub const fn is_clean(self) -> bool {
        self.0 == 0
    }

    /// Mark a stage and everything downstream of it dirty.
    pub fn invalidate(&mut self, stage: Stage) {
        self.0 |= stage.bit();
        for &dependent in stage.dependents() {
            self.invalidate(dependent);
        }
    }

    /// Mark a single stage up to date.
    pub fn mark_clean(&mut self, stage: Stage) {
        self.0 &= !stage.bit();
    }

    /// Dirty stages in topological order.
    pub fn stages(self) -> impl Iterator<Item = Stage> {
        Stage::ALL.into_iter().filter(move |&s| self.is_dirty(s))
    }
}
