//! Generation tracking for the view configuration. Every configuration
//! change stamps a fresh generation, and the view compares it against the
//! generation its cached layout was built from to decide when to relayout.

use std::sync;

/// One mutation of an `Object`. `apply` validates before touching anything.
pub trait Change<Object>: Clone {
    type ApplyError;
    type ApplyRecord: Clone;

    fn apply(self, object: &mut Object) -> Result<(Self, Self::ApplyRecord), Self::ApplyError>;
}

/// Identity and generation of a versioned object. Clones share both until
/// one of them changes.
#[derive(Clone)]
pub struct Version<Object: Versioned> {
    previous: Option<<Object::Change as Change<Object>>::ApplyRecord>,
    uid: u64,
    generation: u64
}

impl<Object: Versioned> std::fmt::Debug for Version<Object> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Version")
            .field("uid", &self.uid)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<T: Versioned> Default for Version<T> {
    fn default() -> Self {
        Version {
            previous: None,
            uid: next_uid(),
            generation: next_generation(),
        }
    }
}

impl<T: Versioned> Version<T> {
    fn is_outdated(&self, other: &Self) -> bool {
        self.uid != other.uid ||
            self.generation != other.generation
    }
}

/// An object whose every mutation goes through a [`Change`], so that
/// anything derived from it can tell whether it is stale by comparing
/// generations.
pub trait Versioned: Sized + Clone {
    type Change: Change<Self>;

    fn version(&self) -> &Version<Self>;
    fn version_mut(&mut self) -> &mut Version<Self>;

    fn generation(&self) -> u64 {
        self.version().generation
    }

    /// Record of the most recently applied change, if any.
    fn previous(&self) -> Option<&<Self::Change as Change<Self>>::ApplyRecord> {
        self.version().previous.as_ref()
    }

    fn is_outdated(&self, other: &Self) -> bool {
        self.version().is_outdated(other.version())
    }

    /// Applies a change in place. On error the object is left untouched and
    /// keeps its generation.
    fn change(&mut self, change: Self::Change) -> Result<Self::Change, <Self::Change as Change<Self>>::ApplyError> {
        let (change, record) = change.apply(self)?;

        let version = self.version_mut();
        version.previous = Some(record);
        version.generation = next_generation();

        Ok(change)
    }
}

static NEXT_UID:        sync::atomic::AtomicU64 = sync::atomic::AtomicU64::new(1);
static NEXT_GENERATION: sync::atomic::AtomicU64 = sync::atomic::AtomicU64::new(1);

fn next_uid() -> u64 {
    NEXT_UID.fetch_add(1, sync::atomic::Ordering::Relaxed)
}

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, sync::atomic::Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default)]
    struct Width {
        value: u32,
        version: Version<Width>,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct SetWidth(u32);

    impl Change<Width> for SetWidth {
        type ApplyError = ();
        type ApplyRecord = u32;

        fn apply(self, object: &mut Width) -> Result<(Self, u32), ()> {
            if self.0 == 0 {
                return Err(());
            }
            let old = std::mem::replace(&mut object.value, self.0);
            Ok((self, old))
        }
    }

    impl Versioned for Width {
        type Change = SetWidth;

        fn version(&self) -> &Version<Width> {
            &self.version
        }

        fn version_mut(&mut self) -> &mut Version<Width> {
            &mut self.version
        }
    }

    #[test]
    fn failed_change_keeps_generation() {
        let mut w = Width::default();
        let before = w.clone();
        assert!(!w.is_outdated(&before));

        assert_eq!(w.change(SetWidth(0)), Err(()));
        assert_eq!(w.generation(), before.generation());
        assert_eq!(w.previous(), None);

        assert_eq!(w.change(SetWidth(4)), Ok(SetWidth(4)));
        assert!(w.generation() > before.generation());
        assert!(w.is_outdated(&before));
        assert_eq!(w.previous(), Some(&0));
    }

    #[test]
    fn distinct_objects_are_never_current() {
        let a = Width::default();
        let b = Width::default();
        assert!(a.is_outdated(&b));
    }
}
