use crate::{collision::EntityId, error::KickLockError};

/// Owner of the single kick lock.
///
/// Only the holder may animate a kick trajectory; the lock is held from launch
/// until the settle completes or the kick aborts.
#[derive(Clone, Copy, Debug, Default)]
pub struct KickCoordinator {
    holder: Option<EntityId>,
}

impl KickCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, requester: EntityId) -> Result<(), KickLockError> {
        match self.holder {
            Some(holder) => Err(KickLockError::Held { holder }),
            None => {
                self.holder = Some(requester);
                Ok(())
            }
        }
    }

    pub fn release(&mut self, requester: EntityId) -> Result<(), KickLockError> {
        if self.holder == Some(requester) {
            self.holder = None;
            Ok(())
        } else {
            Err(KickLockError::NotHolder { requester })
        }
    }

    #[inline]
    pub fn holder(&self) -> Option<EntityId> {
        self.holder
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.holder.is_none()
    }
}
