/*++

Licensed under the Apache-2.0 license.

File Name:

    context.rs

Abstract:

    File contains the pool of streaming HMAC contexts. Context state stays
    on this side of the table; callers only ever hold a handle.

--*/

use crate::abi::RawHmacContext;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};
use cryptolib::{cprintln, HmacContext, HmacTag};
use cryptolib_error::{CryptoError, CryptoResult};

/// Number of streaming HMAC operations that may be open at once
pub const HMAC_CONTEXT_POOL_LEN: usize = 8;

const SLOT_FREE: u32 = 0;
const SLOT_BUSY: u32 = 1;
const SLOT_ACTIVE: u32 = 2;

struct ContextSlot {
    state: AtomicU32,

    /// Only changed while the slot is `SLOT_BUSY`. Never zero once issued.
    generation: AtomicU32,

    ctx: UnsafeCell<Option<HmacContext>>,
}

impl ContextSlot {
    const fn new() -> Self {
        Self {
            state: AtomicU32::new(SLOT_FREE),
            generation: AtomicU32::new(0),
            ctx: UnsafeCell::new(None),
        }
    }

    fn next_generation(&self) -> u32 {
        let next = self.generation.load(Ordering::Relaxed).wrapping_add(1);
        let next = if next == 0 { 1 } else { next };
        self.generation.store(next, Ordering::Relaxed);
        next
    }
}

/// Exclusive access to one slot, returned to `release_to` on drop.
struct SlotGuard<'a> {
    slot: &'a ContextSlot,
    release_to: u32,
}

impl SlotGuard<'_> {
    fn ctx(&mut self) -> &mut Option<HmacContext> {
        // SAFETY: the slot is held in `SLOT_BUSY` by this guard alone.
        unsafe { &mut *self.slot.ctx.get() }
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slot.state.store(self.release_to, Ordering::Release);
    }
}

/// Fixed pool of streaming HMAC contexts
pub struct HmacContextPool<const N: usize> {
    slots: [ContextSlot; N],
}

// SAFETY: every access to a slot's context goes through a `SlotGuard`,
// which is only created after winning the `SLOT_BUSY` transition.
unsafe impl<const N: usize> Sync for HmacContextPool<N> {}

impl<const N: usize> HmacContextPool<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY: ContextSlot = ContextSlot::new();

    pub const fn new() -> Self {
        Self {
            slots: [Self::EMPTY; N],
        }
    }

    /// Claim the slot named by `handle` if it is still live.
    fn acquire(&self, handle: &RawHmacContext) -> CryptoResult<SlotGuard<'_>> {
        let slot = self
            .slots
            .get(handle.index as usize)
            .ok_or(CryptoError::INVALID_STATE)?;
        if handle.generation == 0 || slot.generation.load(Ordering::Relaxed) != handle.generation
        {
            return Err(CryptoError::INVALID_STATE);
        }
        slot.state
            .compare_exchange(SLOT_ACTIVE, SLOT_BUSY, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| CryptoError::INVALID_STATE)?;
        let guard = SlotGuard {
            slot,
            release_to: SLOT_ACTIVE,
        };
        // The slot may have been restarted between the check and the claim.
        if slot.generation.load(Ordering::Relaxed) != handle.generation {
            return Err(CryptoError::INVALID_STATE);
        }
        Ok(guard)
    }

    fn claim_free(&self) -> CryptoResult<(u32, SlotGuard<'_>)> {
        for (index, slot) in self.slots.iter().enumerate() {
            if slot
                .state
                .compare_exchange(SLOT_FREE, SLOT_BUSY, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                let guard = SlotGuard {
                    slot,
                    release_to: SLOT_FREE,
                };
                return Ok((index as u32, guard));
            }
        }
        cprintln!("[contsvc] HMAC context pool exhausted");
        Err(CryptoError::CONTSVC_CONTEXT_EXHAUSTED)
    }

    /// Bind `ctx` to a slot and point `handle` at it
    ///
    /// A handle that still names a live context is restarted in place, so
    /// abandoned operations do not leak slots.
    pub fn init(&self, handle: &mut RawHmacContext, ctx: HmacContext) -> CryptoResult<()> {
        let (index, mut guard) = match self.acquire(handle) {
            Ok(guard) => (handle.index, guard),
            Err(_) => self.claim_free()?,
        };
        *guard.ctx() = Some(ctx);
        guard.release_to = SLOT_ACTIVE;
        *handle = RawHmacContext {
            index,
            generation: guard.slot.next_generation(),
        };
        Ok(())
    }

    pub fn update(&self, handle: &RawHmacContext, data: &[u8]) -> CryptoResult<()> {
        let mut guard = self.acquire(handle)?;
        guard
            .ctx()
            .as_mut()
            .ok_or(CryptoError::INVALID_STATE)?
            .update(data)
    }

    /// Write the tag and free the slot
    ///
    /// Every copy of `handle` is stale afterwards. A rejected tag buffer
    /// leaves the context open.
    pub fn finalize(&self, handle: &mut RawHmacContext, tag: HmacTag) -> CryptoResult<()> {
        let mut guard = self.acquire(handle)?;
        guard
            .ctx()
            .as_mut()
            .ok_or(CryptoError::INVALID_STATE)?
            .finalize(tag)?;
        *guard.ctx() = None;
        guard.slot.next_generation();
        guard.release_to = SLOT_FREE;
        *handle = RawHmacContext::new();
        Ok(())
    }

    /// Returns `true` while `handle` names an open context.
    pub fn is_active(&self, handle: &RawHmacContext) -> bool {
        self.slots.get(handle.index as usize).is_some_and(|slot| {
            handle.generation != 0
                && slot.state.load(Ordering::Acquire) != SLOT_FREE
                && slot.generation.load(Ordering::Relaxed) == handle.generation
        })
    }
}

impl<const N: usize> Default for HmacContextPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Contexts behind slots 10 to 12 of the dispatch table
pub static HMAC_CONTEXTS: HmacContextPool<HMAC_CONTEXT_POOL_LEN> = HmacContextPool::new();
