//! Linear memory ceiling for guest instances.

use wasi_launch_core::MemoryLimit;
use wasmtime::ResourceLimiter;

/// Refuses `memory.grow` requests beyond a configured byte count.
///
/// Without a limit every request is granted, leaving the engine's own
/// maximums in charge.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MemoryLimiter {
    max_memory_bytes: Option<usize>,
}

impl MemoryLimiter {
    pub(crate) fn new(limit: Option<MemoryLimit>) -> Self {
        Self {
            max_memory_bytes: limit.map(|l| usize::try_from(l.bytes()).unwrap_or(usize::MAX)),
        }
    }
}

impl ResourceLimiter for MemoryLimiter {
    fn memory_growing(
        &mut self,
        current: usize,
        desired: usize,
        _maximum: Option<usize>,
    ) -> wasmtime::Result<bool> {
        match self.max_memory_bytes {
            Some(max) if desired > max => {
                tracing::warn!("Memory limit exceeded: {} > {}", desired, max);
                Ok(false)
            }
            _ => {
                tracing::trace!("Memory growing: {} -> {} bytes", current, desired);
                Ok(true)
            }
        }
    }

    fn table_growing(
        &mut self,
        _current: usize,
        _desired: usize,
        _maximum: Option<usize>,
    ) -> wasmtime::Result<bool> {
        Ok(true)
    }
}
