use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chatline_types::SimulationEvent;
use tracing::{debug, info};

use super::{PreviewSurface, SurfaceError, SurfaceProvider};

/// In-memory preview surface fed by the preview frame
pub struct BufferedSurface {
    id: String,
    buffer: Mutex<Vec<SimulationEvent>>,
    closed: AtomicBool,
}

impl BufferedSurface {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            buffer: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Buffer events in arrival order
    pub fn push(
        &self,
        events: impl IntoIterator<Item = SimulationEvent>,
    ) -> Result<usize, SurfaceError> {
        if self.is_closed() {
            return Err(SurfaceError::TornDown);
        }
        let mut buffer = self.lock_buffer()?;
        buffer.extend(events);
        Ok(buffer.len())
    }

    pub fn buffered_len(&self) -> usize {
        self.lock_buffer().map(|b| b.len()).unwrap_or(0)
    }

    /// Tear the surface down; later pushes and drains fail
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(surface_id = %self.id, "Preview surface closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lock_buffer(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<SimulationEvent>>, SurfaceError> {
        self.buffer
            .lock()
            .map_err(|_| SurfaceError::Unavailable("event buffer lock poisoned".to_string()))
    }
}

impl Default for BufferedSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreviewSurface for BufferedSurface {
    async fn drain(&self) -> Result<Vec<SimulationEvent>, SurfaceError> {
        if self.is_closed() {
            return Err(SurfaceError::TornDown);
        }
        let mut buffer = self.lock_buffer()?;
        Ok(std::mem::take(&mut *buffer))
    }
}

/// Slot holding the surface of the running preview.
///
/// Each preview start installs a new surface and tears the previous one down.
#[derive(Default)]
pub struct ActivePreview {
    current: RwLock<Option<Arc<BufferedSurface>>>,
}

impl ActivePreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh surface, closing the one it replaces
    pub fn start(&self) -> Result<Arc<BufferedSurface>, SurfaceError> {
        let surface = Arc::new(BufferedSurface::new());
        let previous = {
            let mut current = self.write_slot()?;
            current.replace(Arc::clone(&surface))
        };
        if let Some(previous) = previous {
            previous.close();
        }
        info!(surface_id = %surface.id(), "Preview surface started");
        Ok(surface)
    }

    /// Tear down the active surface; returns whether one was active
    pub fn stop(&self) -> Result<bool, SurfaceError> {
        let previous = self.write_slot()?.take();
        match previous {
            Some(surface) => {
                surface.close();
                info!(surface_id = %surface.id(), "Preview surface stopped");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn current(&self) -> Result<Option<Arc<BufferedSurface>>, SurfaceError> {
        let current = self
            .current
            .read()
            .map_err(|_| SurfaceError::Unavailable("preview slot lock poisoned".to_string()))?;
        Ok(current.clone())
    }

    fn write_slot(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Option<Arc<BufferedSurface>>>, SurfaceError> {
        self.current
            .write()
            .map_err(|_| SurfaceError::Unavailable("preview slot lock poisoned".to_string()))
    }
}

impl SurfaceProvider for ActivePreview {
    fn active_surface(&self) -> Result<Option<Arc<dyn PreviewSurface>>, SurfaceError> {
        Ok(self
            .current()?
            .map(|surface| surface as Arc<dyn PreviewSurface>))
    }
}
