pub mod buffer;
pub mod entry;
pub mod memory;
pub mod scale;
pub mod types;
pub mod window;

pub use buffer::{BufferFacade, SeriesSource};
pub use entry::{EntryScaling, PlottedEntry, aggregate_min_max};
pub use memory::{MemoryBuffer, MemorySeries};
pub use scale::{LinearScale, snap_to_pixel_center};
pub use types::{EntryId, IndexWindow, ListenerId, PlotId, Viewport};
pub use window::{
    DEFAULT_ZOOM_FACTOR, FixedIndexWindow, IndexListener, IndexWindowModel, MIN_WINDOW_WIDTH,
    SharedIndexWindow, TimeIndexWindow, WindowListener, centered_window,
};
