//! Input handling: focus, keyboard, resize drags and the tuning popup

pub mod focus;
pub mod keys;
pub mod popover;
pub mod resize;

pub use focus::{FocusLease, FocusOwner, FocusRegister};
pub use keys::{Key, KeyEvent, KeyOutcome};
pub use popover::{PopoverView, TuningPopover};
pub use resize::{ResizeDrag, ResizeGeometry};
